// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Retained-mode 3D scene engine for JSON-described crystal and molecule
//! scenes.
//!
//! A host hands over a declarative scene (atoms, bonds, surfaces, convex
//! hulls, arrows, labels) as JSON. The builders turn it into a retained
//! scene graph, and the store keeps that graph in sync with later
//! snapshots, visibility toggles, viewport sizes, animation time and
//! download requests. Several instances in one process share camera moves
//! over a publish/subscribe bus.
//!
//! # Key entry points
//!
//! - [`instance::SceneInstance`] - one mounted scene; takes
//!   [`instance::SceneCommand`]s and emits [`instance::SceneEvent`]s
//! - [`store::SceneStore`] - the live graph, camera and render surface
//! - [`builders::Builder`] - pure descriptor to object-tree translation
//! - [`options::RenderSettings`] - per-store configuration (JSON or TOML)
//! - [`sync::CameraSyncBus`] - camera pose exchange between instances
//!
//! # Rendering
//!
//! Drawing goes through the [`render::RenderSurface`] trait. The crate
//! ships [`render::HeadlessSurface`], a CPU rasterizer used for PNG
//! export, the `crystal-scene` command-line renderer and tests; hosts
//! plug in their own surface for on-screen output.

pub mod animation;
pub mod builders;
pub mod camera;
pub mod error;
pub mod export;
pub mod geometry;
pub mod instance;
pub mod options;
pub mod picking;
pub mod render;
pub mod scene;
pub mod store;
pub mod sync;
pub mod util;
