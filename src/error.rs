//! Crate-level error types.

use std::fmt;

/// Errors produced by the crystal-scene crate.
#[derive(Debug)]
pub enum SceneError {
    /// A descriptor is missing a geometry field its builder requires.
    MissingField {
        /// Descriptor kind (`"spheres"`, `"cubes"`, ...).
        kind: &'static str,
        /// Wire name of the missing field.
        field: &'static str,
    },
    /// Two descriptor arrays that must line up have different lengths.
    MismatchedLengths {
        /// Descriptor kind.
        kind: &'static str,
        /// Field whose length is authoritative.
        expected_field: &'static str,
        /// Length of the authoritative field.
        expected: usize,
        /// Field that disagrees.
        actual_field: &'static str,
        /// Length of the disagreeing field.
        actual: usize,
    },
    /// A flat vertex list does not split into whole primitives.
    IncompletePrimitive {
        /// Descriptor kind.
        kind: &'static str,
        /// Vertices per primitive.
        group: usize,
        /// Number of vertices given.
        count: usize,
    },
    /// A color string could not be parsed.
    InvalidColor(String),
    /// Convex hull input does not span a volume.
    DegenerateHull(usize),
    /// The configured material kind is not supported by the lit renderer.
    UnsupportedMaterialKind(String),
    /// Operation attempted on a destroyed scene store or instance.
    Destroyed,
    /// Scene JSON could not be decoded.
    Parse(serde_json::Error),
    /// TOML settings parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Image encoding failure during export.
    Encode(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { kind, field } => {
                write!(
                    f,
                    "{kind} descriptor is missing required field `{field}`"
                )
            }
            Self::MismatchedLengths {
                kind,
                expected_field,
                expected,
                actual_field,
                actual,
            } => write!(
                f,
                "{kind} descriptor has {expected} `{expected_field}` but \
                 {actual} `{actual_field}`"
            ),
            Self::IncompletePrimitive { kind, group, count } => write!(
                f,
                "{kind} descriptor has {count} positions, not a multiple \
                 of {group}"
            ),
            Self::InvalidColor(color) => write!(f, "invalid color: {color:?}"),
            Self::DegenerateHull(count) => write!(
                f,
                "convex hull needs 4 non-coplanar points, got {count} \
                 degenerate points"
            ),
            Self::UnsupportedMaterialKind(kind) => {
                write!(f, "unsupported material kind: {kind}")
            }
            Self::Destroyed => write!(f, "scene has been destroyed"),
            Self::Parse(e) => write!(f, "scene parse error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "settings parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Encode(msg) => write!(f, "image encode error: {msg}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl SceneError {
    /// Whether this error came from a malformed scene descriptor (as opposed
    /// to configuration or I/O).
    #[must_use]
    pub fn is_malformed_descriptor(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::MismatchedLengths { .. }
                | Self::IncompletePrimitive { .. }
                | Self::InvalidColor(_)
                | Self::DegenerateHull(_)
        )
    }
}
