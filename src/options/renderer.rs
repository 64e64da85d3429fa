use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which renderer the host draws with.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Lit, depth-tested rendering.
    #[default]
    Webgl,
    /// Flat vector output; every material is unlit.
    Svg,
}

/// Orientation-axis inset corner.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
pub enum AxisView {
    /// Top right.
    #[serde(alias = "ne")]
    NE,
    /// Top left.
    #[serde(alias = "nw")]
    NW,
    /// Bottom right.
    #[serde(alias = "se")]
    SE,
    /// Bottom left.
    #[default]
    #[serde(alias = "sw")]
    SW,
}

impl AxisView {
    /// Parse a host string (`"NE"`, `"sw"`, ...). Unknown values fall back to
    /// the default corner.
    #[must_use]
    pub fn from_host(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_uppercase).as_deref() {
            Some("NE") => Self::NE,
            Some("NW") => Self::NW,
            Some("SE") => Self::SE,
            _ => Self::SW,
        }
    }
}
