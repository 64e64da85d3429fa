use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default, rename_all = "camelCase")]
/// Persistent scene lights. These live outside the rebuilt primitive subtree
/// and survive every rebuild.
pub struct LightingOptions {
    /// Hemisphere sky color.
    #[schemars(title = "Sky Color")]
    pub sky_color: String,
    /// Hemisphere ground color.
    #[schemars(title = "Ground Color")]
    pub ground_color: String,
    /// Hemisphere light intensity.
    #[schemars(
        title = "Ambient",
        range(min = 0.0, max = 2.0),
        extend("step" = 0.01),
    )]
    pub ambient: f32,
    /// Directional key light intensity.
    #[schemars(
        title = "Key Light",
        range(min = 0.0, max = 2.0),
        extend("step" = 0.05),
    )]
    pub key_intensity: f32,
    /// Directional key light position; the light points at the origin.
    #[schemars(skip)]
    pub key_position: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            sky_color: "#eeeeee".to_owned(),
            ground_color: "#999999".to_owned(),
            ambient: 1.0,
            key_intensity: 0.15,
            key_position: [-10.0, 10.0, 10.0],
        }
    }
}
