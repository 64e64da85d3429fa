use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Material kind name for the lit standard (roughness/metalness) material.
pub const STANDARD_MATERIAL: &str = "MeshStandardMaterial";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Material Parameters", inline)]
#[serde(default)]
/// Shading parameters shared by every lit material.
pub struct MaterialParameters {
    /// Surface roughness.
    #[schemars(
        title = "Roughness",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.01),
    )]
    pub roughness: f32,
    /// Surface metalness.
    #[schemars(
        title = "Metalness",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.01),
    )]
    pub metalness: f32,
}

impl Default for MaterialParameters {
    fn default() -> Self {
        Self {
            roughness: 0.07,
            metalness: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Material", inline)]
#[serde(default)]
/// Which material the lit renderer should produce.
///
/// The kind is kept as a free-form string so that an unrecognized kind in a
/// host config deserializes fine and is rejected by the material factory
/// with a descriptive error.
pub struct MaterialOptions {
    /// Material kind, e.g. `"MeshStandardMaterial"`.
    #[serde(rename = "type")]
    #[schemars(skip)]
    pub kind: String,
    /// Shading parameters.
    pub parameters: MaterialParameters,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            kind: STANDARD_MATERIAL.to_owned(),
            parameters: MaterialParameters::default(),
        }
    }
}
