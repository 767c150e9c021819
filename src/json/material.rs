use serde::{de, Deserialize, Serialize};
use std::fmt;

use crate::json::{texture, Extras};

/// The alpha rendering mode of a material.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlphaMode {
    /// Alpha is ignored; the rendered output is fully opaque.
    Opaque,
    /// Output is either fully opaque or fully transparent based on `alpha_cutoff`.
    Mask,
    /// Alpha blends the rendered output with the background.
    Blend,
}

impl Default for AlphaMode {
    fn default() -> Self {
        AlphaMode::Opaque
    }
}

impl<'de> Deserialize<'de> for AlphaMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor;
        impl de::Visitor<'_> for Visitor {
            type Value = AlphaMode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of OPAQUE, MASK, BLEND")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<AlphaMode, E> {
                match value {
                    "OPAQUE" => Ok(AlphaMode::Opaque),
                    "MASK" => Ok(AlphaMode::Mask),
                    "BLEND" => Ok(AlphaMode::Blend),
                    other => Err(de::Error::custom(format!("unrecognized alphaMode {other:?}"))),
                }
            }
        }
        deserializer.deserialize_str(Visitor)
    }
}

impl Serialize for AlphaMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            AlphaMode::Opaque => "OPAQUE",
            AlphaMode::Mask => "MASK",
            AlphaMode::Blend => "BLEND",
        };
        serializer.serialize_str(s)
    }
}

/// A set of parameter values defining the metallic-roughness PBR material model.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PbrMetallicRoughness {
    /// RGBA base color factor, multiplied with the base color texture if present.
    #[serde(rename = "baseColorFactor")]
    pub base_color_factor: [f32; 4],

    /// Base color texture.
    #[serde(rename = "baseColorTexture", skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<texture::Info>,

    /// Metalness, in `[0, 1]`.
    #[serde(rename = "metallicFactor")]
    pub metallic_factor: f32,

    /// Roughness, in `[0, 1]`.
    #[serde(rename = "roughnessFactor")]
    pub roughness_factor: f32,

    /// Combined metallic (B channel) / roughness (G channel) texture.
    #[serde(rename = "metallicRoughnessTexture", skip_serializing_if = "Option::is_none")]
    pub metallic_roughness_texture: Option<texture::Info>,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
        }
    }
}

/// The material appearance of a primitive.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Material {
    /// Metallic-roughness PBR parameters.
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr_metallic_roughness: PbrMetallicRoughness,

    /// Tangent-space normal map.
    #[serde(rename = "normalTexture", skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<texture::NormalTextureInfo>,

    /// Ambient occlusion map.
    #[serde(rename = "occlusionTexture", skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<texture::OcclusionTextureInfo>,

    /// Emissive color map.
    #[serde(rename = "emissiveTexture", skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<texture::Info>,

    /// RGB emissive color factor.
    #[serde(rename = "emissiveFactor")]
    pub emissive_factor: [f32; 3],

    /// Alpha rendering mode.
    #[serde(rename = "alphaMode")]
    pub alpha_mode: AlphaMode,

    /// Cutoff used in `Mask` alpha mode.
    #[serde(rename = "alphaCutoff")]
    pub alpha_cutoff: f32,

    /// Whether back-face culling is disabled.
    #[serde(rename = "doubleSided")]
    pub double_sided: bool,

    /// Optional user-defined name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            pbr_metallic_roughness: PbrMetallicRoughness::default(),
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
            name: None,
            extras: None,
        }
    }
}
