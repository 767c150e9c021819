use serde::{Deserialize, Serialize};

use crate::json::{image, Extras, Index};

/// Magnification filter, passed through verbatim to the GPU sampler.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(try_from = "u32", into = "u32")]
pub enum MagFilter {
    /// `GL_NEAREST`.
    Nearest,
    /// `GL_LINEAR`.
    Linear,
}

impl TryFrom<u32> for MagFilter {
    type Error = String;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            9728 => Ok(MagFilter::Nearest),
            9729 => Ok(MagFilter::Linear),
            other => Err(format!("unrecognized magFilter {other}")),
        }
    }
}

impl From<MagFilter> for u32 {
    fn from(value: MagFilter) -> u32 {
        match value {
            MagFilter::Nearest => 9728,
            MagFilter::Linear => 9729,
        }
    }
}

/// Minification filter, passed through verbatim to the GPU sampler.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(try_from = "u32", into = "u32")]
pub enum MinFilter {
    /// `GL_NEAREST`.
    Nearest,
    /// `GL_LINEAR`.
    Linear,
    /// `GL_NEAREST_MIPMAP_NEAREST`.
    NearestMipmapNearest,
    /// `GL_LINEAR_MIPMAP_NEAREST`.
    LinearMipmapNearest,
    /// `GL_NEAREST_MIPMAP_LINEAR`.
    NearestMipmapLinear,
    /// `GL_LINEAR_MIPMAP_LINEAR`.
    LinearMipmapLinear,
}

impl TryFrom<u32> for MinFilter {
    type Error = String;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            9728 => Ok(MinFilter::Nearest),
            9729 => Ok(MinFilter::Linear),
            9984 => Ok(MinFilter::NearestMipmapNearest),
            9985 => Ok(MinFilter::LinearMipmapNearest),
            9986 => Ok(MinFilter::NearestMipmapLinear),
            9987 => Ok(MinFilter::LinearMipmapLinear),
            other => Err(format!("unrecognized minFilter {other}")),
        }
    }
}

impl From<MinFilter> for u32 {
    fn from(value: MinFilter) -> u32 {
        match value {
            MinFilter::Nearest => 9728,
            MinFilter::Linear => 9729,
            MinFilter::NearestMipmapNearest => 9984,
            MinFilter::LinearMipmapNearest => 9985,
            MinFilter::NearestMipmapLinear => 9986,
            MinFilter::LinearMipmapLinear => 9987,
        }
    }
}

/// Texture coordinate wrapping mode.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(try_from = "u32", into = "u32")]
pub enum WrappingMode {
    /// `GL_CLAMP_TO_EDGE`.
    ClampToEdge,
    /// `GL_MIRRORED_REPEAT`.
    MirroredRepeat,
    /// `GL_REPEAT`.
    Repeat,
}

impl TryFrom<u32> for WrappingMode {
    type Error = String;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            33071 => Ok(WrappingMode::ClampToEdge),
            33648 => Ok(WrappingMode::MirroredRepeat),
            10497 => Ok(WrappingMode::Repeat),
            other => Err(format!("unrecognized wrapping mode {other}")),
        }
    }
}

impl From<WrappingMode> for u32 {
    fn from(value: WrappingMode) -> u32 {
        match value {
            WrappingMode::ClampToEdge => 33071,
            WrappingMode::MirroredRepeat => 33648,
            WrappingMode::Repeat => 10497,
        }
    }
}

impl Default for WrappingMode {
    fn default() -> Self {
        WrappingMode::Repeat
    }
}

/// Filtering and wrapping modes for a [`Texture`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Sampler {
    /// Magnification filter; `None` means the renderer default applies.
    #[serde(rename = "magFilter", skip_serializing_if = "Option::is_none")]
    pub mag_filter: Option<MagFilter>,

    /// Minification filter; `None` means the renderer default applies.
    #[serde(rename = "minFilter", skip_serializing_if = "Option::is_none")]
    pub min_filter: Option<MinFilter>,

    /// S (U) wrapping mode.
    #[serde(rename = "wrapS")]
    pub wrap_s: WrappingMode,

    /// T (V) wrapping mode.
    #[serde(rename = "wrapT")]
    pub wrap_t: WrappingMode,

    /// Optional user-defined name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A GPU-bindable combination of a [`Sampler`] and a source [`image::Image`].
///
/// Multiple textures may share the same `source`; see the image dedup rules
/// in `§4.6` of the design.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Texture {
    /// The sampler used by this texture, or the default sampler if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampler: Option<Index<Sampler>>,

    /// The image this texture samples from.
    pub source: Index<image::Image>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// A reference from a material slot to a [`Texture`], plus a texture
/// coordinate set selector.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Info {
    /// The referenced texture.
    pub index: Index<Texture>,

    /// Which `TEXCOORD_n` attribute to sample with.
    #[serde(default, rename = "texCoord")]
    pub tex_coord: u32,
}

/// A [`Info`] plus the `scale` factor specific to normal map slots.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NormalTextureInfo {
    /// The referenced texture.
    pub index: Index<Texture>,

    /// Which `TEXCOORD_n` attribute to sample with.
    #[serde(default, rename = "texCoord")]
    pub tex_coord: u32,

    /// Scalar multiplier applied to the X and Y normal map components.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

/// A [`Info`] plus the `strength` factor specific to occlusion map slots.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OcclusionTextureInfo {
    /// The referenced texture.
    pub index: Index<Texture>,

    /// Which `TEXCOORD_n` attribute to sample with.
    #[serde(default, rename = "texCoord")]
    pub tex_coord: u32,

    /// Scalar multiplier applied to the occlusion value.
    #[serde(default = "default_strength")]
    pub strength: f32,
}

fn default_scale() -> f32 {
    1.0
}

fn default_strength() -> f32 {
    1.0
}
