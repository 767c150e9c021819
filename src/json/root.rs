use serde::{Deserialize, Serialize};

use crate::json::{accessor, asset, buffer, image, material, mesh, scene, texture, Index};

/// Retrieves a root-level array element by its [`Index`].
pub trait Get<T> {
    /// Returns the element at `index`, or `None` if out of range.
    fn get(&self, index: &Index<T>) -> Option<&T>;
}

/// The root object of a glTF 2.0 asset (plain-JSON subset; see module docs
/// for the Non-goals this schema omits).
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Root {
    /// glTF version metadata.
    pub asset: asset::Asset,

    /// Accessors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<accessor::Accessor>,

    /// Buffers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<buffer::Buffer>,

    /// Buffer views.
    #[serde(default, rename = "bufferViews", skip_serializing_if = "Vec::is_empty")]
    pub buffer_views: Vec<buffer::View>,

    /// Images.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<image::Image>,

    /// Samplers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samplers: Vec<texture::Sampler>,

    /// Textures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<texture::Texture>,

    /// Materials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<material::Material>,

    /// Meshes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<mesh::Mesh>,

    /// Nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<scene::Node>,

    /// Scenes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<scene::Scene>,

    /// Index of the default scene, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<Index<scene::Scene>>,
}

impl Root {
    /// Deserializes a `Root` from a JSON string slice.
    pub fn from_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Deserializes a `Root` from a JSON byte slice.
    pub fn from_slice(s: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(s)
    }

    /// Retrieves a root-level array element by index.
    pub fn get<T>(&self, index: &Index<T>) -> Option<&T>
    where
        Self: Get<T>,
    {
        Get::get(self, index)
    }
}

macro_rules! impl_get {
    ($ty:ty, $field:ident) => {
        impl Get<$ty> for Root {
            fn get(&self, index: &Index<$ty>) -> Option<&$ty> {
                self.$field.get(index.value())
            }
        }
    };
}

impl_get!(accessor::Accessor, accessors);
impl_get!(buffer::Buffer, buffers);
impl_get!(buffer::View, buffer_views);
impl_get!(image::Image, images);
impl_get!(texture::Sampler, samplers);
impl_get!(texture::Texture, textures);
impl_get!(material::Material, materials);
impl_get!(mesh::Mesh, meshes);
impl_get!(scene::Node, nodes);
impl_get!(scene::Scene, scenes);
