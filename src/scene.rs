//! Resolved scene/node/mesh/primitive/material model (C9).
//!
//! Built once during the body-load phase by [`crate::context::Context`];
//! leaves hold `Rc<RefCell<_>>` handles into the accessor and texture tables
//! so the post-load pipeline's in-place rewrites (endian/split/dedupe) are
//! visible here without a second pass.

use std::cell::RefCell;
use std::rc::Rc;

use crate::accessor::Accessor;
use crate::json::mesh::{Mode, Semantic};
use crate::math::Mat4;
use crate::texture::TextureInfo;
use std::collections::BTreeMap;

/// One drawable unit: attributes, optional indices, material, and mode.
pub struct Primitive {
    /// Vertex attribute accessors, keyed by semantic.
    pub attributes: BTreeMap<Semantic, Rc<RefCell<Accessor>>>,
    /// Index accessor, when the primitive is indexed.
    pub indices: Option<Rc<RefCell<Accessor>>>,
    /// Material applied to this primitive.
    pub material: Material,
    /// Topology of the primitive's vertices.
    pub mode: Mode,
}

impl Primitive {
    /// Vertex count: the minimum `count` across this primitive's attribute
    /// accessors, or zero if it has none.
    pub fn vertex_count(&self) -> u64 {
        self.attributes
            .values()
            .map(|a| a.borrow().count)
            .min()
            .unwrap_or(0)
    }

    /// The `(min, max)` bounding box from the `POSITION` accessor, when both
    /// bounds were declared in the source asset.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let position = self.attributes.get(&Semantic::Position)?;
        let a = position.borrow();
        let min = a.min.as_ref()?;
        let max = a.max.as_ref()?;
        if min.len() != 3 || max.len() != 3 {
            return None;
        }
        Some(([min[0], min[1], min[2]], [max[0], max[1], max[2]]))
    }
}

/// Metallic-roughness PBR parameters and texture slots, resolved from JSON
/// indices to shared texture handles.
pub struct Material {
    /// RGBA base color factor.
    pub base_color_factor: [f32; 4],
    /// Base color texture slot.
    pub base_color_texture: Option<Rc<RefCell<TextureInfo>>>,
    /// Metalness, in `[0, 1]`.
    pub metallic_factor: f32,
    /// Roughness, in `[0, 1]`.
    pub roughness_factor: f32,
    /// Combined metallic/roughness texture slot.
    pub metallic_roughness_texture: Option<Rc<RefCell<TextureInfo>>>,
    /// Tangent-space normal map slot.
    pub normal_texture: Option<Rc<RefCell<TextureInfo>>>,
    /// Ambient occlusion map slot.
    pub occlusion_texture: Option<Rc<RefCell<TextureInfo>>>,
    /// Emissive color map slot.
    pub emissive_texture: Option<Rc<RefCell<TextureInfo>>>,
    /// RGB emissive color factor.
    pub emissive_factor: [f32; 3],
    /// Alpha rendering mode.
    pub alpha_mode: crate::json::material::AlphaMode,
    /// Cutoff used in `Mask` alpha mode.
    pub alpha_cutoff: f32,
    /// Whether back-face culling is disabled.
    pub double_sided: bool,
}

impl Default for Material {
    /// The glTF 2.0 default material: fully opaque white, no textures.
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: crate::json::material::AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
        }
    }
}

/// An ordered list of primitives rendered together.
pub struct Mesh {
    /// The primitives that make up this mesh.
    pub primitives: Vec<Primitive>,
}

/// A node in the resolved node hierarchy, stored in [`Content::nodes`] and
/// addressed by arena index (children reference siblings, not ownership, so
/// a node reachable from more than one parent is represented once).
pub struct Node {
    /// Column-major local transform, already composed from `matrix` or TRS.
    pub local_matrix: Mat4,
    /// The mesh instantiated by this node, if any.
    pub mesh: Option<Rc<Mesh>>,
    /// Indices into [`Content::nodes`] of this node's children.
    pub children: Vec<usize>,
}

/// A set of root nodes forming one renderable scene.
pub struct Scene {
    /// Arena indices of this scene's root nodes.
    pub roots: Vec<usize>,
}

/// The fully resolved result of a load: `{scenes[], default_scene_index}`.
pub struct Content {
    /// All nodes, addressed by arena index from `scenes` and `Node::children`.
    pub nodes: Vec<Node>,
    /// All scenes declared by the asset.
    pub scenes: Vec<Scene>,
    /// Index of the default scene, or `-1` when the asset declared none.
    pub default_scene_index: i32,
}

impl Content {
    /// The scene to render when the caller didn't request a specific index:
    /// the declared default, or scene `0` if there is no default but at
    /// least one scene exists.
    pub fn default_scene(&self) -> Option<&Scene> {
        if self.default_scene_index >= 0 {
            self.scenes.get(self.default_scene_index as usize)
        } else {
            self.scenes.first()
        }
    }
}
