//! Primitive Builder (C10): walks a resolved [`crate::scene::Content`],
//! composes node-to-scene transforms, and emits renderer-ready draw
//! primitives, handing sub-buffers and decoded images off to an opaque GPU
//! backend.

use std::collections::HashMap;
use std::rc::Rc;

use crate::accessor::{BufferSource, Usage};
use crate::buffer::SplitBuffer;
use crate::math::{self, Mat4};
use crate::scene::{Content, Material, Primitive, Scene};
use crate::texture::{Texture, TextureInfoKind};

/// External collaborator constructing GPU-side resources from decoded CPU
/// data. The pipeline never inspects `MeshBuffer`/`Texture` beyond caching
/// them by identity; actual upload is entirely this trait's business.
pub trait GpuBackend {
    /// A GPU-resident vertex or index buffer.
    type MeshBuffer;
    /// A GPU-resident, sampler-bound texture.
    type Texture;

    /// Uploads `bytes` as a mesh buffer tagged for the given usage.
    fn create_mesh_buffer(&self, bytes: &[u8], usage: Usage) -> Self::MeshBuffer;

    /// Uploads `image` as a texture using `sampler`'s filter/wrap settings,
    /// defaulting unset filters to linear / linear-mipmap-linear.
    fn create_texture(&self, image: &crate::source::DecodedImage, sampler: &crate::json::texture::Sampler) -> Self::Texture;
}

/// A fixed-function material record, resolved from [`Material`] for
/// consumption by a renderer (no behavior beyond holding factors/texture
/// handles).
pub struct MaterialProperties<T> {
    /// RGBA base color factor.
    pub base_color_factor: [f32; 4],
    /// Base color texture, if bound.
    pub base_color_texture: Option<(Rc<T>, u32)>,
    /// Metalness factor.
    pub metallic_factor: f32,
    /// Roughness factor.
    pub roughness_factor: f32,
    /// Metallic-roughness texture, if bound.
    pub metallic_roughness_texture: Option<(Rc<T>, u32)>,
    /// Normal map texture and scale, if bound.
    pub normal_texture: Option<(Rc<T>, u32, f32)>,
    /// Occlusion map texture and strength, if bound.
    pub occlusion_texture: Option<(Rc<T>, u32, f32)>,
    /// Emissive texture, if bound.
    pub emissive_texture: Option<(Rc<T>, u32)>,
    /// RGB emissive color factor.
    pub emissive_factor: [f32; 3],
    /// Alpha rendering mode.
    pub alpha_mode: crate::json::material::AlphaMode,
    /// Cutoff used in `Mask` alpha mode.
    pub alpha_cutoff: f32,
    /// Whether back-face culling is disabled.
    pub double_sided: bool,
}

/// One renderer-ready draw primitive: node-to-scene transform, mesh buffers,
/// material, bounds, and draw mode.
pub struct DrawPrimitive<G: GpuBackend> {
    /// Composed node-to-scene transform.
    pub node_to_scene: Mat4,
    /// Attribute accessors mapped to renderer attribute ids, sharing the mesh
    /// buffer cached for their backing sub-buffer.
    pub attributes: Vec<(String, Rc<G::MeshBuffer>, u64, u64)>,
    /// Index buffer, if the primitive is indexed: `(buffer, offset, count)`.
    pub indices: Option<(Rc<G::MeshBuffer>, u64, u64)>,
    /// Resolved material.
    pub material: MaterialProperties<G::Texture>,
    /// Vertex count.
    pub vertex_count: u64,
    /// Bounding box `(min, max)`, and its midpoint pivot, when available.
    pub bounds: Option<([f32; 3], [f32; 3], [f32; 3])>,
    /// Draw topology.
    pub mode: crate::json::mesh::Mode,
}

fn ptr_key<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}

/// Caches GPU mesh buffers and textures by source identity while walking a
/// [`Content`] tree, so a sub-buffer or image shared by many primitives is
/// only uploaded once.
pub struct PrimitiveBuilder<'a, G: GpuBackend> {
    gpu: &'a G,
    mesh_buffers: HashMap<usize, Rc<G::MeshBuffer>>,
    textures: HashMap<usize, Rc<G::Texture>>,
}

impl<'a, G: GpuBackend> PrimitiveBuilder<'a, G> {
    /// Creates a builder backed by `gpu`.
    pub fn new(gpu: &'a G) -> Self {
        Self {
            gpu,
            mesh_buffers: HashMap::new(),
            textures: HashMap::new(),
        }
    }

    /// Walks every root node of `scene` and its descendants, emitting one
    /// [`DrawPrimitive`] per primitive encountered.
    pub fn build_scene(&mut self, content: &Content, scene: &Scene) -> Vec<DrawPrimitive<G>> {
        let mut out = Vec::new();
        for &root in &scene.roots {
            self.visit(content, root, math::IDENTITY, &mut out);
        }
        out
    }

    fn visit(&mut self, content: &Content, node_index: usize, parent_to_scene: Mat4, out: &mut Vec<DrawPrimitive<G>>) {
        let Some(node) = content.nodes.get(node_index) else { return };
        let node_to_scene = math::mul(&parent_to_scene, &node.local_matrix);
        if let Some(mesh) = &node.mesh {
            for primitive in &mesh.primitives {
                out.push(self.build_primitive(primitive, node_to_scene));
            }
        }
        for &child in &node.children {
            self.visit(content, child, node_to_scene, out);
        }
    }

    fn mesh_buffer_for(&mut self, sub_buffer: &Rc<SplitBuffer>) -> Rc<G::MeshBuffer> {
        let key = ptr_key(sub_buffer);
        if let Some(existing) = self.mesh_buffers.get(&key) {
            return existing.clone();
        }
        let created = Rc::new(self.gpu.create_mesh_buffer(&sub_buffer.bytes, sub_buffer.usage));
        self.mesh_buffers.insert(key, created.clone());
        created
    }

    fn texture_for(&mut self, texture: &Rc<std::cell::RefCell<Texture>>) -> Option<Rc<G::Texture>> {
        let key = ptr_key(texture);
        if let Some(existing) = self.textures.get(&key) {
            return Some(existing.clone());
        }
        let borrowed = texture.borrow();
        let decoded = borrowed.decoded.borrow();
        let image = decoded.as_ref()?;
        let created = Rc::new(self.gpu.create_texture(image, &borrowed.sampler));
        drop(decoded);
        drop(borrowed);
        self.textures.insert(key, created.clone());
        Some(created)
    }

    fn resolve_texture_slot(
        &mut self,
        info: &Option<Rc<std::cell::RefCell<crate::texture::TextureInfo>>>,
    ) -> Option<(Rc<G::Texture>, u32)> {
        let info = info.as_ref()?;
        let info = info.borrow();
        let texture = self.texture_for(&info.texture)?;
        Some((texture, info.tex_coord))
    }

    fn build_primitive(&mut self, primitive: &Primitive, node_to_scene: Mat4) -> DrawPrimitive<G> {
        let mut attributes = Vec::with_capacity(primitive.attributes.len());
        for (semantic, accessor) in &primitive.attributes {
            let a = accessor.borrow();
            let BufferSource::Split(sub_buffer) = &a.buffer_source else {
                continue;
            };
            let mesh_buffer = self.mesh_buffer_for(sub_buffer);
            attributes.push((
                semantic.renderer_attribute().to_string(),
                mesh_buffer,
                a.byte_offset,
                a.count,
            ));
        }

        let indices = primitive.indices.as_ref().and_then(|accessor| {
            let a = accessor.borrow();
            let BufferSource::Split(sub_buffer) = &a.buffer_source else {
                return None;
            };
            Some((self.mesh_buffer_for(sub_buffer), a.byte_offset, a.count))
        });

        let bounds = primitive.bounding_box().map(|(min, max)| {
            let pivot = [
                (min[0] + max[0]) / 2.0,
                (min[1] + max[1]) / 2.0,
                (min[2] + max[2]) / 2.0,
            ];
            (min, max, pivot)
        });

        DrawPrimitive {
            node_to_scene,
            attributes,
            indices,
            material: self.build_material_properties(&primitive.material),
            vertex_count: primitive.vertex_count(),
            bounds,
            mode: primitive.mode,
        }
    }

    fn build_material_properties(&mut self, material: &Material) -> MaterialProperties<G::Texture> {
        MaterialProperties {
            base_color_factor: material.base_color_factor,
            base_color_texture: self.resolve_texture_slot(&material.base_color_texture),
            metallic_factor: material.metallic_factor,
            roughness_factor: material.roughness_factor,
            metallic_roughness_texture: self.resolve_texture_slot(&material.metallic_roughness_texture),
            normal_texture: material.normal_texture.as_ref().and_then(|info| {
                let scale = match info.borrow().kind {
                    TextureInfoKind::Normal(scale) => scale,
                    _ => 1.0,
                };
                self.resolve_texture_slot(&Some(info.clone())).map(|(tex, coord)| (tex, coord, scale))
            }),
            occlusion_texture: material.occlusion_texture.as_ref().and_then(|info| {
                let strength = match info.borrow().kind {
                    TextureInfoKind::Occlusion(strength) => strength,
                    _ => 1.0,
                };
                self.resolve_texture_slot(&Some(info.clone())).map(|(tex, coord)| (tex, coord, strength))
            }),
            emissive_texture: self.resolve_texture_slot(&material.emissive_texture),
            emissive_factor: material.emissive_factor,
            alpha_mode: material.alpha_mode,
            alpha_cutoff: material.alpha_cutoff,
            double_sided: material.double_sided,
        }
    }
}
