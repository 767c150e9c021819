//! The Load Context (C8): the single owning coordinator that parses the
//! JSON body synchronously, drives concurrent buffer/image fetches through
//! one `FuturesUnordered`, and runs the post-load pipeline exactly once all
//! of them settle.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use futures::future::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::accessor::{Accessor, BufferSource, Usage};
use crate::buffer::BufferEntry;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::image::ImageEntry;
use crate::json;
use crate::math;
use crate::scene;
use crate::source::{DecodedImage, Source};
use crate::texture::{Texture, TextureInfo, TextureInfoKind};
use crate::uri::{self, Uri};

fn validate_version(asset: &json::Asset) -> Result<()> {
    match asset.major_minor() {
        Some((major, _)) if major >= 2 => Ok(()),
        _ => Err(Error::VersionUnsupported(asset.version.clone())),
    }
}

struct Context {
    root: json::Root,
    base_uri: String,
    validation: crate::config::ValidationStrategy,
    buffer_entries: RefCell<Vec<Option<Rc<BufferEntry>>>>,
    image_entries: RefCell<Vec<Option<Rc<ImageEntry>>>>,
    accessor_cache: RefCell<Vec<Option<Rc<RefCell<Accessor>>>>>,
    texture_cache: RefCell<Vec<Option<Rc<RefCell<Texture>>>>>,
    mesh_cache: RefCell<Vec<Option<Rc<scene::Mesh>>>>,
    failed: Cell<bool>,
}

impl Context {
    fn new(root: json::Root, base_uri: String, validation: crate::config::ValidationStrategy) -> Self {
        let buffer_count = root.buffers.len();
        let image_count = root.images.len();
        let accessor_count = root.accessors.len();
        let texture_count = root.textures.len();
        let mesh_count = root.meshes.len();
        Self {
            root,
            base_uri,
            validation,
            buffer_entries: RefCell::new((0..buffer_count).map(|_| None).collect()),
            image_entries: RefCell::new((0..image_count).map(|_| None).collect()),
            accessor_cache: RefCell::new((0..accessor_count).map(|_| None).collect()),
            texture_cache: RefCell::new((0..texture_count).map(|_| None).collect()),
            mesh_cache: RefCell::new((0..mesh_count).map(|_| None).collect()),
            failed: Cell::new(false),
        }
    }

    fn find_buffer(&self, index: usize) -> Result<Rc<BufferEntry>> {
        let mut entries = self.buffer_entries.borrow_mut();
        let slot = entries
            .get_mut(index)
            .ok_or_else(|| Error::MalformedAsset(format!("buffer index {index} out of range")))?;
        if slot.is_none() {
            let buf = &self.root.buffers[index];
            if buf.uri.is_none() {
                return Err(Error::MalformedAsset(format!(
                    "buffer {index} has no uri (.glb BIN chunks are unsupported)"
                )));
            }
            *slot = Some(Rc::new(BufferEntry::new(index, buf.byte_length)));
        }
        Ok(slot.clone().unwrap())
    }

    fn find_image(&self, index: usize) -> Result<Rc<ImageEntry>> {
        let mut entries = self.image_entries.borrow_mut();
        let slot = entries
            .get_mut(index)
            .ok_or_else(|| Error::MalformedAsset(format!("image index {index} out of range")))?;
        if slot.is_none() {
            let img = &self.root.images[index];
            if img.uri.is_none() {
                return Err(Error::MalformedAsset(format!(
                    "image {index} has no uri (bufferView-sourced images are unsupported)"
                )));
            }
            *slot = Some(Rc::new(ImageEntry::new(index)));
        }
        Ok(slot.clone().unwrap())
    }

    fn accessor_handle(&self, index: usize) -> Result<Rc<RefCell<Accessor>>> {
        {
            let cache = self.accessor_cache.borrow();
            if let Some(Some(handle)) = cache.get(index) {
                return Ok(handle.clone());
            }
        }
        let json_accessor = self
            .root
            .accessors
            .get(index)
            .ok_or_else(|| Error::MalformedAsset(format!("accessor index {index} out of range")))?;
        let view = self
            .root
            .buffer_views
            .get(json_accessor.buffer_view.value())
            .ok_or_else(|| Error::MalformedAsset("accessor references an out-of-range bufferView".into()))?;
        let buffer_idx = view.buffer.value();
        let buffer_entry = self.find_buffer(buffer_idx)?;

        let byte_offset = view.byte_offset + json_accessor.byte_offset;
        let min = json_accessor
            .min
            .as_ref()
            .and_then(|v| json::accessor::read_f32_array(v, json_accessor.type_.multiplicity()));
        let max = json_accessor
            .max
            .as_ref()
            .and_then(|v| json::accessor::read_f32_array(v, json_accessor.type_.multiplicity()));

        let accessor = Accessor {
            original_index: index,
            original_buffer_index: buffer_idx,
            buffer_source: BufferSource::Original(buffer_idx),
            byte_offset,
            byte_stride: view.byte_stride,
            component_type: json_accessor.component_type,
            type_: json_accessor.type_,
            count: json_accessor.count,
            normalized: json_accessor.normalized,
            min,
            max,
        };

        if !matches!(self.validation, crate::config::ValidationStrategy::Skip) {
            let (_, end) = accessor.extent();
            if end > buffer_entry.declared_len() {
                return Err(Error::MalformedAsset(format!(
                    "accessor {index} addresses bytes [{byte_offset}, {end}) beyond buffer {buffer_idx}'s declared length {}",
                    buffer_entry.declared_len()
                )));
            }
        }

        let handle = Rc::new(RefCell::new(accessor));
        self.accessor_cache.borrow_mut()[index] = Some(handle.clone());
        Ok(handle)
    }

    fn register_accessor_usage(&self, handle: &Rc<RefCell<Accessor>>, usage: Usage) -> Result<()> {
        let buffer_idx = handle.borrow().original_buffer_index;
        self.find_buffer(buffer_idx)?.add_accessor(handle.clone(), usage);
        Ok(())
    }

    fn texture_handle(&self, index: usize) -> Result<Rc<RefCell<Texture>>> {
        {
            let cache = self.texture_cache.borrow();
            if let Some(Some(handle)) = cache.get(index) {
                return Ok(handle.clone());
            }
        }
        let json_tex = self
            .root
            .textures
            .get(index)
            .ok_or_else(|| Error::MalformedAsset(format!("texture index {index} out of range")))?;
        let sampler = match &json_tex.sampler {
            Some(idx) => self
                .root
                .samplers
                .get(idx.value())
                .cloned()
                .ok_or_else(|| Error::MalformedAsset("texture references an out-of-range sampler".into()))?,
            None => json::texture::Sampler::default(),
        };
        let source_image_index = json_tex.source.value();
        let image_entry = self.find_image(source_image_index)?;

        let handle = Rc::new(RefCell::new(Texture {
            sampler,
            source_image_index,
            decoded: image_entry.decoded_handle(),
        }));
        self.texture_cache.borrow_mut()[index] = Some(handle.clone());
        Ok(handle)
    }

    fn texture_info_handle(
        &self,
        index: json::Index<json::texture::Texture>,
        tex_coord: u32,
        kind: TextureInfoKind,
    ) -> Result<Rc<RefCell<TextureInfo>>> {
        let texture = self.texture_handle(index.value())?;
        let source_image_index = texture.borrow().source_image_index;
        let info = Rc::new(RefCell::new(TextureInfo {
            texture,
            tex_coord,
            kind,
        }));
        self.find_image(source_image_index)?.add_texture_info(info.clone());
        Ok(info)
    }

    fn build_material(&self, m: &json::material::Material) -> Result<scene::Material> {
        let pbr = &m.pbr_metallic_roughness;
        Ok(scene::Material {
            base_color_factor: pbr.base_color_factor,
            base_color_texture: pbr
                .base_color_texture
                .as_ref()
                .map(|i| self.texture_info_handle(i.index, i.tex_coord, TextureInfoKind::Base))
                .transpose()?,
            metallic_factor: pbr.metallic_factor,
            roughness_factor: pbr.roughness_factor,
            metallic_roughness_texture: pbr
                .metallic_roughness_texture
                .as_ref()
                .map(|i| self.texture_info_handle(i.index, i.tex_coord, TextureInfoKind::Base))
                .transpose()?,
            normal_texture: m
                .normal_texture
                .as_ref()
                .map(|i| self.texture_info_handle(i.index, i.tex_coord, TextureInfoKind::Normal(i.scale)))
                .transpose()?,
            occlusion_texture: m
                .occlusion_texture
                .as_ref()
                .map(|i| self.texture_info_handle(i.index, i.tex_coord, TextureInfoKind::Occlusion(i.strength)))
                .transpose()?,
            emissive_texture: m
                .emissive_texture
                .as_ref()
                .map(|i| self.texture_info_handle(i.index, i.tex_coord, TextureInfoKind::Base))
                .transpose()?,
            emissive_factor: m.emissive_factor,
            alpha_mode: m.alpha_mode,
            alpha_cutoff: m.alpha_cutoff,
            double_sided: m.double_sided,
        })
    }

    fn mesh_handle(&self, index: usize) -> Result<Rc<scene::Mesh>> {
        {
            let cache = self.mesh_cache.borrow();
            if let Some(Some(handle)) = cache.get(index) {
                return Ok(handle.clone());
            }
        }
        let json_mesh = self
            .root
            .meshes
            .get(index)
            .ok_or_else(|| Error::MalformedAsset(format!("mesh index {index} out of range")))?;

        let mut primitives = Vec::with_capacity(json_mesh.primitives.len());
        for prim in &json_mesh.primitives {
            let mut attributes = BTreeMap::new();
            for (semantic, accessor_idx) in &prim.attributes {
                let handle = self.accessor_handle(accessor_idx.value())?;
                self.register_accessor_usage(&handle, Usage::Attribute)?;
                attributes.insert(semantic.clone(), handle);
            }
            let indices = match &prim.indices {
                Some(idx) => {
                    let handle = self.accessor_handle(idx.value())?;
                    self.register_accessor_usage(&handle, Usage::Index)?;
                    Some(handle)
                }
                None => None,
            };
            let material = match &prim.material {
                Some(idx) => {
                    let json_material = self
                        .root
                        .materials
                        .get(idx.value())
                        .ok_or_else(|| Error::MalformedAsset("primitive references an out-of-range material".into()))?;
                    self.build_material(json_material)?
                }
                None => scene::Material::default(),
            };
            primitives.push(scene::Primitive {
                attributes,
                indices,
                material,
                mode: prim.mode,
            });
        }

        let handle = Rc::new(scene::Mesh { primitives });
        self.mesh_cache.borrow_mut()[index] = Some(handle.clone());
        Ok(handle)
    }

    fn build_node(&self, json_node: &json::scene::Node) -> Result<scene::Node> {
        let local_matrix = match json_node.matrix {
            Some(m) => {
                let mut mat = math::IDENTITY;
                for col in 0..4 {
                    for row in 0..4 {
                        mat[col][row] = m[col * 4 + row];
                    }
                }
                mat
            }
            None => math::trs_to_matrix(
                json_node.translation.unwrap_or([0.0, 0.0, 0.0]),
                json_node.rotation.unwrap_or([0.0, 0.0, 0.0, 1.0]),
                json_node.scale.unwrap_or([1.0, 1.0, 1.0]),
            ),
        };
        let mesh = match &json_node.mesh {
            Some(idx) => Some(self.mesh_handle(idx.value())?),
            None => None,
        };
        Ok(scene::Node {
            local_matrix,
            mesh,
            children: json_node.children.iter().map(|i| i.value()).collect(),
        })
    }

    /// Walks the whole JSON node/mesh/primitive graph, registering every
    /// accessor and texture-info with this Context along the way. Arena
    /// indices into the returned node list equal the JSON node indices.
    fn build_entity_tree(&self) -> Result<(Vec<scene::Node>, Vec<scene::Scene>, i32)> {
        let mut nodes = Vec::with_capacity(self.root.nodes.len());
        for json_node in &self.root.nodes {
            nodes.push(self.build_node(json_node)?);
        }
        let scenes = self
            .root
            .scenes
            .iter()
            .map(|s| scene::Scene {
                roots: s.nodes.iter().map(|i| i.value()).collect(),
            })
            .collect();
        let default_scene_index = match &self.root.scene {
            Some(idx) => idx.value() as i32,
            None => -1,
        };
        Ok((nodes, scenes, default_scene_index))
    }
}

enum FetchOutcome {
    Buffer(usize, Result<Vec<u8>>),
    Image(usize, Result<DecodedImage>),
}

/// Parses and loads a glTF 2.0 asset, driving every buffer/image fetch
/// concurrently and running the endian-rewrite/split/dedupe pipeline exactly
/// once they all settle.
///
/// `requested_scene_index`, when given, is validated against the asset's
/// scene count but otherwise has no effect on the returned [`scene::Content`]
/// — every scene is resolved regardless, matching `§8` boundary property 10.
pub async fn load<S: Source>(
    json_text: &[u8],
    source: &S,
    config: Config,
    requested_scene_index: Option<usize>,
) -> Result<scene::Content> {
    let root = json::Root::from_slice(json_text)?;
    validate_version(&root.asset)?;
    if let Some(i) = requested_scene_index {
        if i >= root.scenes.len() {
            return Err(Error::SceneIndexOutOfRange {
                requested: i,
                scene_count: root.scenes.len(),
            });
        }
    }

    let base_uri = config.base_uri.clone().unwrap_or_default();
    let ctx = Context::new(root, base_uri, config.validation);
    let (nodes, scenes, default_scene_index) = ctx.build_entity_tree()?;

    log::debug!(
        "body parsed: {} node(s), {} scene(s)",
        nodes.len(),
        scenes.len()
    );

    let buffer_targets: Vec<(usize, Uri)> = ctx
        .buffer_entries
        .borrow()
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
        .map(|i| {
            let candidate = ctx.root.buffers[i].uri.as_deref().unwrap();
            (i, uri::resolve(candidate, &ctx.base_uri))
        })
        .collect();
    let image_targets: Vec<(usize, Uri, Option<String>)> = ctx
        .image_entries
        .borrow()
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
        .map(|i| {
            let img = &ctx.root.images[i];
            let candidate = img.uri.as_deref().unwrap();
            (i, uri::resolve(candidate, &ctx.base_uri), img.mime_type.clone())
        })
        .collect();

    let mut futs: FuturesUnordered<Pin<Box<dyn Future<Output = FetchOutcome> + '_>>> = FuturesUnordered::new();
    for (index, target) in &buffer_targets {
        let index = *index;
        log::debug!("dispatching fetch for buffer {index}");
        futs.push(Box::pin(
            source.fetch_buffer(target).map(move |r| FetchOutcome::Buffer(index, r)),
        ));
    }
    for (index, target, mime) in &image_targets {
        let index = *index;
        log::debug!("dispatching fetch for image {index}");
        futs.push(Box::pin(
            source
                .fetch_image(target, mime.as_deref())
                .map(move |r| FetchOutcome::Image(index, r)),
        ));
    }

    while let Some(outcome) = futs.next().await {
        match outcome {
            FetchOutcome::Buffer(i, Ok(bytes)) => {
                ctx.buffer_entries.borrow()[i].as_ref().unwrap().set_bytes(bytes);
            }
            FetchOutcome::Buffer(i, Err(e)) => {
                log::warn!("buffer {i} fetch failed: {e}");
                ctx.failed.set(true);
            }
            FetchOutcome::Image(i, Ok(image)) => {
                ctx.image_entries.borrow()[i].as_ref().unwrap().set_decoded(image);
            }
            FetchOutcome::Image(i, Err(e)) => {
                log::warn!("image {i} fetch failed: {e}");
                ctx.failed.set(true);
            }
        }
    }

    if ctx.failed.get() {
        return Err(Error::FetchFailed);
    }

    log::info!("post-load pipeline started: endian rewrite, buffer split, image dedup");
    for entry in ctx.buffer_entries.borrow().iter().flatten() {
        entry.endian_rewrite();
        entry.split_and_rebuild();
    }
    for entry in ctx.image_entries.borrow().iter().flatten() {
        entry.dedupe();
    }
    log::info!("post-load pipeline completed: asset loaded with {} node(s), {} scene(s)", nodes.len(), scenes.len());
    Ok(scene::Content {
        nodes,
        scenes,
        default_scene_index,
    })
}
