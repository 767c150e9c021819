//! End-to-end scenarios driving [`asset_pipeline::load`] against an
//! in-memory [`Source`] double, covering the boundary behaviors a real
//! filesystem/network `Source` implementation would also have to satisfy:
//! interleaved attribute splitting, shared-accessor sub-buffer identity,
//! shared-image texture dedup, and fetch-failure aggregation.

use std::collections::HashMap;
use std::rc::Rc;

use byteorder::{LittleEndian, WriteBytesExt};
use futures::executor::block_on;
use serde_json::json;

use asset_pipeline::builder::{GpuBackend, PrimitiveBuilder};
use asset_pipeline::config::Config;
use asset_pipeline::error::Error;
use asset_pipeline::source::{DecodedImage, FetchFuture, Source};
use asset_pipeline::uri::Uri;

/// A 1x1 transparent PNG, the smallest valid payload `image` will decode.
const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNk+A8AAQUBAScY42YAAAAASUVORK5CYII=";

struct InMemorySource {
    buffers: HashMap<String, Vec<u8>>,
    images: HashMap<String, Vec<u8>>,
}

impl InMemorySource {
    fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            images: HashMap::new(),
        }
    }

    fn with_buffer(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.buffers.insert(name.to_string(), bytes);
        self
    }

    fn with_image(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(name.to_string(), bytes);
        self
    }
}

impl Source for InMemorySource {
    fn fetch_buffer<'a>(&'a self, uri: &'a Uri) -> FetchFuture<'a, Vec<u8>> {
        Box::pin(async move {
            self.buffers
                .get(uri.as_str())
                .cloned()
                .ok_or_else(|| Error::MalformedAsset(format!("no buffer registered for {}", uri.as_str())))
        })
    }

    fn fetch_image<'a>(&'a self, uri: &'a Uri, _mime_type: Option<&'a str>) -> FetchFuture<'a, DecodedImage> {
        Box::pin(async move {
            let bytes = self
                .images
                .get(uri.as_str())
                .ok_or_else(|| Error::MalformedAsset(format!("no image registered for {}", uri.as_str())))?;
            let dynamic = image::load_from_memory(bytes)?;
            Ok(DecodedImage(dynamic))
        })
    }
}

fn f32le(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.write_f32::<LittleEndian>(*v).unwrap();
    }
    out
}

fn u16le(values: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for v in values {
        out.write_u16::<LittleEndian>(*v).unwrap();
    }
    out
}

struct NullGpu;

impl GpuBackend for NullGpu {
    type MeshBuffer = Vec<u8>;
    type Texture = ();

    fn create_mesh_buffer(&self, bytes: &[u8], _usage: asset_pipeline::accessor::Usage) -> Vec<u8> {
        bytes.to_vec()
    }

    fn create_texture(&self, _image: &DecodedImage, _sampler: &asset_pipeline::json::texture::Sampler) {}
}

/// S1: a minimal single-triangle asset loads into one node/one scene, with
/// the expected vertex count and bounding box.
#[test]
fn minimal_triangle_loads() {
    let positions = f32le(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    let indices = u16le(&[0, 1, 2]);
    let mut buf0 = positions.clone();
    buf0.extend_from_slice(&indices);

    let doc = json!({
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": buf0.len(), "uri": "buf0.bin"}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": positions.len()},
            {"buffer": 0, "byteOffset": positions.len(), "byteLength": indices.len()},
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"},
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}],
        "scene": 0,
    });

    let source = InMemorySource::new().with_buffer("buf0.bin", buf0);
    let content = block_on(asset_pipeline::load(
        doc.to_string().as_bytes(),
        &source,
        Config::default(),
        None,
    ))
    .unwrap();

    assert_eq!(content.nodes.len(), 1);
    assert_eq!(content.scenes.len(), 1);
    assert_eq!(content.default_scene_index, 0);

    let scene = content.default_scene().unwrap();
    assert_eq!(scene.roots, vec![0]);
    let mesh = content.nodes[0].mesh.as_ref().unwrap();
    assert_eq!(mesh.primitives[0].vertex_count(), 3);
    assert_eq!(
        mesh.primitives[0].bounding_box(),
        Some(([0.0, 0.0, 0.0], [1.0, 1.0, 0.0]))
    );
}

/// S2/S5: interleaved POSITION+NORMAL accessors addressing overlapping
/// extents coalesce into one packed sub-buffer, and a POSITION accessor
/// shared by two primitives produces one shared sub-buffer (builder caches
/// by source identity, not by primitive).
#[test]
fn interleaved_attributes_split_and_shared_accessor_dedupes_in_builder() {
    let mut interleaved = Vec::new();
    // vertex 0: pos, normal; vertex 1: pos, normal (stride 24).
    interleaved.extend_from_slice(&f32le(&[0.0, 0.0, 0.0]));
    interleaved.extend_from_slice(&f32le(&[0.0, 1.0, 0.0]));
    interleaved.extend_from_slice(&f32le(&[1.0, 0.0, 0.0]));
    interleaved.extend_from_slice(&f32le(&[0.0, 1.0, 0.0]));
    let indices = u16le(&[0, 1]);

    let doc = json!({
        "asset": {"version": "2.0"},
        "buffers": [
            {"byteLength": interleaved.len(), "uri": "interleaved.bin"},
            {"byteLength": indices.len(), "uri": "indices.bin"},
        ],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": interleaved.len(), "byteStride": 24},
            {"buffer": 1, "byteOffset": 0, "byteLength": indices.len()},
        ],
        "accessors": [
            {"bufferView": 0, "byteOffset": 0, "componentType": 5126, "count": 2, "type": "VEC3"},
            {"bufferView": 0, "byteOffset": 12, "componentType": 5126, "count": 2, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5123, "count": 2, "type": "SCALAR"},
        ],
        "meshes": [
            {"primitives": [{"attributes": {"POSITION": 0, "NORMAL": 1}, "indices": 2}]},
            {"primitives": [{"attributes": {"POSITION": 0}, "indices": 2}]},
        ],
        "nodes": [{"mesh": 0}, {"mesh": 1}],
        "scenes": [{"nodes": [0, 1]}],
        "scene": 0,
    });

    let source = InMemorySource::new()
        .with_buffer("interleaved.bin", interleaved)
        .with_buffer("indices.bin", indices);
    let content = block_on(asset_pipeline::load(
        doc.to_string().as_bytes(),
        &source,
        Config::default(),
        None,
    ))
    .unwrap();

    let gpu = NullGpu;
    let mut gpu_builder = PrimitiveBuilder::new(&gpu);
    let scene = content.default_scene().unwrap();
    let draws = gpu_builder.build_scene(&content, scene);
    assert_eq!(draws.len(), 2);

    let position_buffer = |draw: &asset_pipeline::builder::DrawPrimitive<NullGpu>| {
        draw.attributes
            .iter()
            .find(|(name, ..)| name.as_str() == "a_position")
            .map(|(_, buf, ..)| buf.clone())
            .unwrap()
    };
    assert!(Rc::ptr_eq(&position_buffer(&draws[0]), &position_buffer(&draws[1])));
    assert_eq!(draws[0].attributes.len(), 2);
    assert_eq!(draws[1].attributes.len(), 1);
}

/// S3: two textures that share a source image collapse onto one `Texture`
/// (and its sampler) once the pipeline's image-dedup stage runs.
#[test]
fn shared_image_dedupes_onto_first_registered_texture() {
    let positions = f32le(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    let indices = u16le(&[0, 1, 2]);
    let mut buf0 = positions.clone();
    buf0.extend_from_slice(&indices);
    let png = base64::decode(TINY_PNG_BASE64).unwrap();

    let doc = json!({
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": buf0.len(), "uri": "buf0.bin"}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": positions.len()},
            {"buffer": 0, "byteOffset": positions.len(), "byteLength": indices.len()},
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"},
        ],
        "images": [{"uri": "img.png"}],
        "samplers": [{"magFilter": 9728}, {"magFilter": 9729}],
        "textures": [{"sampler": 0, "source": 0}, {"sampler": 1, "source": 0}],
        "materials": [
            {"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}},
            {"pbrMetallicRoughness": {"baseColorTexture": {"index": 1}}},
        ],
        "meshes": [{
            "primitives": [
                {"attributes": {"POSITION": 0}, "indices": 1, "material": 0},
                {"attributes": {"POSITION": 0}, "indices": 1, "material": 1},
            ],
        }],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}],
        "scene": 0,
    });

    let source = InMemorySource::new().with_buffer("buf0.bin", buf0).with_image("img.png", png);
    let content = block_on(asset_pipeline::load(
        doc.to_string().as_bytes(),
        &source,
        Config::default(),
        None,
    ))
    .unwrap();

    let mesh = content.nodes[0].mesh.as_ref().unwrap();
    let tex_a = mesh.primitives[0].material.base_color_texture.as_ref().unwrap();
    let tex_b = mesh.primitives[1].material.base_color_texture.as_ref().unwrap();
    assert!(Rc::ptr_eq(&tex_a.borrow().texture, &tex_b.borrow().texture));
    // The first-registered texture (sampler 0, NEAREST) is the survivor.
    assert_eq!(
        tex_b.borrow().texture.borrow().sampler.mag_filter,
        Some(asset_pipeline::json::texture::MagFilter::Nearest)
    );
}

/// S6: a buffer fetch failure is reported even though the sibling image
/// fetch in the same asset would have succeeded — every outstanding fetch is
/// still drained before the aggregated error surfaces.
#[test]
fn fetch_failure_is_reported_even_alongside_a_would_be_success() {
    let png = base64::decode(TINY_PNG_BASE64).unwrap();
    let doc = json!({
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": 12, "uri": "missing.bin"}],
        "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 12}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 1, "type": "VEC3"}],
        "images": [{"uri": "present.png"}],
        "samplers": [{}],
        "textures": [{"sampler": 0, "source": 0}],
        "materials": [{"pbrMetallicRoughness": {"baseColorTexture": {"index": 0}}}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "material": 0}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}],
        "scene": 0,
    });

    let source = InMemorySource::new().with_image("present.png", png);
    let result = block_on(asset_pipeline::load(
        doc.to_string().as_bytes(),
        &source,
        Config::default(),
        None,
    ));
    assert!(matches!(result, Err(Error::FetchFailed)));
}

/// An unsupported major version aborts before any fetch is attempted.
#[test]
fn unsupported_version_is_rejected_up_front() {
    let doc = json!({"asset": {"version": "1.0"}});
    let source = InMemorySource::new();
    let result = block_on(asset_pipeline::load(
        doc.to_string().as_bytes(),
        &source,
        Config::default(),
        None,
    ));
    assert!(matches!(result, Err(Error::VersionUnsupported(v)) if v == "1.0"));
}

/// A requested scene index beyond the asset's scene count is rejected before
/// any fetch is attempted.
#[test]
fn out_of_range_scene_request_is_rejected_up_front() {
    let doc = json!({
        "asset": {"version": "2.0"},
        "scenes": [{"nodes": []}],
    });
    let source = InMemorySource::new();
    let result = block_on(asset_pipeline::load(
        doc.to_string().as_bytes(),
        &source,
        Config::default(),
        Some(5),
    ));
    assert!(matches!(
        result,
        Err(Error::SceneIndexOutOfRange { requested: 5, scene_count: 1 })
    ));
}
