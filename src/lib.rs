//! Concurrent glTF 2.0 asset assembly pipeline.
//!
//! Fetches a `.gltf` document's buffers and images concurrently, rewrites
//! buffer bytes to native endianness, splits shared binary buffers into
//! dense per-attribute/per-index sub-buffers, rebuilds accessors over them,
//! and deduplicates textures that share a source image. The result is a
//! resolved [`scene::Content`] that [`builder::PrimitiveBuilder`] walks to
//! emit renderer-ready draw primitives.
//!
//! Animation, skinning, morph targets, sparse accessors, extensions,
//! KTX/Draco decoding, and `.glb` container parsing are out of scope; only
//! plain-JSON glTF 2.0 with external `.bin`/image URIs is supported.
//!
//! ```no_run
//! # async fn run() -> Result<(), asset_pipeline::error::Error> {
//! use asset_pipeline::{config::Config, context, source::FsSource};
//!
//! let source = FsSource::new("model.gltf");
//! let json_bytes = std::fs::read("model.gltf")?;
//! let content = context::load(&json_bytes, &source, Config::default(), None).await?;
//! let scene = content.default_scene().expect("asset has at least one scene");
//! println!("root nodes: {}", scene.roots.len());
//! # Ok(())
//! # }
//! ```

pub mod accessor;
pub mod binary_mesh;
pub mod buffer;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod geo;
pub mod image;
pub mod json;
pub mod math;
pub mod scene;
pub mod source;
pub mod split;
pub mod texture;
pub mod uri;

pub use config::Config;
pub use context::load;
pub use error::{Error, Result};
pub use scene::Content;
