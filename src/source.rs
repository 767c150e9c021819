//! Buffer and image fetchers (C2/C3).
//!
//! Each fetch is modeled as a `Future` so the Context can drive many of them
//! concurrently through a single `FuturesUnordered` (see [`crate::context`]).
//! The crate does not bundle a networking stack; [`FsSource`] covers the
//! common case of a `.gltf` file on disk plus embedded `data:` URIs, mirroring
//! the teacher's `FromPath` source, and callers can implement [`Source`]
//! themselves for HTTP or other backends.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::error::{Error, Result};
use crate::uri::Uri;

/// A decoded, renderer-ready bitmap.
#[derive(Clone)]
pub struct DecodedImage(pub image::DynamicImage);

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.0.width())
            .field("height", &self.0.height())
            .finish()
    }
}

/// A future that resolves to a fetch result, boxed so `Source` can remain
/// object-safe across arbitrary backend implementations.
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a>>;

/// External collaborator supplying the bytes a [`Uri`] refers to.
///
/// Implementations are free to hit the network, the filesystem, or an
/// in-memory table (as the test doubles in this crate's test suite do); the
/// Context only ever calls through this trait and never assumes a particular
/// transport.
pub trait Source {
    /// Fetches the raw bytes referenced by `uri`.
    fn fetch_buffer<'a>(&'a self, uri: &'a Uri) -> FetchFuture<'a, Vec<u8>>;

    /// Fetches and decodes the image referenced by `uri`, using `mime_type`
    /// as a hint when the bytes alone are ambiguous.
    fn fetch_image<'a>(&'a self, uri: &'a Uri, mime_type: Option<&'a str>) -> FetchFuture<'a, DecodedImage>;
}

/// Decodes the payload of a `data:` URI, ignoring any declared media type.
fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let comma = data_uri
        .find(',')
        .ok_or_else(|| Error::MalformedAsset("data URI missing ','".into()))?;
    let (header, payload) = (&data_uri[..comma], &data_uri[comma + 1..]);
    if header.ends_with(";base64") {
        base64::decode(payload).map_err(|e| Error::MalformedAsset(format!("invalid base64 data URI: {e}")))
    } else {
        Ok(urlencoding::decode(payload)
            .map_err(|e| Error::MalformedAsset(format!("invalid percent-encoded data URI: {e}")))?
            .into_owned()
            .into_bytes())
    }
}

/// Loads buffers/images from the local filesystem, resolving relative and
/// `data:` URIs the way `gltf::import::from_path` does for the reference
/// loader.
pub struct FsSource {
    /// Directory the `.gltf` file lives in; relative URIs are resolved
    /// against this.
    base_dir: PathBuf,
}

impl FsSource {
    /// Creates a source rooted at the directory containing `gltf_path`.
    pub fn new(gltf_path: impl AsRef<Path>) -> Self {
        let base_dir = gltf_path
            .as_ref()
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        Self { base_dir }
    }

    fn resolve_path(&self, uri: &Uri) -> Result<PathBuf> {
        match uri {
            Uri::Relative(path) => Ok(self.base_dir.join(path)),
            Uri::Absolute(path) => Ok(PathBuf::from(path)),
            Uri::Data(_) => Err(Error::MalformedAsset("data URI has no filesystem path".into())),
        }
    }
}

impl Source for FsSource {
    fn fetch_buffer<'a>(&'a self, uri: &'a Uri) -> FetchFuture<'a, Vec<u8>> {
        Box::pin(async move {
            if let Uri::Data(data) = uri {
                return decode_data_uri(data);
            }
            let path = self.resolve_path(uri)?;
            Ok(std::fs::read(path)?)
        })
    }

    fn fetch_image<'a>(&'a self, uri: &'a Uri, mime_type: Option<&'a str>) -> FetchFuture<'a, DecodedImage> {
        Box::pin(async move {
            let bytes = if let Uri::Data(data) = uri {
                decode_data_uri(data)?
            } else {
                let path = self.resolve_path(uri)?;
                std::fs::read(path)?
            };
            decode_image_bytes(&bytes, mime_type)
        })
    }
}

/// Decodes raw image bytes, using the MIME type hint when given and falling
/// back to format sniffing otherwise.
pub(crate) fn decode_image_bytes(bytes: &[u8], mime_type: Option<&str>) -> Result<DecodedImage> {
    let format = match mime_type {
        Some("image/png") => Some(image::ImageFormat::Png),
        Some("image/jpeg") => Some(image::ImageFormat::Jpeg),
        _ => image::guess_format(bytes).ok(),
    };
    let dynamic = match format {
        Some(fmt) => image::load_from_memory_with_format(bytes, fmt)?,
        None => image::load_from_memory(bytes)?,
    };
    Ok(DecodedImage(dynamic))
}
