use std::fmt;

/// Errors surfaced by the asset assembly pipeline.
///
/// Mirrors the kinds called out in the design: version/scene-index problems and
/// malformed JSON abort the load immediately, while fetch/decode failures are
/// aggregated and only surface once every outstanding fetch has settled.
#[derive(Debug)]
pub enum Error {
    /// `asset.version` is missing, malformed, or has a major version below 2.
    VersionUnsupported(String),

    /// The requested scene index is outside `[0, scenes.len)`.
    SceneIndexOutOfRange {
        /// The index that was requested.
        requested: usize,
        /// The number of scenes present in the asset.
        scene_count: usize,
    },

    /// At least one buffer or image fetch failed. The pipeline still drained
    /// every other outstanding fetch before reporting this.
    FetchFailed,

    /// Image bytes were fetched but could not be decoded.
    DecodeFailed(String),

    /// The JSON document or the binary data it describes violates an
    /// invariant the pipeline depends on.
    MalformedAsset(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::VersionUnsupported(v) => write!(f, "unsupported glTF version: {v:?}"),
            Error::SceneIndexOutOfRange {
                requested,
                scene_count,
            } => write!(
                f,
                "scene index {requested} out of range (asset has {scene_count} scene(s))"
            ),
            Error::FetchFailed => write!(f, "one or more buffer/image fetches failed"),
            Error::DecodeFailed(msg) => write!(f, "image decode failed: {msg}"),
            Error::MalformedAsset(msg) => write!(f, "malformed asset: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedAsset(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::DecodeFailed(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::MalformedAsset(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
