use serde::{Deserialize, Serialize};

use crate::json::{buffer, Extras, Index};

/// Image data used to create a [`crate::json::Texture`].
///
/// Exactly one of `uri`/`buffer_view` is expected to be set; `buffer_view`
/// images are out of this crate's scope (they require `.glb`-style packed
/// binary chunks) but the field is modeled for schema completeness.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Image {
    /// URI of the image: a relative path, an absolute URL, or a `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// The buffer view containing the image bytes, when not referenced by URI.
    #[serde(default, rename = "bufferView", skip_serializing_if = "Option::is_none")]
    pub buffer_view: Option<Index<buffer::View>>,

    /// MIME type hint (`image/png` or `image/jpeg`).
    #[serde(default, rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}
