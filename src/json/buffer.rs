use serde::{Deserialize, Serialize};

use crate::json::{Extras, Index};

/// One raw binary blob, fetched lazily the first time an accessor addresses it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Buffer {
    /// Length of the buffer in bytes, as declared by the asset (validated
    /// against the fetched byte count).
    #[serde(rename = "byteLength")]
    pub byte_length: u64,

    /// URI of the buffer data: a relative path, an absolute URL, or a `data:`
    /// URI. Absent only for the (unsupported, Non-goal) `.glb` BIN chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}

/// A contiguous slice of a [`Buffer`]. Pure descriptor — owns no bytes.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct View {
    /// The parent buffer.
    pub buffer: Index<Buffer>,

    /// Length of the view in bytes.
    #[serde(rename = "byteLength")]
    pub byte_length: u64,

    /// Offset into the parent buffer, in bytes.
    #[serde(default, rename = "byteOffset")]
    pub byte_offset: u64,

    /// Stride in bytes between successive elements, when the view holds
    /// interleaved vertex attributes. `None` means tightly packed.
    #[serde(default, rename = "byteStride", skip_serializing_if = "Option::is_none")]
    pub byte_stride: Option<u64>,

    /// Optional user-defined name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application-specific data, passed through unexamined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Extras,
}
