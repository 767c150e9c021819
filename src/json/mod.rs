//! Plain-JSON glTF 2.0 schema types.
//!
//! This mirrors the shape of `gltf-json` from the teacher workspace, trimmed
//! to the subset this pipeline understands: no animation, skinning, morph
//! targets, sparse accessors, cameras, or extensions (all explicit
//! Non-goals). Deserialization failures and out-of-range indices become
//! [`crate::error::Error::MalformedAsset`] during body parse.

pub mod accessor;
pub mod asset;
pub mod buffer;
pub mod image;
pub mod material;
pub mod mesh;
pub mod root;
pub mod scene;
pub mod texture;

use serde::{de, Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

pub use accessor::Accessor;
pub use asset::Asset;
pub use buffer::Buffer;
pub use image::Image;
pub use material::Material;
pub use mesh::Mesh;
pub use root::Root;
pub use scene::{Node, Scene};
pub use texture::{Sampler, Texture};

/// Arbitrary application-specific data, passed through unexamined.
pub type Extras = Option<serde_json::Value>;

/// An offset into one of the arrays owned by [`Root`].
///
/// Kept as a plain newtype (no trait-object validation machinery) since this
/// crate checks index bounds once, explicitly, while building the runtime
/// entity graph in [`crate::scene`] rather than via a generic `Validate`
/// pass.
#[derive(Eq, PartialEq, Hash)]
pub struct Index<T>(u32, PhantomData<fn() -> T>);

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> Index<T> {
    /// Wraps a raw JSON array offset.
    pub fn new(value: u32) -> Self {
        Index(value, PhantomData)
    }

    /// Returns the offset as a `usize` suitable for slice indexing.
    pub fn value(&self) -> usize {
        self.0 as usize
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> Serialize for Index<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0 as u64)
    }
}

impl<'de, T> Deserialize<'de> for Index<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor<T>(PhantomData<fn() -> T>);
        impl<'de, T> de::Visitor<'de> for Visitor<T> {
            type Value = Index<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an index into a root-level array")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Index::new(value as u32))
            }
        }
        deserializer.deserialize_u64(Visitor(PhantomData))
    }
}
