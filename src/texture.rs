//! Runtime texture and texture-info model, resolved from the JSON schema's
//! index-based references into shared, mutable handles.

use std::cell::RefCell;
use std::rc::Rc;

use crate::json::texture::Sampler;
use crate::source::DecodedImage;

/// A GPU-bindable sampler + source image pairing.
///
/// `source_image_index` stays an index (rather than an `Rc<ImageEntry>`)
/// since the image dedup step in [`crate::image::ImageEntry`] only ever needs
/// to repoint [`TextureInfo::texture`] handles, never the `Texture` itself.
/// `decoded` shares storage with the owning `ImageEntry` so the bitmap
/// becomes visible here once its fetch completes, even though the `Texture`
/// is built (during body parse) before that happens.
pub struct Texture {
    /// Sampler parameters, or the default sampler if the asset left it unset.
    pub sampler: Sampler,
    /// Index into the JSON document's `images` array.
    pub source_image_index: usize,
    /// The decoded bitmap, populated once the image fetch settles.
    pub decoded: Rc<RefCell<Option<DecodedImage>>>,
}

/// Slot-specific scalar carried alongside a base [`TextureInfo`].
#[derive(Clone, Copy, Debug)]
pub enum TextureInfoKind {
    /// A plain texture reference (base color, metallic-roughness, emissive).
    Base,
    /// A normal map, with its scale factor.
    Normal(f32),
    /// An occlusion map, with its strength factor.
    Occlusion(f32),
}

/// A reference from a material slot to a [`Texture`].
///
/// `texture` is re-pointed in place by [`crate::image::ImageEntry::dedupe`]
/// when multiple `TextureInfo`s share a source image.
pub struct TextureInfo {
    /// The referenced texture. Mutated by image dedup.
    pub texture: Rc<RefCell<Texture>>,
    /// Which `TEXCOORD_n` attribute to sample with.
    pub tex_coord: u32,
    /// Slot-specific scalar.
    pub kind: TextureInfoKind,
}
