//! Per-shared-image tracking and texture dedup (C6).

use std::cell::RefCell;
use std::rc::Rc;

use crate::source::DecodedImage;
use crate::texture::TextureInfo;

/// Tracks one shared source image: its decoded bitmap once fetched, and the
/// `TextureInfo`s that reference it.
pub struct ImageEntry {
    /// Index into the JSON document's `images` array.
    pub index: usize,
    decoded: Rc<RefCell<Option<DecodedImage>>>,
    texture_infos: RefCell<Vec<Rc<RefCell<TextureInfo>>>>,
}

impl ImageEntry {
    /// Creates an entry for image `index`, not yet populated.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            decoded: Rc::new(RefCell::new(None)),
            texture_infos: RefCell::new(Vec::new()),
        }
    }

    /// Stores the decoded bitmap for this image.
    pub fn set_decoded(&self, image: DecodedImage) {
        *self.decoded.borrow_mut() = Some(image);
    }

    /// Returns a handle sharing storage with this entry's decoded bitmap, so
    /// a [`crate::texture::Texture`] built before the fetch completes still
    /// observes it once it does.
    pub fn decoded_handle(&self) -> Rc<RefCell<Option<DecodedImage>>> {
        self.decoded.clone()
    }

    /// Registers a `TextureInfo` that samples this image.
    pub fn add_texture_info(&self, info: Rc<RefCell<TextureInfo>>) {
        self.texture_infos.borrow_mut().push(info);
    }

    /// Collapses every registered `TextureInfo.texture` onto the first one
    /// registered for this image, so all of them share one `Texture` object.
    pub fn dedupe(&self) {
        let infos = self.texture_infos.borrow();
        let Some(first) = infos.first() else { return };
        if infos.len() > 1 {
            log::debug!(
                "image {}: collapsing {} texture(s) onto one shared Texture",
                self.index,
                infos.len()
            );
        }
        let representative = first.borrow().texture.clone();
        for info in infos.iter().skip(1) {
            info.borrow_mut().texture = representative.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::texture::Sampler;
    use crate::texture::{Texture, TextureInfoKind};
    use std::cell::RefCell;

    fn texture_info(source_image_index: usize) -> Rc<RefCell<TextureInfo>> {
        Rc::new(RefCell::new(TextureInfo {
            texture: Rc::new(RefCell::new(Texture {
                sampler: Sampler::default(),
                source_image_index,
                decoded: Rc::new(RefCell::new(None)),
            })),
            tex_coord: 0,
            kind: TextureInfoKind::Base,
        }))
    }

    #[test]
    fn dedupe_repoints_later_infos_to_the_first_texture() {
        let entry = ImageEntry::new(0);
        let a = texture_info(0);
        let b = texture_info(0);
        entry.add_texture_info(a.clone());
        entry.add_texture_info(b.clone());
        entry.dedupe();
        assert!(Rc::ptr_eq(&a.borrow().texture, &b.borrow().texture));
    }

    #[test]
    fn dedupe_is_a_no_op_for_a_single_texture_info() {
        let entry = ImageEntry::new(0);
        let a = texture_info(0);
        entry.add_texture_info(a.clone());
        let before = a.borrow().texture.clone();
        entry.dedupe();
        assert!(Rc::ptr_eq(&before, &a.borrow().texture));
    }
}
