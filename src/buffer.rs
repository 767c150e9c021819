//! Per-shared-buffer tracking, endian rewrite, and splitting (C5).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::accessor::{Accessor, BufferSource, Usage};
use crate::split::{self, SwapGuard};

/// A packed sub-buffer produced by the splitter for one usage class
/// (attribute or index) of one original source buffer.
pub struct SplitBuffer {
    /// The packed bytes.
    pub bytes: Vec<u8>,
    /// Which usage class these bytes serve.
    pub usage: Usage,
}

/// Tracks one shared source buffer: its raw bytes once fetched, and the
/// accessors that address it as vertex-attribute data vs index data.
pub struct BufferEntry {
    /// Index into the JSON document's `buffers` array.
    pub index: usize,
    /// Length declared by the asset; used to size endian-swap bookkeeping
    /// before the bytes themselves arrive.
    declared_len: u64,
    raw: RefCell<Option<Vec<u8>>>,
    attribute_accessors: RefCell<Vec<Rc<RefCell<Accessor>>>>,
    index_accessors: RefCell<Vec<Rc<RefCell<Accessor>>>>,
    rewritten: Cell<bool>,
}

#[cfg(target_endian = "little")]
const NEEDS_ENDIAN_REWRITE: bool = false;
#[cfg(target_endian = "big")]
const NEEDS_ENDIAN_REWRITE: bool = true;

impl BufferEntry {
    /// Creates an entry for buffer `index`, not yet populated with bytes.
    pub fn new(index: usize, declared_len: u64) -> Self {
        Self {
            index,
            declared_len,
            raw: RefCell::new(None),
            attribute_accessors: RefCell::new(Vec::new()),
            index_accessors: RefCell::new(Vec::new()),
            rewritten: Cell::new(false),
        }
    }

    /// Registers `accessor` under `usage`. The same handle may be pushed
    /// multiple times (once per primitive that references it); the pipeline
    /// stages dedup by `original_index` when they actually touch bytes.
    pub fn add_accessor(&self, accessor: Rc<RefCell<Accessor>>, usage: Usage) {
        match usage {
            Usage::Attribute => self.attribute_accessors.borrow_mut().push(accessor),
            Usage::Index => self.index_accessors.borrow_mut().push(accessor),
        }
    }

    /// Stores the fetched bytes for this buffer.
    pub fn set_bytes(&self, bytes: Vec<u8>) {
        *self.raw.borrow_mut() = Some(bytes);
    }

    /// Declared byte length, for sizing checks before the fetch completes.
    pub fn declared_len(&self) -> u64 {
        self.declared_len
    }

    /// Rewrites every addressed component of every registered accessor to
    /// native byte order, in place, skipping the work entirely on a
    /// little-endian host (where the on-disk little-endian bytes are already
    /// native). The actual swap logic lives in [`crate::split`] so it can be
    /// exercised by tests independent of the host's endianness.
    pub fn endian_rewrite(&self) {
        if self.rewritten.get() {
            return;
        }
        self.rewritten.set(true);
        if !NEEDS_ENDIAN_REWRITE {
            return;
        }
        let mut raw = self.raw.borrow_mut();
        let Some(bytes) = raw.as_mut() else { return };
        let mut guard = SwapGuard::for_buffer_len(bytes.len());
        split::swap_component_bytes(bytes, &self.attribute_accessors.borrow(), &mut guard);
        split::swap_component_bytes(bytes, &self.index_accessors.borrow(), &mut guard);
    }

    /// Splits the attribute and index accessor sets into two packed
    /// sub-buffers and rewrites every accessor to address them. Must run
    /// after [`Self::endian_rewrite`].
    ///
    /// A JSON accessor may legitimately be registered under both usages (the
    /// same `Rc<RefCell<Accessor>>` present in both lists), so both usage
    /// classes' splits are computed from the untouched source bytes before
    /// either one's accessors are rewritten. Rewriting attribute accessors
    /// first would otherwise make the index pass's `split::split` read the
    /// already-rewritten `byte_offset` instead of the original one.
    pub fn split_and_rebuild(&self) {
        let raw = self.raw.borrow();
        let Some(bytes) = raw.as_ref() else { return };

        let attribute_list = self.attribute_accessors.borrow();
        let index_list = self.index_accessors.borrow();
        let attribute_result = (!attribute_list.is_empty()).then(|| split::split(bytes, &attribute_list));
        let index_result = (!index_list.is_empty()).then(|| split::split(bytes, &index_list));

        for (list, usage, result) in [
            (&*attribute_list, Usage::Attribute, attribute_result),
            (&*index_list, Usage::Index, index_result),
        ] {
            let Some(result) = result else { continue };
            let sub_buffer = Rc::new(SplitBuffer {
                bytes: result.bytes,
                usage,
            });
            let mut rebuilt = std::collections::HashSet::new();
            for handle in list.iter() {
                let mut a = handle.borrow_mut();
                if !rebuilt.insert(a.original_index) {
                    continue;
                }
                if let Some(&new_offset) = result.offsets.get(&a.original_index) {
                    a.buffer_source = BufferSource::Split(sub_buffer.clone());
                    a.byte_offset = new_offset;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::accessor::{ComponentType, Type};

    fn accessor(original_index: usize, byte_offset: u64, count: u64) -> Rc<RefCell<Accessor>> {
        Rc::new(RefCell::new(Accessor {
            original_index,
            original_buffer_index: 0,
            buffer_source: BufferSource::Original(0),
            byte_offset,
            byte_stride: None,
            component_type: ComponentType::F32,
            type_: Type::Vec3,
            count,
            normalized: false,
            min: None,
            max: None,
        }))
    }

    #[test]
    fn split_and_rebuild_repoints_accessors_at_new_buffer() {
        let entry = BufferEntry::new(0, 36);
        let a = accessor(0, 0, 3);
        entry.add_accessor(a.clone(), Usage::Attribute);
        entry.set_bytes(vec![9u8; 36]);
        entry.endian_rewrite();
        entry.split_and_rebuild();
        assert!(matches!(a.borrow().buffer_source, BufferSource::Split(_)));
        assert_eq!(a.borrow().byte_offset, 0);
    }

    #[test]
    fn separate_attribute_and_index_passes_produce_separate_buffers() {
        let entry = BufferEntry::new(0, 100);
        let attr = accessor(0, 0, 3);
        let idx = accessor(1, 36, 3);
        entry.add_accessor(attr.clone(), Usage::Attribute);
        entry.add_accessor(idx.clone(), Usage::Index);
        entry.set_bytes(vec![1u8; 100]);
        entry.endian_rewrite();
        entry.split_and_rebuild();
        let BufferSource::Split(attr_buf) = &attr.borrow().buffer_source else {
            panic!("expected split buffer")
        };
        let BufferSource::Split(idx_buf) = &idx.borrow().buffer_source else {
            panic!("expected split buffer")
        };
        assert!(!Rc::ptr_eq(attr_buf, idx_buf));
        assert_eq!(attr_buf.usage, Usage::Attribute);
        assert_eq!(idx_buf.usage, Usage::Index);
    }

    #[test]
    fn accessor_shared_between_usages_reads_original_bytes_in_both_passes() {
        // Same accessor registered as both an attribute and an index, plus a
        // sibling in each list so the two passes produce different packings.
        // If the index pass read the attribute pass's rewritten byte_offset
        // this would slice the wrong region (or panic) instead of landing on
        // `shared`'s original bytes.
        let entry = BufferEntry::new(0, 200);
        let shared = accessor(0, 100, 3);
        let attr_sibling = accessor(1, 0, 3);
        let idx_sibling = accessor(2, 150, 3);
        entry.add_accessor(shared.clone(), Usage::Attribute);
        entry.add_accessor(attr_sibling, Usage::Attribute);
        entry.add_accessor(shared.clone(), Usage::Index);
        entry.add_accessor(idx_sibling, Usage::Index);

        let mut bytes = vec![0u8; 200];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }
        entry.set_bytes(bytes);
        entry.endian_rewrite();
        entry.split_and_rebuild();

        // `shared` ends up rebuilt by whichever pass ran last, but its final
        // byte_offset must still point at an extent of the original source
        // bytes (offset 100, the first 12 bytes of which are 100..112 % 251).
        let BufferSource::Split(sub_buffer) = &shared.borrow().buffer_source else {
            panic!("expected split buffer");
        };
        let offset = shared.borrow().byte_offset as usize;
        let expected: Vec<u8> = (100..112).map(|i| (i % 251) as u8).collect();
        assert_eq!(&sub_buffer.bytes[offset..offset + 12], expected.as_slice());
    }
}
