//! Runtime accessor / buffer-view model (C4).
//!
//! Distinct from [`crate::json::accessor::Accessor`]: the JSON type is a pure
//! deserialization target, while this one is the mutable handle the pipeline
//! rewrites in place during endian rewrite and buffer splitting. Multiple
//! primitives that reference the same JSON accessor index share one
//! `Rc<RefCell<Accessor>>`, so a rebuild performed once during splitting is
//! visible to every primitive that reads it afterwards.

use std::rc::Rc;

use crate::json::accessor::{ComponentType, Type};

/// Whether an accessor is read as vertex attribute data or as an index buffer.
///
/// Mirrors the two accessor lists a `BufferEntry` tracks per source buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Usage {
    /// Read as a vertex attribute (`POSITION`, `NORMAL`, ...).
    Attribute,
    /// Read as a primitive's index buffer.
    Index,
}

/// Where an accessor's bytes currently live.
#[derive(Clone)]
pub enum BufferSource {
    /// Still addressing the original, as-fetched source buffer.
    Original(usize),
    /// Rebuilt to address a packed sub-buffer produced by the splitter.
    Split(Rc<crate::buffer::SplitBuffer>),
}

/// A typed, mutable view over a region of a buffer.
///
/// Before the pipeline runs, `buffer_source` is `Original` and `byte_offset`
/// is absolute within that source buffer (the JSON accessor's `byteOffset`
/// folded together with its buffer view's `byteOffset`). After splitting,
/// `buffer_source` becomes `Split` and `byte_offset` is absolute within the
/// new sub-buffer — there is no separate view-level offset to track since
/// each accessor gets its own addressing once rebuilt.
pub struct Accessor {
    /// Index into the JSON document's `accessors` array this was built from;
    /// used as the dedup key during endian rewrite and splitting.
    pub original_index: usize,
    /// Index into the JSON document's `buffers` array this accessor
    /// originally addressed, before any splitting.
    pub original_buffer_index: usize,
    /// Current backing storage.
    pub buffer_source: BufferSource,
    /// Absolute byte offset into the current backing storage.
    pub byte_offset: u64,
    /// Stride between successive elements, if interleaved; `None` means
    /// tightly packed (stride equals `element_size`).
    pub byte_stride: Option<u64>,
    /// Scalar component type.
    pub component_type: ComponentType,
    /// Vector/scalar/matrix shape.
    pub type_: Type,
    /// Number of addressed elements.
    pub count: u64,
    /// Whether integer data normalizes to `[0,1]`/`[-1,1]` on read.
    pub normalized: bool,
    /// Per-component minimum, when declared.
    pub min: Option<Vec<f32>>,
    /// Per-component maximum, when declared.
    pub max: Option<Vec<f32>>,
}

impl Accessor {
    /// Size in bytes of one addressed element (all components, no stride padding).
    pub fn element_size(&self) -> u64 {
        (self.component_type.size() * self.type_.multiplicity()) as u64
    }

    /// Effective distance in bytes between the start of successive elements.
    pub fn effective_stride(&self) -> u64 {
        self.byte_stride.unwrap_or_else(|| self.element_size())
    }

    /// Total span in bytes addressed by this accessor, from `byte_offset`.
    pub fn addressed_size(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        (self.count - 1) * self.effective_stride() + self.element_size()
    }

    /// The `[start, end)` byte range this accessor reads from its current
    /// backing storage.
    pub fn extent(&self) -> (u64, u64) {
        (self.byte_offset, self.byte_offset + self.addressed_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accessor(component_type: ComponentType, type_: Type, count: u64, stride: Option<u64>) -> Accessor {
        Accessor {
            original_index: 0,
            original_buffer_index: 0,
            buffer_source: BufferSource::Original(0),
            byte_offset: 0,
            byte_stride: stride,
            component_type,
            type_,
            count,
            normalized: false,
            min: None,
            max: None,
        }
    }

    #[test]
    fn packed_vec3_f32_addressed_size() {
        let a = accessor(ComponentType::F32, Type::Vec3, 3, None);
        assert_eq!(a.element_size(), 12);
        assert_eq!(a.addressed_size(), 36);
    }

    #[test]
    fn interleaved_stride_addressed_size() {
        // POSITION in a 24-byte-stride PN buffer, 6 vertices.
        let a = accessor(ComponentType::F32, Type::Vec3, 6, Some(24));
        assert_eq!(a.addressed_size(), 5 * 24 + 12);
    }
}
