//! Buffer splitting and endian rewrite (C7), factored out of [`crate::buffer`]
//! as pure functions over byte slices and accessor extents so both can be
//! unit tested directly regardless of host endianness.

use std::collections::HashMap;
use std::rc::Rc;

use crate::accessor::Accessor;

/// One coalesced accessor extent, as gathered before sorting/coalescing.
struct Extent {
    original_index: usize,
    start: u64,
    end: u64,
    element_size: u64,
}

fn gather_extents(accessors: &[Rc<std::cell::RefCell<Accessor>>]) -> Vec<Extent> {
    let mut seen = std::collections::HashSet::new();
    let mut extents = Vec::new();
    for handle in accessors {
        let a = handle.borrow();
        if !seen.insert(a.original_index) {
            continue;
        }
        let (start, end) = a.extent();
        extents.push(Extent {
            original_index: a.original_index,
            start,
            end,
            element_size: a.element_size(),
        });
    }
    extents.sort_by_key(|e| e.start);
    extents
}

fn align_up(value: u64, align: u64) -> u64 {
    if align <= 1 {
        return value;
    }
    (value + align - 1) / align * align
}

/// Tracks which 2-byte groups of a buffer have already been endian-swapped,
/// so an accessor that aliases bytes already touched by another one skips
/// them. One bit per `u16`-sized group, indexed by `byte_offset / 2`.
pub struct SwapGuard(Vec<bool>);

impl SwapGuard {
    /// Creates a guard sized for a buffer of `byte_len` bytes.
    pub fn for_buffer_len(byte_len: usize) -> Self {
        Self(vec![false; byte_len / 2 + 1])
    }

    fn is_set(&self, group: usize) -> bool {
        self.0.get(group).copied().unwrap_or(false)
    }

    fn set(&mut self, group: usize) {
        if group < self.0.len() {
            self.0[group] = true;
        }
    }
}

/// Swaps the byte order of every addressed component of `accessors` within
/// `buffer`, marking each touched group in `swapped` so that a group shared
/// by more than one accessor is only ever swapped once.
///
/// `swapped` must be sized for `buffer`; callers own its lifetime so the same
/// guard can be reused across the attribute and index accessor lists of one
/// `BufferEntry` (both address the same source buffer).
pub fn swap_component_bytes(
    buffer: &mut [u8],
    accessors: &[Rc<std::cell::RefCell<Accessor>>],
    swapped: &mut SwapGuard,
) {
    let mut seen = std::collections::HashSet::new();
    for handle in accessors {
        let a = handle.borrow();
        if !seen.insert(a.original_index) {
            continue;
        }
        let component_size = a.component_type.size() as u64;
        if component_size == 1 {
            continue;
        }
        let multiplicity = a.type_.multiplicity() as u64;
        let stride = a.effective_stride();
        for i in 0..a.count {
            let element_start = a.byte_offset + i * stride;
            for c in 0..multiplicity {
                let component_start = (element_start + c * component_size) as usize;
                swap_one_component(buffer, component_start, component_size as usize, swapped);
            }
        }
    }
}

fn swap_one_component(buffer: &mut [u8], start: usize, size: usize, swapped: &mut SwapGuard) {
    let group = start / 2;
    if swapped.is_set(group) {
        return;
    }
    match size {
        2 => {
            buffer.swap(start, start + 1);
            swapped.set(group);
        }
        4 => {
            buffer.swap(start, start + 3);
            buffer.swap(start + 1, start + 2);
            swapped.set(group);
            swapped.set(group + 1);
        }
        _ => {}
    }
}

/// Result of packing one usage class (attribute or index) of accessors from
/// one source buffer into a dense sub-buffer.
pub struct SplitResult {
    /// The packed output bytes.
    pub bytes: Vec<u8>,
    /// New absolute byte offset for each original accessor index touched.
    pub offsets: HashMap<usize, u64>,
}

/// Gathers, sorts, coalesces, and repacks the source extents addressed by
/// `accessors` (already endian-corrected) out of `source`.
pub fn split(source: &[u8], accessors: &[Rc<std::cell::RefCell<Accessor>>]) -> SplitResult {
    let extents = gather_extents(accessors);
    let mut bytes = Vec::new();
    let mut offsets = HashMap::new();

    let mut i = 0;
    while i < extents.len() {
        let run_start = extents[i].start;
        let mut run_end = extents[i].end;
        let mut run_align = extents[i].element_size.min(4).next_power_of_two();
        let mut members = vec![i];
        let mut j = i + 1;
        while j < extents.len() && extents[j].start <= run_end {
            run_end = run_end.max(extents[j].end);
            run_align = run_align.max(extents[j].element_size.min(4).next_power_of_two());
            members.push(j);
            j += 1;
        }

        let dst_offset = align_up(bytes.len() as u64, run_align);
        bytes.resize(dst_offset as usize, 0);
        let run_len = (run_end - run_start) as usize;
        bytes.extend_from_slice(&source[run_start as usize..run_end as usize]);
        debug_assert_eq!(bytes.len(), dst_offset as usize + run_len);

        for &m in &members {
            let e = &extents[m];
            let new_offset = dst_offset + (e.start - run_start);
            offsets.insert(e.original_index, new_offset);
        }

        i = j;
    }

    SplitResult { bytes, offsets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::BufferSource;
    use crate::json::accessor::{ComponentType, Type};
    use std::cell::RefCell;

    fn make(original_index: usize, byte_offset: u64, count: u64, stride: Option<u64>, ty: Type) -> Rc<RefCell<Accessor>> {
        Rc::new(RefCell::new(Accessor {
            original_index,
            original_buffer_index: 0,
            buffer_source: BufferSource::Original(0),
            byte_offset,
            byte_stride: stride,
            component_type: ComponentType::F32,
            type_: ty,
            count,
            normalized: false,
            min: None,
            max: None,
        }))
    }

    #[test]
    fn disjoint_runs_pack_separately_with_alignment() {
        // Two non-overlapping VEC3/F32 accessors far apart in the source buffer.
        let a = make(0, 0, 3, None, Type::Vec3);
        let b = make(1, 1000, 3, None, Type::Vec3);
        let mut source = vec![0u8; 1100];
        for (i, byte) in source.iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }
        let result = split(&source, &[a, b]);
        assert_eq!(result.bytes.len(), 72);
        assert_eq!(*result.offsets.get(&0).unwrap(), 0);
        assert_eq!(*result.offsets.get(&1).unwrap(), 36);
    }

    #[test]
    fn overlapping_extents_coalesce_into_one_run() {
        let a = make(0, 0, 6, Some(24), Type::Vec3);
        let b = make(1, 12, 6, Some(24), Type::Vec3);
        let source = vec![7u8; 144];
        let result = split(&source, &[a, b]);
        assert_eq!(result.bytes.len(), 144);
        assert_eq!(*result.offsets.get(&0).unwrap(), 0);
        assert_eq!(*result.offsets.get(&1).unwrap(), 12);
    }

    #[test]
    fn identical_extents_map_to_same_destination() {
        let a = make(0, 0, 3, None, Type::Vec3);
        let b = make(1, 0, 3, None, Type::Vec3);
        let source = vec![1u8; 36];
        let result = split(&source, &[a, b]);
        assert_eq!(result.offsets.get(&0), result.offsets.get(&1));
    }

    #[test]
    fn swap_marks_shared_groups_once() {
        let a = make(0, 0, 1, None, Type::Vec2);
        let b = make(1, 0, 1, None, Type::Scalar);
        // Two f32 components at offset 0 and 4, a single VEC2 covering both,
        // plus a SCALAR aliasing the first component.
        let mut buffer = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut swapped = SwapGuard::for_buffer_len(buffer.len());
        swap_component_bytes(&mut buffer, &[a, b], &mut swapped);
        // Each 4-byte group swapped exactly once: [04,03,02,01, 08,07,06,05].
        assert_eq!(buffer, [0x04, 0x03, 0x02, 0x01, 0x08, 0x07, 0x06, 0x05]);
    }
}
