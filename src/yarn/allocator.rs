use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::yarn::output::IndirectDrawDescriptor;

pub const DESIGNATED_WORKER: u32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentAllocation {
    pub segment_index: u32,
    pub base_vertex: u32,
    pub vertex_count: u32,
}

impl SegmentAllocation {
    pub fn vertices(&self) -> Range<usize> {
        let start = self.base_vertex as usize;
        start..start + self.vertex_count as usize
    }
}

pub struct AllocationCoordinator<'a> {
    counter: &'a AtomicU32,
}

impl<'a> AllocationCoordinator<'a> {
    pub fn new(descriptor: &'a IndirectDrawDescriptor) -> Self {
        Self {
            counter: descriptor.vertex_counter(),
        }
    }

    pub fn reserve(&self, vertex_count: u32) -> SegmentAllocation {
        reserve(self.counter, vertex_count)
    }
}

#[inline]
pub fn reserve(counter: &AtomicU32, vertex_count: u32) -> SegmentAllocation {
    let previous = counter.fetch_add(vertex_count, Ordering::Relaxed);
    let segment_index = previous / vertex_count;
    SegmentAllocation {
        segment_index,
        base_vertex: segment_index * vertex_count,
        vertex_count,
    }
}

pub fn finalize_descriptor(worker: u32, descriptors: &[&IndirectDrawDescriptor]) {
    if worker == DESIGNATED_WORKER {
        for descriptor in descriptors {
            descriptor.init_fixed_fields();
        }
    }
}
