/// Per-frame depth ordering.
///
/// Gathering produces one `RenderRecord` per visible entity per frame.
/// Records are ordered back-to-front by far extent and drained
/// monotonically across the frame's passes; the queue is refilled only
/// when a new frame begins.
use std::collections::VecDeque;

use crate::fixed::Fixed;
use crate::world::EntityId;

/// One visible entity's depth extents for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderRecord {
    pub entity: EntityId,
    pub near_z: Fixed,
    pub far_z: Fixed,
    pub cost: u32,
    pub important: bool,
}

/// Back-to-front queue of render records, keyed by `far_z` descending.
/// Ties keep their insertion order.
#[derive(Debug, Default)]
pub struct DepthQueue {
    records: VecDeque<RenderRecord>,
}

impl DepthQueue {
    /// Build the queue from unordered gather output. The sort is
    /// stable, so records at equal depth stay in registry order.
    pub fn from_unsorted(mut records: Vec<RenderRecord>) -> Self {
        records.sort_by(|a, b| b.far_z.cmp(&a.far_z));
        Self {
            records: records.into(),
        }
    }

    /// Farthest remaining record.
    #[inline]
    pub fn front(&self) -> Option<&RenderRecord> {
        self.records.front()
    }

    /// Consume the farthest remaining record.
    #[inline]
    pub fn pop_front(&mut self) -> Option<RenderRecord> {
        self.records.pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Discard all remaining records (bail paths and the single-pass
    /// debug override). Returns how many were dropped.
    pub fn flush(&mut self) -> usize {
        let dropped = self.records.len();
        self.records.clear();
        dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderRecord> {
        self.records.iter()
    }
}

/// Records whose near extent crossed in front of the pass that drew
/// them; they must be redrawn in the following pass to complete.
/// Every member's `near_z` lies in front of the near plane of the pass
/// that produced it.
pub type OverlapSet = Vec<RenderRecord>;
