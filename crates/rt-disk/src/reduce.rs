//! Collective sums across partitions.
//!
//! Every call to [`Reducer::sum`] is a synchronization point: all partitions
//! must make the same sequence of calls or the group deadlocks.

use rt_core::{PartitionId, Vec3};
use std::sync::{Arc, Barrier, Mutex, PoisonError};

/// Global sum of a partial 3-vector over all cooperating partitions.
pub trait Reducer: Send + Sync {
    fn sum(&self, local: Vec3) -> Vec3;

    /// Number of cooperating partitions.
    fn size(&self) -> usize {
        1
    }
}

/// Single-partition run: the local sum is already global.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialReducer;

impl Reducer for SerialReducer {
    fn sum(&self, local: Vec3) -> Vec3 {
        local
    }
}

struct GroupShared {
    barrier: Barrier,
    slots: Mutex<Vec<Vec3>>,
}

/// In-process partition group, one member per thread.
///
/// Partials are combined in rank order, so every member sees a bit-identical
/// total regardless of arrival order.
pub struct PartitionGroup;

impl PartitionGroup {
    /// Create the reducers for a group of `size` partitions (rank = position).
    pub fn new(size: usize) -> Vec<PartitionReducer> {
        let size = size.max(1);
        let shared = Arc::new(GroupShared {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![Vec3::zeros(); size]),
        });
        (0..size as u32)
            .map(|r| PartitionReducer {
                rank: PartitionId::from_index(r),
                size,
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

/// One member of a [`PartitionGroup`].
pub struct PartitionReducer {
    rank: PartitionId,
    size: usize,
    shared: Arc<GroupShared>,
}

impl PartitionReducer {
    pub fn rank(&self) -> PartitionId {
        self.rank
    }
}

impl Reducer for PartitionReducer {
    fn sum(&self, local: Vec3) -> Vec3 {
        {
            let mut slots = self
                .shared
                .slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            slots[self.rank.slot()] = local;
        }
        self.shared.barrier.wait();

        let total = self
            .shared
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .fold(Vec3::zeros(), |acc, v| acc + v);

        // Nobody may overwrite a slot until every member has read the total.
        self.shared.barrier.wait();
        total
    }

    fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn serial_sum_is_identity() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(SerialReducer.sum(v), v);
        assert_eq!(SerialReducer.size(), 1);
    }

    #[test]
    fn group_members_agree_on_total() {
        let reducers = PartitionGroup::new(4);
        let totals: Vec<Vec3> = thread::scope(|s| {
            let handles: Vec<_> = reducers
                .iter()
                .map(|r| {
                    s.spawn(move || {
                        let k = r.rank().index() as f64;
                        let first = r.sum(Vec3::new(k, 1.0, 0.0));
                        let second = r.sum(Vec3::new(0.0, 0.0, k * k));
                        first + second
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for t in &totals {
            assert_eq!(*t, Vec3::new(6.0, 4.0, 14.0));
        }
    }
}
