//! Deterministic process orderings.
//!
//! All orderings are stable: processes with equal keys keep their
//! insertion order, so identical input always yields an identical schedule.

use crate::models::Process;

/// Returns indices sorted by `key` (ascending), ties by insertion order.
pub fn order_by<K, F>(processes: &[Process], key: F) -> Vec<usize>
where
    K: Ord,
    F: Fn(&Process) -> K,
{
    let mut indices: Vec<usize> = (0..processes.len()).collect();
    indices.sort_by_key(|&i| key(&processes[i]));
    indices
}

/// Indices in arrival order (ties by insertion order).
pub fn arrival_order(processes: &[Process]) -> Vec<usize> {
    order_by(processes, |p| p.arrival)
}

/// Index of the minimum element among `candidates` by `key`, ties by the
/// lowest index.
pub(crate) fn select_min<K, F>(candidates: impl Iterator<Item = usize>, key: F) -> Option<usize>
where
    K: Ord,
    F: Fn(usize) -> K,
{
    candidates.min_by_key(|&i| (key(i), i))
}
