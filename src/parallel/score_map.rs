use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use parking_lot::{Mutex, MutexGuard};

use crate::core::types::DocId;

/// Fixed-shard concurrent accumulator from document id to score.
///
/// Built fresh for each parallel ranking pass and never shared across
/// calls. A shard is one mutex plus one ordered map; ids hash to shards by
/// unsigned modulus, so any i64 id lands deterministically.
pub struct ShardedScoreMap {
    shards: Vec<Mutex<BTreeMap<DocId, f64>>>,
}

/// Handle to one score slot. Holds its shard's lock for its whole
/// lifetime; dropping the slot releases the shard.
pub struct ScoreSlot<'a> {
    guard: MutexGuard<'a, BTreeMap<DocId, f64>>,
    id: DocId,
}

impl Deref for ScoreSlot<'_> {
    type Target = f64;

    fn deref(&self) -> &f64 {
        self.guard.get(&self.id).expect("slot entry inserted on acquire")
    }
}

impl DerefMut for ScoreSlot<'_> {
    fn deref_mut(&mut self) -> &mut f64 {
        self.guard
            .get_mut(&self.id)
            .expect("slot entry inserted on acquire")
    }
}

impl ShardedScoreMap {
    /// `shard_count` must be positive
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        ShardedScoreMap {
            shards: (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Lock the shard covering `id` and expose its score, zero-initialized
    /// on first access
    pub fn slot(&self, id: DocId) -> ScoreSlot<'_> {
        let index = (id.value() as u64 % self.shards.len() as u64) as usize;
        let mut guard = self.shards[index].lock();
        guard.entry(id).or_insert(0.0);
        ScoreSlot { guard, id }
    }

    /// Merge every shard into one ordered map. Consuming the map means no
    /// slot can still be alive, so no lock is contended here.
    pub fn into_ordered_map(self) -> BTreeMap<DocId, f64> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            // shards hold disjoint keys, so append never overwrites
            merged.append(&mut shard.into_inner());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_inserts_zero_and_accumulates() {
        let scores = ShardedScoreMap::new(4);
        {
            let slot = scores.slot(DocId(7));
            assert_eq!(*slot, 0.0);
        }
        *scores.slot(DocId(7)) += 0.5;
        *scores.slot(DocId(7)) += 0.25;
        let merged = scores.into_ordered_map();
        assert_eq!(merged[&DocId(7)], 0.75);
    }

    #[test]
    fn merged_map_is_ordered_by_id() {
        let scores = ShardedScoreMap::new(3);
        for id in [9i64, 2, 14, 0, 5] {
            *scores.slot(DocId(id)) += 1.0;
        }
        let ids: Vec<i64> = scores
            .into_ordered_map()
            .keys()
            .map(|id| id.value())
            .collect();
        assert_eq!(ids, vec![0, 2, 5, 9, 14]);
    }

    #[test]
    fn single_shard_still_works() {
        let scores = ShardedScoreMap::new(1);
        *scores.slot(DocId(1)) += 1.0;
        *scores.slot(DocId(2)) += 2.0;
        let merged = scores.into_ordered_map();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn concurrent_accumulation_loses_nothing() {
        let scores = ShardedScoreMap::new(8);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for id in 0..100i64 {
                        *scores.slot(DocId(id)) += 1.0;
                    }
                });
            }
        });
        let merged = scores.into_ordered_map();
        assert_eq!(merged.len(), 100);
        assert!(merged.values().all(|&score| score == 4.0));
    }

    #[test]
    #[should_panic(expected = "shard count must be positive")]
    fn zero_shards_is_a_programmer_error() {
        ShardedScoreMap::new(0);
    }
}
