/// Upper bound on ranked results returned by a single query
pub const MAX_RESULTS: usize = 5;

/// Relevance deltas below this are ties, broken by rating
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Length of the request meter's sliding window, in recorded queries
pub const REQUEST_WINDOW: u64 = 1440;

/// Baseline core count assumed by the default shard layout
pub const EXPECTED_CORES: usize = 4;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Shard count of the score map used by parallel ranking
    pub shard_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            shard_count: EXPECTED_CORES * 2, // two shards per core
        }
    }
}

impl EngineConfig {
    /// Size the score map from the machine's actual core count
    pub fn for_host() -> Self {
        EngineConfig {
            shard_count: (num_cpus::get() * 2).max(1),
        }
    }
}
