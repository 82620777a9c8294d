/// Construction-time tunables for a `SumRope`.
///
/// Not runtime-mutable (per spec.md §9) — pick a `RopeConfig` once, at
/// construction, and live with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RopeConfig {
    /// Maximum elements per leaf.
    pub chunk_size: usize,
    /// Branch-weight imbalance threshold triggering a rebuild.
    pub balance_ratio: usize,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self { chunk_size: 32, balance_ratio: 3 }
    }
}
