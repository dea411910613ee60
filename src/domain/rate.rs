// Counter-to-rate conversion

/// Convert a run of monotonic byte counters into per-interval deltas.
///
/// The result has one element less than the input. A counter that went
/// backwards is assumed to have been reset, so its new value is taken as
/// the delta.
pub fn rate_from_counters(counters: &[u64]) -> Vec<u64> {
    counters
        .windows(2)
        .map(|pair| pair[1].checked_sub(pair[0]).unwrap_or(pair[1]))
        .collect()
}
