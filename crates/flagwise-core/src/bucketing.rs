//! Deterministic assignment of users to traffic buckets

const HASH_SEED: u32 = 1;
const MAX_HASH_VALUE: f64 = u32::MAX as f64;

/// Upper bound of the bucket range
pub const MAX_TRAFFIC_VALUE: u64 = 10_000;

/// Bucket in `0..=10_000` for a user in an experiment or rollout rule.
///
/// MurmurHash3 (x86, 32-bit, seed 1) of `user_id` followed by
/// `experiment_id`, scaled onto the traffic range.
pub fn bucket_value(user_id: &str, experiment_id: &str) -> u64 {
    let key = format!("{user_id}{experiment_id}");
    // Reading from an in-memory slice cannot fail
    let hash = murmur3::murmur3_32(&mut key.as_bytes(), HASH_SEED).unwrap_or_default();
    let ratio = f64::from(hash) / MAX_HASH_VALUE;
    (ratio * MAX_TRAFFIC_VALUE as f64).floor() as u64
}
