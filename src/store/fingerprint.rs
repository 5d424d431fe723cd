use std::hash::Hasher;

use metrohash::MetroHash64;

/// Hash of a serialized tree, used to detect saves that would not change
/// the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeFingerprint(u64);

impl TreeFingerprint {
    pub fn of(serialized: &str) -> Self {
        let mut hasher = MetroHash64::default();
        hasher.write(serialized.as_bytes());
        TreeFingerprint(hasher.finish())
    }
}
