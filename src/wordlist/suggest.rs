//! Prefix suggestions over the reference word list

use super::WordList;

/// Default number of suggestions shown under a slot
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

impl WordList {
    /// Up to `limit` words starting with `prefix`, in list order.
    /// First match wins; there is no ranking.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }

        self.words()
            .iter()
            .filter(|word| word.starts_with(&prefix))
            .take(limit)
            .cloned()
            .collect()
    }
}
