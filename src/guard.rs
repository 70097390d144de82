use std::collections::HashSet;

use crate::types::CategoryKey;

/// Remembers every key that has been requested. Keys are never removed, so
/// each key is fetched at most once for the lifetime of the guard.
#[derive(Debug, Default)]
pub struct FetchGuard {
    fetched: HashSet<CategoryKey>,
}

impl FetchGuard {
    /// Marks `key` as fetched. Returns `true` only the first time, which is
    /// the caller's cue to issue the request.
    pub fn claim(&mut self, key: &CategoryKey) -> bool {
        if self.fetched.contains(key) {
            return false;
        }
        self.fetched.insert(key.clone());
        true
    }

    #[cfg(test)]
    pub fn contains(&self, key: &CategoryKey) -> bool {
        self.fetched.contains(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.fetched.len()
    }
}
