//! Load cache keyed by input path pair.

use crate::data::CleanedData;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Identity of one load: the migrant file and the exchange-rate file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputPaths {
    pub migrants: PathBuf,
    pub rates: PathBuf,
}

impl InputPaths {
    pub fn new(migrants: impl Into<PathBuf>, rates: impl Into<PathBuf>) -> Self {
        Self {
            migrants: migrants.into(),
            rates: rates.into(),
        }
    }
}

/// Cleaned results already produced in this process.
#[derive(Default)]
pub struct LoadCache {
    entries: HashMap<InputPaths, Arc<CleanedData>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, paths: &InputPaths) -> Option<Arc<CleanedData>> {
        self.entries.get(paths).cloned()
    }

    /// Store a result and hand back the shared handle.
    pub fn insert(&mut self, paths: InputPaths, data: CleanedData) -> Arc<CleanedData> {
        let data = Arc::new(data);
        self.entries.insert(paths, Arc::clone(&data));
        data
    }

    /// Drop the entry so the next load re-reads the files.
    pub fn invalidate(&mut self, paths: &InputPaths) -> bool {
        self.entries.remove(paths).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_data() -> CleanedData {
        CleanedData {
            migrants: Vec::new(),
            count_columns: Vec::new(),
            exchange_rates: Vec::new(),
        }
    }

    #[test]
    fn test_same_paths_share_one_result() {
        let mut cache = LoadCache::new();
        let paths = InputPaths::new("migrants.csv", "rates.csv");

        let stored = cache.insert(paths.clone(), empty_data());
        let hit = cache.get(&InputPaths::new("migrants.csv", "rates.csv")).unwrap();

        assert!(Arc::ptr_eq(&stored, &hit));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_different_pair_misses() {
        let mut cache = LoadCache::new();
        cache.insert(InputPaths::new("migrants.csv", "rates.csv"), empty_data());

        assert!(cache.get(&InputPaths::new("migrants.csv", "other.csv")).is_none());
        assert!(cache.get(&InputPaths::new("rates.csv", "migrants.csv")).is_none());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let mut cache = LoadCache::new();
        let paths = InputPaths::new("a.csv", "b.csv");
        cache.insert(paths.clone(), empty_data());

        assert!(cache.invalidate(&paths));
        assert!(!cache.invalidate(&paths));
        assert!(cache.is_empty());
    }
}
