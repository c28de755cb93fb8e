use anyhow::Result;

use crate::store::ScoreStore;
use crate::store::schema::StorageData;

/// Keeps the storage map in memory only. Used when no data dir is available.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: StorageData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_total(total: u64) -> Self {
        let mut data = StorageData::default();
        data.set_total_score(total);
        Self { data }
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.data.get(key)
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self) -> u64 {
        self.data.total_score()
    }

    fn write(&mut self, total: u64) -> Result<()> {
        self.data.set_total_score(total);
        Ok(())
    }
}
