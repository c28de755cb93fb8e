pub mod json_store;
pub mod memory;
pub mod schema;

use anyhow::Result;

/// Where the total score survives between runs.
pub trait ScoreStore {
    /// Stored total, or 0 when missing or unreadable.
    fn read(&self) -> u64;
    fn write(&mut self, total: u64) -> Result<()>;
}
