pub const DRILL_CORRECT: i64 = 10;
pub const DRILL_INCORRECT: i64 = -2;
pub const DAILY_CORRECT: i64 = 50;
pub const DAILY_INCORRECT: i64 = -5;

/// New total after applying a signed delta. The total never drops below zero.
pub fn apply(total: u64, delta: i64) -> u64 {
    total.saturating_add_signed(delta)
}

/// Running process-wide score. Persistence is the caller's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    total: u64,
}

impl ScoreLedger {
    pub fn new(total: u64) -> Self {
        Self { total }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn apply(&mut self, delta: i64) -> u64 {
        self.total = apply(self.total, delta);
        self.total
    }
}
