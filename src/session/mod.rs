pub mod daily;
pub mod drill;
pub mod input;

/// Identifies one run of a screen. Worker replies carry the id of the session
/// that asked so replies for a replaced session can be dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);
