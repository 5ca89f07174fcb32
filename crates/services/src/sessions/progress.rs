use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub cycle: u32,
    pub max_cycles: u32,
    /// 1-based position of the card on screen; `cycle_len` once the cycle is done.
    pub position: usize,
    pub cycle_len: usize,
    pub remaining_in_cycle: usize,
    /// Cards currently marked as needing practice.
    pub outstanding: usize,
    pub is_complete: bool,
}
