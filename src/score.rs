//! Combo counter and score.

/// Streak of consecutive removal batches and the running score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComboState {
    pub combo: u32,
    pub score: u32,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one nonzero removal batch: bump the combo, then score `combo * removed`.
    /// Returns the points awarded.
    pub fn record_batch(&mut self, removed: usize) -> u32 {
        debug_assert!(removed > 0);
        self.combo = self.combo.saturating_add(1);
        let points = self.combo.saturating_mul(removed as u32);
        self.score = self.score.saturating_add(points);
        points
    }

    /// A match pass that removed nothing ends the streak.
    pub fn reset(&mut self) {
        self.combo = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_then_multiply() {
        let mut state = ComboState { combo: 2, score: 10 };
        let points = state.record_batch(4);
        assert_eq!(points, 12);
        assert_eq!(state.combo, 3);
        assert_eq!(state.score, 22);
    }

    #[test]
    fn test_first_batch_scores_removed_count() {
        let mut state = ComboState::new();
        assert_eq!(state.record_batch(3), 3);
        assert_eq!(state.record_batch(3), 6);
        assert_eq!(state.score, 9);
    }

    #[test]
    fn test_reset_keeps_score() {
        let mut state = ComboState { combo: 5, score: 40 };
        state.reset();
        assert_eq!(state.combo, 0);
        assert_eq!(state.score, 40);
    }
}
