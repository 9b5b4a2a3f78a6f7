//! Review cursor over the loaded feed
//!
//! Tracks which card is shown and whether its answer is revealed. Pure state;
//! the orchestrator in `home` drives it.

/// What the home screen should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    /// Nothing loaded yet and a load is running
    Loading,
    /// Question side of the current card
    Browsing,
    /// Answer side of the current card
    Revealed,
    /// Feed exhausted with no items for this filter
    Empty,
}

/// Result of moving past the current card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub from: usize,
    pub to: usize,
    /// Moved from the last item back to the first
    pub wrapped: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewState {
    current_index: usize,
    revealed: bool,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Show the answer. No-op on an empty feed.
    pub fn reveal(&mut self, feed_len: usize) -> bool {
        if feed_len == 0 || self.revealed {
            return false;
        }
        self.revealed = true;
        true
    }

    /// Hide the answer without reacting
    pub fn dismiss(&mut self) -> bool {
        let was_revealed = self.revealed;
        self.revealed = false;
        was_revealed
    }

    /// Step to the next card, wrapping to the first after the last.
    /// Returns `None` when the feed is empty.
    pub fn advance(&mut self, feed_len: usize) -> Option<Advance> {
        if feed_len == 0 {
            return None;
        }
        let from = self.current_index.min(feed_len - 1);
        let (to, wrapped) = if from + 1 < feed_len {
            (from + 1, false)
        } else {
            (0, true)
        };
        self.current_index = to;
        self.revealed = false;
        Some(Advance { from, to, wrapped })
    }

    /// Keep the index inside `[0, feed_len)`
    pub fn clamp(&mut self, feed_len: usize) {
        if feed_len == 0 {
            self.current_index = 0;
            self.revealed = false;
        } else if self.current_index >= feed_len {
            self.current_index = feed_len - 1;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self, feed_len: usize, loading: bool, is_end: bool) -> ReviewPhase {
        if feed_len == 0 {
            if is_end && !loading {
                ReviewPhase::Empty
            } else {
                ReviewPhase::Loading
            }
        } else if self.revealed {
            ReviewPhase::Revealed
        } else {
            ReviewPhase::Browsing
        }
    }
}

/// Whether the next page should be requested for a card at `index`
pub fn needs_prefetch(index: usize, feed_len: usize, margin: usize, is_end: bool) -> bool {
    !is_end && feed_len.saturating_sub(index) <= margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps_after_last() {
        let mut state = ReviewState::new();
        for expected in [1, 2, 0, 1] {
            let step = state.advance(3).unwrap();
            assert_eq!(step.to, expected);
            assert_eq!(step.wrapped, expected == 0);
        }
    }

    #[test]
    fn test_advance_on_empty_feed() {
        let mut state = ReviewState::new();
        assert!(state.advance(0).is_none());
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn test_reveal_and_dismiss() {
        let mut state = ReviewState::new();
        assert!(!state.reveal(0));
        assert!(state.reveal(2));
        assert!(state.is_revealed());
        assert!(state.dismiss());
        assert!(!state.dismiss());
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn test_advance_clears_reveal() {
        let mut state = ReviewState::new();
        state.reveal(2);
        state.advance(2);
        assert!(!state.is_revealed());
    }

    #[test]
    fn test_phase() {
        let mut state = ReviewState::new();
        assert_eq!(state.phase(0, true, false), ReviewPhase::Loading);
        assert_eq!(state.phase(0, false, true), ReviewPhase::Empty);
        assert_eq!(state.phase(3, false, false), ReviewPhase::Browsing);
        state.reveal(3);
        assert_eq!(state.phase(3, false, false), ReviewPhase::Revealed);
    }

    #[test]
    fn test_needs_prefetch() {
        assert!(needs_prefetch(45, 50, 5, false));
        assert!(!needs_prefetch(44, 50, 5, false));
        assert!(!needs_prefetch(49, 50, 5, true));
    }
}
