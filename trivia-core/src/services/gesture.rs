//! Horizontal drag tracking for the review card
//!
//! A drag released at or past `commit_threshold * viewport_width` commits a
//! swipe; anything shorter snaps back. Right commits a like, left a dislike.

use crate::domain::ReactionKind;

pub const DEFAULT_COMMIT_THRESHOLD: f32 = 0.25;

/// Card scale at half a viewport of horizontal travel
pub const MIN_DRAG_SCALE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl Default for GestureState {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn reaction(&self) -> ReactionKind {
        match self {
            SwipeDirection::Right => ReactionKind::Like,
            SwipeDirection::Left => ReactionKind::Dislike,
        }
    }
}

/// Outcome of lifting the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragRelease {
    /// Card leaves the screen towards `exit_x`
    Commit { direction: SwipeDirection, exit_x: f32 },
    /// Card springs back to rest
    Cancel,
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    viewport_width: f32,
    commit_threshold: f32,
    active: Option<GestureState>,
}

impl GestureTracker {
    pub fn new(viewport_width: f32, commit_threshold: f32) -> Self {
        let commit_threshold = if commit_threshold > 0.0 && commit_threshold <= 1.0 {
            commit_threshold
        } else {
            DEFAULT_COMMIT_THRESHOLD
        };
        Self {
            viewport_width: viewport_width.max(1.0),
            commit_threshold,
            active: None,
        }
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width.max(1.0);
    }

    /// Minimum horizontal travel that commits
    pub fn commit_distance(&self) -> f32 {
        self.viewport_width * self.commit_threshold
    }

    pub fn begin(&mut self) {
        self.active = Some(GestureState::default());
    }

    /// Move to the cumulative translation `(dx, dy)` since the drag began.
    /// Starts a drag implicitly if none is active.
    pub fn update(&mut self, dx: f32, dy: f32) -> GestureState {
        let half = self.viewport_width / 2.0;
        let progress = (dx.abs() / half).clamp(0.0, 1.0);
        let state = GestureState {
            offset_x: dx,
            offset_y: dy,
            scale: 1.0 - (1.0 - MIN_DRAG_SCALE) * progress,
        };
        self.active = Some(state);
        state
    }

    /// End the drag. The gesture state is cleared either way.
    pub fn release(&mut self) -> DragRelease {
        let Some(state) = self.active.take() else {
            return DragRelease::Cancel;
        };
        if state.offset_x.abs() >= self.commit_distance() {
            let direction = if state.offset_x > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            let exit_x = match direction {
                SwipeDirection::Right => self.viewport_width,
                SwipeDirection::Left => -self.viewport_width,
            };
            DragRelease::Commit { direction, exit_x }
        } else {
            DragRelease::Cancel
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Current drag, or the rest state
    pub fn current(&self) -> GestureState {
        self.active.unwrap_or_default()
    }

    /// Like badge opacity, full at a quarter viewport to the right
    pub fn like_opacity(&self) -> f32 {
        (self.current().offset_x / (self.viewport_width / 4.0)).clamp(0.0, 1.0)
    }

    /// Dislike badge opacity, full at a quarter viewport to the left
    pub fn dislike_opacity(&self) -> f32 {
        (-self.current().offset_x / (self.viewport_width / 4.0)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold_cancels() {
        let mut tracker = GestureTracker::new(400.0, 0.25);
        tracker.begin();
        tracker.update(99.0, 10.0);
        assert_eq!(tracker.release(), DragRelease::Cancel);
        assert!(!tracker.is_active());
        assert_eq!(tracker.current(), GestureState::default());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut tracker = GestureTracker::new(400.0, 0.25);
        tracker.update(-100.0, 0.0);
        assert_eq!(
            tracker.release(),
            DragRelease::Commit {
                direction: SwipeDirection::Left,
                exit_x: -400.0
            }
        );
    }

    #[test]
    fn test_right_commit_is_like() {
        let mut tracker = GestureTracker::new(400.0, 0.25);
        tracker.update(250.0, -30.0);
        match tracker.release() {
            DragRelease::Commit { direction, exit_x } => {
                assert_eq!(direction.reaction(), ReactionKind::Like);
                assert_eq!(exit_x, 400.0);
            }
            DragRelease::Cancel => panic!("expected commit"),
        }
    }

    #[test]
    fn test_scale_interpolation() {
        let mut tracker = GestureTracker::new(400.0, 0.25);
        assert_eq!(tracker.update(0.0, 0.0).scale, 1.0);
        assert!((tracker.update(100.0, 0.0).scale - 0.95).abs() < 1e-6);
        assert!((tracker.update(-1000.0, 0.0).scale - MIN_DRAG_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_overlay_opacity() {
        let mut tracker = GestureTracker::new(400.0, 0.25);
        tracker.update(50.0, 0.0);
        assert!((tracker.like_opacity() - 0.5).abs() < 1e-6);
        assert_eq!(tracker.dislike_opacity(), 0.0);
        tracker.update(-200.0, 0.0);
        assert_eq!(tracker.dislike_opacity(), 1.0);
    }

    #[test]
    fn test_release_without_drag() {
        let mut tracker = GestureTracker::new(400.0, 0.25);
        assert_eq!(tracker.release(), DragRelease::Cancel);
    }

    #[test]
    fn test_invalid_threshold_falls_back() {
        let tracker = GestureTracker::new(400.0, 0.0);
        assert_eq!(tracker.commit_distance(), 100.0);
    }
}
