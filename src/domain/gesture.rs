// SPDX-License-Identifier: MPL-2.0
//! Swipe gesture classification.
//!
//! A drag is reported as a displacement vector `(dx, dy)` in view units, with
//! `dx < 0` to the left and `dy < 0` upward. The dominant axis decides which
//! threshold applies; anything that does not clear its threshold is a skip.

use crate::config::defaults::{
    DEFAULT_HORIZONTAL_THRESHOLD, DEFAULT_VERTICAL_THRESHOLD, MAX_SWIPE_THRESHOLD,
    MIN_SWIPE_THRESHOLD,
};

/// 2D drag displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureVector {
    pub dx: f32,
    pub dy: f32,
}

impl GestureVector {
    #[must_use]
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    fn is_finite(self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

/// Discrete result of classifying a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    /// Horizontal swipe on the primary side (left by default).
    Primary,
    /// Horizontal swipe on the opposite side.
    Secondary,
    /// Upward swipe.
    Tertiary,
    /// No bucket change; the cursor still advances.
    Skip,
}

impl Outcome {
    /// Outcomes that route into a bucket.
    pub const ROUTED: [Outcome; 3] = [Outcome::Primary, Outcome::Secondary, Outcome::Tertiary];

    /// Returns `true` for [`Outcome::Skip`].
    #[must_use]
    pub fn is_skip(self) -> bool {
        matches!(self, Outcome::Skip)
    }
}

/// A swipe threshold in view units, clamped to 1–2000.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f32);

impl Threshold {
    /// Creates a threshold, clamping to the valid range. Non-finite input
    /// falls back to the maximum.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(MIN_SWIPE_THRESHOLD, MAX_SWIPE_THRESHOLD))
        } else {
            Self(MAX_SWIPE_THRESHOLD)
        }
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

/// Threshold policy used to turn a [`GestureVector`] into an [`Outcome`].
///
/// # Example
///
/// ```
/// use photo_swipe::domain::gesture::{GestureVector, Outcome, SwipeThresholds};
///
/// let policy = SwipeThresholds::default();
/// assert_eq!(policy.classify(GestureVector::new(-150.0, 0.0)), Outcome::Primary);
/// assert_eq!(policy.classify(GestureVector::new(150.0, 20.0)), Outcome::Secondary);
/// assert_eq!(policy.classify(GestureVector::new(0.0, -200.0)), Outcome::Tertiary);
/// assert_eq!(policy.classify(GestureVector::new(30.0, 40.0)), Outcome::Skip);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThresholds {
    pub horizontal: Threshold,
    pub vertical: Threshold,
    /// When `true` a leftward swipe is [`Outcome::Primary`]; otherwise rightward is.
    pub primary_on_left: bool,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            horizontal: Threshold::new(DEFAULT_HORIZONTAL_THRESHOLD),
            vertical: Threshold::new(DEFAULT_VERTICAL_THRESHOLD),
            primary_on_left: true,
        }
    }
}

impl SwipeThresholds {
    #[must_use]
    pub fn new(horizontal: f32, vertical: f32, primary_on_left: bool) -> Self {
        Self {
            horizontal: Threshold::new(horizontal),
            vertical: Threshold::new(vertical),
            primary_on_left,
        }
    }

    /// Classifies a drag displacement.
    ///
    /// Ties between the axes go to the vertical branch. A downward swipe past
    /// the vertical threshold is a skip.
    #[must_use]
    pub fn classify(&self, vector: GestureVector) -> Outcome {
        if !vector.is_finite() {
            return Outcome::Skip;
        }

        let GestureVector { dx, dy } = vector;
        if dx.abs() > dy.abs() {
            if dx.abs() <= self.horizontal.value() {
                return Outcome::Skip;
            }
            if (dx < 0.0) == self.primary_on_left {
                Outcome::Primary
            } else {
                Outcome::Secondary
            }
        } else if dy < -self.vertical.value() {
            Outcome::Tertiary
        } else {
            Outcome::Skip
        }
    }
}
