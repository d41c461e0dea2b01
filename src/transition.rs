//! Time-based interpolation for animated updates.
//!
//! A [`Transition`] holds a start value, a target, a start time and a
//! duration. Time is supplied by the caller, so any frame can be evaluated
//! deterministically. Retargeting mid-flight starts a fresh transition from
//! the currently interpolated value.

use std::time::Duration;

use crate::geometry::Point;

/// Default duration of every chart transition.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1000);

/// Easing curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Symmetric cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map `t` in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// Values that can be interpolated.
pub trait Lerp: Copy {
    /// Interpolate from `self` to `other` at `t` in `[0, 1]`.
    #[must_use]
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, other: Self, t: f32) -> Self {
        Point::lerp(self, other, t)
    }
}

/// A value animating from one state to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T> {
    from: T,
    to: T,
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl<T: Lerp> Transition<T> {
    /// A transition that is already at rest on `value`.
    #[must_use]
    pub fn settled(value: T) -> Self {
        Self {
            from: value,
            to: value,
            start: Duration::ZERO,
            duration: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    /// A transition from `from` to `to` starting at `start`.
    #[must_use]
    pub fn new(from: T, to: T, start: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing: Easing::default(),
        }
    }

    /// Use a different easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized, un-eased progress at `now`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Interpolated value at `now`.
    #[must_use]
    pub fn value_at(&self, now: Duration) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(t))
    }

    /// Whether the transition is still moving at `now`.
    #[must_use]
    pub fn is_running(&self, now: Duration) -> bool {
        self.progress(now) < 1.0
    }

    /// Final value.
    #[must_use]
    pub fn target(&self) -> T {
        self.to
    }

    /// Start a new transition toward `to`, beginning from wherever this one
    /// is at `now`.
    pub fn retarget(&mut self, to: T, now: Duration, duration: Duration) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
    }
}
