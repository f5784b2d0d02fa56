//! Gesture helpers that turn host input into [`ZoomTransform`] updates.

use serde::{Deserialize, Serialize};

use crate::core::ZoomTransform;
use crate::error::{TimelineError, TimelineResult};

/// Unit of a wheel event's `deltaY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelDeltaMode {
    Pixel,
    Line,
    Page,
}

/// Multiplicative zoom factor for one wheel event.
///
/// Scrolling down (`delta_y > 0`) zooms out.
#[must_use]
pub fn wheel_zoom_factor(delta_y: f64, mode: WheelDeltaMode) -> f64 {
    let per_unit = match mode {
        WheelDeltaMode::Pixel => 0.002,
        WheelDeltaMode::Line => 0.05,
        WheelDeltaMode::Page => 1.0,
    };
    (-delta_y * per_unit).exp2()
}

/// Cubic in-out easing over `t` in `[0, 1]`.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Time-driven zoom from one scale factor to another about a fixed anchor.
///
/// The scale factor is interpolated geometrically so each frame zooms by
/// the same ratio; the anchor pixel keeps showing the same instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransition {
    from: ZoomTransform,
    target_k: f64,
    anchor_x: f64,
    duration_ms: f64,
    elapsed_ms: f64,
}

impl ZoomTransition {
    pub fn new(
        from: ZoomTransform,
        target_k: f64,
        anchor_x: f64,
        duration_ms: f64,
    ) -> TimelineResult<Self> {
        from.validate()?;
        if !target_k.is_finite() || target_k <= 0.0 {
            return Err(TimelineError::InvalidData(
                "transition target scale must be finite and > 0".to_owned(),
            ));
        }
        if !anchor_x.is_finite() {
            return Err(TimelineError::InvalidData(
                "transition anchor must be finite".to_owned(),
            ));
        }
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(TimelineError::InvalidData(
                "transition duration must be finite and >= 0".to_owned(),
            ));
        }
        Ok(Self {
            from,
            target_k,
            anchor_x,
            duration_ms,
            elapsed_ms: 0.0,
        })
    }

    #[must_use]
    pub fn target_k(&self) -> f64 {
        self.target_k
    }

    #[must_use]
    pub fn remaining_ms(&self) -> f64 {
        (self.duration_ms - self.elapsed_ms).max(0.0)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Transform at the current progress.
    #[must_use]
    pub fn current(&self) -> ZoomTransform {
        let eased = ease_cubic_in_out(self.progress());
        let k = self.from.k * (self.target_k / self.from.k).powf(eased);
        self.from.scale_about(k, self.anchor_x)
    }

    #[must_use]
    pub fn target(&self) -> ZoomTransform {
        self.from.scale_about(self.target_k, self.anchor_x)
    }

    /// Advances by `delta_ms` and returns the new transform.
    pub fn step(&mut self, delta_ms: f64) -> ZoomTransform {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + delta_ms).min(self.duration_ms);
        }
        if self.is_finished() {
            self.target()
        } else {
            self.current()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
    }

    #[test]
    fn remaining_time_shrinks_with_each_step() {
        let mut transition =
            ZoomTransition::new(ZoomTransform { k: 1.0, x: 0.0 }, 8.0, 100.0, 750.0)
                .expect("transition");
        assert_eq!(transition.remaining_ms(), 750.0);
        transition.step(500.0);
        assert_eq!(transition.remaining_ms(), 250.0);
        assert_eq!(transition.target_k(), 8.0);
        transition.step(1000.0);
        assert_eq!(transition.remaining_ms(), 0.0);
        assert!(transition.is_finished());
    }

    #[test]
    fn wheel_factor_direction() {
        assert!(wheel_zoom_factor(-100.0, WheelDeltaMode::Pixel) > 1.0);
        assert!(wheel_zoom_factor(100.0, WheelDeltaMode::Pixel) < 1.0);
        assert_eq!(wheel_zoom_factor(-1.0, WheelDeltaMode::Page), 2.0);
    }
}
