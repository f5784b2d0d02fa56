use serde::{Deserialize, Serialize};

use crate::core::TimeScale;
use crate::error::{TimelineError, TimelineResult};

/// Horizontal zoom state `{k, x}`: screen = base * k + x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0 };

    pub fn validate(self) -> TimelineResult<()> {
        if !self.k.is_finite() || self.k <= 0.0 {
            return Err(TimelineError::InvalidData(
                "zoom scale factor must be finite and > 0".to_owned(),
            ));
        }
        if !self.x.is_finite() {
            return Err(TimelineError::InvalidData(
                "zoom translate must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn apply_x(self, pixel: f64) -> f64 {
        pixel * self.k + self.x
    }

    #[must_use]
    pub fn invert_x(self, pixel: f64) -> f64 {
        (pixel - self.x) / self.k
    }

    /// Translates by `dx` base pixels, i.e. `k * dx` screen pixels.
    #[must_use]
    pub fn translate_by(self, dx: f64) -> Self {
        Self {
            k: self.k,
            x: self.x + self.k * dx,
        }
    }

    /// Changes the scale factor to `k` while keeping screen pixel `anchor_x` fixed.
    #[must_use]
    pub fn scale_about(self, k: f64, anchor_x: f64) -> Self {
        let base = self.invert_x(anchor_x);
        Self {
            k,
            x: anchor_x - base * k,
        }
    }

    #[must_use]
    pub fn clamp_scale(self, min_k: f64, max_k: f64) -> Self {
        Self {
            k: self.k.clamp(min_k, max_k),
            x: self.x,
        }
    }

    /// Keeps the viewport `extent` inside `translate_extent` (both in base pixels).
    ///
    /// When the viewport is wider than the allowed extent it is centered.
    #[must_use]
    pub fn constrain(self, extent: (f64, f64), translate_extent: (f64, f64)) -> Self {
        let dx0 = self.invert_x(extent.0) - translate_extent.0;
        let dx1 = self.invert_x(extent.1) - translate_extent.1;
        let shift = if dx1 > dx0 {
            (dx0 + dx1) / 2.0
        } else if dx0 < 0.0 {
            dx0
        } else {
            dx1.max(0.0)
        };
        self.translate_by(shift)
    }

    /// Returns `scale` with its domain narrowed to what this transform shows.
    pub fn rescale(self, scale: TimeScale) -> TimelineResult<TimeScale> {
        let (range_start, range_end) = scale.range();
        let domain_start = scale.invert(self.invert_x(range_start));
        let domain_end = scale.invert(self.invert_x(range_end));
        scale.with_domain(domain_start, domain_end)
    }
}
