use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Linear mapping from epoch milliseconds to pixels.
///
/// The base scale spans `[epoch origin, now]` onto `[0, width]`; zoomed
/// views are produced by [`crate::core::ZoomTransform::rescale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl TimeScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> TimelineResult<Self> {
        validate_interval(domain_start, domain_end, "scale domain")?;
        validate_interval(range_start, range_end, "scale range")?;
        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn range_width(self) -> f64 {
        self.range_end - self.range_start
    }

    #[must_use]
    pub fn map(self, time_ms: f64) -> f64 {
        let normalized = (time_ms - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Pixel distance covered by one millisecond.
    #[must_use]
    pub fn pixels_per_ms(self) -> f64 {
        (self.range_end - self.range_start) / (self.domain_end - self.domain_start)
    }

    /// Closed-interval overlap test against the domain.
    #[must_use]
    pub fn intersects(self, start_ms: f64, end_ms: f64) -> bool {
        let (min, max) = ordered(self.domain_start, self.domain_end);
        !(end_ms < min || start_ms > max)
    }

    pub fn with_domain(self, domain_start: f64, domain_end: f64) -> TimelineResult<Self> {
        Self::new(domain_start, domain_end, self.range_start, self.range_end)
    }

    pub fn with_range(self, range_start: f64, range_end: f64) -> TimelineResult<Self> {
        Self::new(self.domain_start, self.domain_end, range_start, range_end)
    }
}

fn validate_interval(start: f64, end: f64, what: &str) -> TimelineResult<()> {
    if !start.is_finite() || !end.is_finite() || start == end {
        return Err(TimelineError::InvalidData(format!(
            "{what} must be finite and non-zero"
        )));
    }
    Ok(())
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
