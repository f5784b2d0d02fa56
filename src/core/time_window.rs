use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Activity in the half-open interval `[window_start, window_end)`.
///
/// Bounds are epoch milliseconds. `blur_start` is only set on provisional
/// windows and marks where visual blurring begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub window_start: i64,
    pub window_end: i64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_start: Option<i64>,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(window_start: i64, window_end: i64, height: f64) -> Self {
        Self {
            window_start,
            window_end,
            height,
            blur_start: None,
        }
    }

    #[must_use]
    pub const fn with_blur_start(mut self, blur_start: i64) -> Self {
        self.blur_start = Some(blur_start);
        self
    }

    #[must_use]
    pub const fn length_ms(self) -> i64 {
        self.window_end - self.window_start
    }

    pub fn validate(self) -> TimelineResult<()> {
        if self.window_end <= self.window_start {
            return Err(TimelineError::InvalidData(format!(
                "window end {} must be after window start {}",
                self.window_end, self.window_start
            )));
        }
        if !self.height.is_finite() || self.height < 0.0 {
            return Err(TimelineError::InvalidData(
                "window height must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Checks that a batch is non-empty, well formed and ordered by start.
pub(crate) fn validate_batch(windows: &[TimeWindow]) -> TimelineResult<()> {
    if windows.is_empty() {
        return Err(TimelineError::InvalidData(
            "time window batch must not be empty".to_owned(),
        ));
    }
    for window in windows {
        window.validate()?;
    }
    if windows
        .windows(2)
        .any(|pair| pair[1].window_start < pair[0].window_start)
    {
        return Err(TimelineError::InvalidData(
            "time window batch must be ordered by window start".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_rejects_out_of_order_starts() {
        let batch = [
            TimeWindow::new(60_000, 120_000, 1.0),
            TimeWindow::new(0, 60_000, 1.0),
        ];
        let err = validate_batch(&batch).expect_err("out of order");
        assert!(matches!(err, TimelineError::InvalidData(_)));
    }

    #[test]
    fn batch_rejects_empty_and_inverted_windows() {
        assert!(validate_batch(&[]).is_err());
        assert!(validate_batch(&[TimeWindow::new(10, 10, 1.0)]).is_err());
        assert!(validate_batch(&[TimeWindow::new(0, 10, f64::NAN)]).is_err());
    }

    #[test]
    fn camel_case_wire_format() {
        let window: TimeWindow =
            serde_json::from_str(r#"{"windowStart":0,"windowEnd":60000,"height":2.5}"#)
                .expect("parse");
        assert_eq!(window, TimeWindow::new(0, 60_000, 2.5));

        let blurred: TimeWindow = serde_json::from_str(
            r#"{"windowStart":0,"windowEnd":60000,"height":1,"blurStart":30000}"#,
        )
        .expect("parse");
        assert_eq!(blurred.blur_start, Some(30_000));
    }
}
