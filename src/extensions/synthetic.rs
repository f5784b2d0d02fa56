use chrono::{DateTime, Utc};

use crate::api::{ChartId, ZoomPanCoordinator};
use crate::core::TimeWindow;
use crate::error::TimelineResult;

/// Intensity used for placeholder bars after a failed fetch.
pub const PLACEHOLDER_INTENSITY: f64 = 0.7;

const MINUTE_MS: i64 = 60_000;
const SECOND_MS: i64 = 1_000;
const MINUTE_BAR_COUNT: i64 = 175;
const SECOND_BAR_COUNT: i64 = 60;
const SAWTOOTH_PERIOD_MS: i64 = 60 * MINUTE_MS;
const MAX_SYNTHETIC_HEIGHT: f64 = 10.0;

/// Sawtooth growing from 0 to 1 over each hour.
#[must_use]
pub fn sawtooth_hertz(time_ms: i64) -> f64 {
    time_ms.rem_euclid(SAWTOOTH_PERIOD_MS) as f64 / SAWTOOTH_PERIOD_MS as f64
}

/// Locally generated bars that keep a timeline populated without upstream data.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticBars {
    /// Completed minutes up to the start of the current minute.
    pub minutes: Vec<TimeWindow>,
    /// Estimate for the in-progress minute.
    pub provisional: Vec<TimeWindow>,
    /// Completed seconds up to the start of the current second.
    pub seconds: Vec<TimeWindow>,
}

impl SyntheticBars {
    #[must_use]
    pub fn generate(now: DateTime<Utc>, intensity: f64) -> Self {
        let now_ms = now.timestamp_millis();
        let minute_floor = now_ms.div_euclid(MINUTE_MS) * MINUTE_MS;
        let second_floor = now_ms.div_euclid(SECOND_MS) * SECOND_MS;
        let height = |start: i64| sawtooth_hertz(start) * MAX_SYNTHETIC_HEIGHT * intensity;

        let minutes = (-MINUTE_BAR_COUNT..0)
            .map(|offset| {
                let start = minute_floor + offset * MINUTE_MS;
                TimeWindow::new(start, start + MINUTE_MS, height(start))
            })
            .collect();
        let seconds: Vec<TimeWindow> = (-SECOND_BAR_COUNT..0)
            .map(|offset| {
                let start = second_floor + offset * SECOND_MS;
                TimeWindow::new(start, start + SECOND_MS, height(start))
            })
            .collect();

        let received: Vec<&TimeWindow> = seconds
            .iter()
            .filter(|window| window.window_start >= minute_floor)
            .collect();
        let estimate = if received.is_empty() {
            0.0
        } else {
            received.iter().map(|window| window.height).sum::<f64>() / received.len() as f64
        };
        // Blur starts after the last received second, not at the minute's
        // end, so the observed part of the estimate is drawn sharp.
        let blur_start = minute_floor + SECOND_MS * received.len() as i64;
        let provisional = vec![
            TimeWindow::new(minute_floor, minute_floor + MINUTE_MS, estimate)
                .with_blur_start(blur_start),
        ];

        Self {
            minutes,
            provisional,
            seconds,
        }
    }

    /// Adds minute bars (with the provisional estimate) and second bars.
    pub fn apply(
        &self,
        coordinator: &mut ZoomPanCoordinator,
        chart: &ChartId,
    ) -> TimelineResult<()> {
        coordinator.add_bars(chart, &self.minutes, &self.provisional)?;
        coordinator.add_bars(chart, &self.seconds, &[])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sawtooth_wraps_every_hour() {
        assert_eq!(sawtooth_hertz(0), 0.0);
        assert_eq!(sawtooth_hertz(30 * MINUTE_MS), 0.5);
        assert_eq!(sawtooth_hertz(SAWTOOTH_PERIOD_MS), 0.0);
        assert_eq!(sawtooth_hertz(-30 * MINUTE_MS), 0.5);
    }
}
