use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::core::TimeScale;

/// Horizontal pixels per axis tick.
pub const AXIS_TICK_SPACING_PX: f64 = 80.0;

const MAX_TICKS: usize = 1_000;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const MONTH_APPROX_MS: i64 = 30 * DAY_MS;
const YEAR_APPROX_MS: i64 = 365 * DAY_MS;

const FIXED_STEPS_MS: [i64; 15] = [
    SECOND_MS,
    5 * SECOND_MS,
    15 * SECOND_MS,
    30 * SECOND_MS,
    MINUTE_MS,
    5 * MINUTE_MS,
    15 * MINUTE_MS,
    30 * MINUTE_MS,
    HOUR_MS,
    3 * HOUR_MS,
    6 * HOUR_MS,
    12 * HOUR_MS,
    DAY_MS,
    2 * DAY_MS,
    7 * DAY_MS,
];

/// One labelled instant on the time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub time_ms: i64,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickStep {
    Fixed(i64),
    Months(u32),
    Years(i32),
}

pub(super) fn axis_tick_target_count(axis_span_px: f64) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return 1;
    }
    ((axis_span_px / AXIS_TICK_SPACING_PX).floor() as usize).max(1)
}

/// UTC ticks at calendar-aligned instants, about one per 80px.
#[must_use]
pub fn time_axis_ticks(scale: TimeScale) -> Vec<AxisTick> {
    let count = axis_tick_target_count(scale.range_width().abs());
    let (a, b) = scale.domain();
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    let step = select_step((end - start) / count as f64);

    let times = match step {
        TickStep::Fixed(step_ms) => fixed_ticks(start, end, step_ms),
        TickStep::Months(months) => month_ticks(start, end, months),
        TickStep::Years(years) => year_ticks(start, end, years),
    };

    times
        .into_iter()
        .filter_map(|time_ms| {
            let datetime = DateTime::from_timestamp_millis(time_ms)?;
            Some(AxisTick {
                time_ms,
                x: scale.map(time_ms as f64),
                label: format_label(datetime, step),
            })
        })
        .collect()
}

fn select_step(target_ms: f64) -> TickStep {
    if !target_ms.is_finite() || target_ms <= 0.0 {
        return TickStep::Fixed(SECOND_MS);
    }
    if target_ms < SECOND_MS as f64 {
        return TickStep::Fixed(nice_step(target_ms).max(1.0) as i64);
    }
    if let Some(&step) = FIXED_STEPS_MS.iter().find(|&&step| step as f64 >= target_ms) {
        return TickStep::Fixed(step);
    }
    if target_ms <= MONTH_APPROX_MS as f64 {
        return TickStep::Months(1);
    }
    if target_ms <= 3.0 * MONTH_APPROX_MS as f64 {
        return TickStep::Months(3);
    }
    let years = nice_step(target_ms / YEAR_APPROX_MS as f64).max(1.0);
    TickStep::Years(years.min(f64::from(i32::MAX)) as i32)
}

/// Smallest of 1, 2, 5 times a power of ten that is >= `value`.
fn nice_step(value: f64) -> f64 {
    let magnitude = 10f64.powf(value.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|factor| factor * magnitude)
        .find(|candidate| *candidate >= value)
        .unwrap_or(10.0 * magnitude)
}

fn fixed_ticks(start: f64, end: f64, step_ms: i64) -> Vec<i64> {
    let first = (start / step_ms as f64).ceil() as i64 * step_ms;
    (0..)
        .map(|i| first + i * step_ms)
        .take_while(|&t| (t as f64) <= end)
        .take(MAX_TICKS)
        .collect()
}

fn month_ticks(start: f64, end: f64, months: u32) -> Vec<i64> {
    let Some(origin) = DateTime::from_timestamp_millis(start.floor() as i64) else {
        return Vec::new();
    };
    let mut year = origin.year();
    let mut month0 = origin.month0() - origin.month0() % months;
    let mut ticks = Vec::new();
    while ticks.len() < MAX_TICKS {
        let Some(time_ms) = month_start_ms(year, month0 + 1) else {
            break;
        };
        if time_ms as f64 > end {
            break;
        }
        if time_ms as f64 >= start {
            ticks.push(time_ms);
        }
        month0 += months;
        if month0 >= 12 {
            month0 -= 12;
            year += 1;
        }
    }
    ticks
}

fn year_ticks(start: f64, end: f64, years: i32) -> Vec<i64> {
    let Some(origin) = DateTime::from_timestamp_millis(start.floor() as i64) else {
        return Vec::new();
    };
    let mut year = origin.year().div_euclid(years) * years;
    let mut ticks = Vec::new();
    while ticks.len() < MAX_TICKS {
        let Some(time_ms) = month_start_ms(year, 1) else {
            break;
        };
        if time_ms as f64 > end {
            break;
        }
        if time_ms as f64 >= start {
            ticks.push(time_ms);
        }
        year = match year.checked_add(years) {
            Some(next) => next,
            None => break,
        };
    }
    ticks
}

fn month_start_ms(year: i32, month: u32) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn format_label(datetime: DateTime<Utc>, step: TickStep) -> String {
    let pattern = match step {
        TickStep::Fixed(step_ms) if step_ms < SECOND_MS => "%H:%M:%S%.3f",
        TickStep::Fixed(step_ms) if step_ms < MINUTE_MS => "%H:%M:%S",
        TickStep::Fixed(step_ms) if step_ms < DAY_MS => "%H:%M",
        TickStep::Fixed(_) => "%b %d",
        TickStep::Months(_) => "%b %Y",
        TickStep::Years(_) => "%Y",
    };
    datetime.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_selection_prefers_calendar_friendly_intervals() {
        assert_eq!(select_step(40_000.0), TickStep::Fixed(MINUTE_MS));
        assert_eq!(select_step(20.0 * DAY_MS as f64), TickStep::Months(1));
        assert_eq!(select_step(3.0 * YEAR_APPROX_MS as f64), TickStep::Years(5));
        assert_eq!(select_step(3.0), TickStep::Fixed(5));
    }

    #[test]
    fn target_count_is_at_least_one() {
        assert_eq!(axis_tick_target_count(10.0), 1);
        assert_eq!(axis_tick_target_count(800.0), 10);
        assert_eq!(axis_tick_target_count(f64::NAN), 1);
    }
}
