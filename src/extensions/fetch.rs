use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{AddBarsOutcome, ChartId, ZoomPanCoordinator};
use crate::core::time_window::validate_batch;
use crate::core::{TimeWindow, ZoomLevelTable};
use crate::error::{TimelineError, TimelineResult};

use super::{PLACEHOLDER_INTENSITY, SyntheticBars};

const TRAILING_WINDOW_MS: i64 = 3_600_000;
const MAX_TILE_HEIGHT: f64 = 10.0;

/// Parameters of one timeline tile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineQuery {
    pub process_id: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub resolution: String,
}

impl TimelineQuery {
    /// The hour ending at `now + offset_ms`.
    #[must_use]
    pub fn trailing_hour(
        process_id: impl Into<String>,
        now: DateTime<Utc>,
        offset_ms: i64,
        resolution: impl Into<String>,
    ) -> Self {
        let stop = now + chrono::Duration::milliseconds(offset_ms);
        Self {
            process_id: process_id.into(),
            start: stop - chrono::Duration::milliseconds(TRAILING_WINDOW_MS),
            stop,
            resolution: resolution.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        format!("/api/process/{}/timeline", self.process_id)
    }

    /// Query parameters with ISO-8601 UTC timestamps.
    #[must_use]
    pub fn params(&self) -> [(&'static str, String); 3] {
        [
            (
                "start",
                self.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            ("stop", self.stop.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("resolution", self.resolution.clone()),
        ]
    }
}

/// Upstream tile; bounds are epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineTile {
    pub window_start: i64,
    pub window_end: i64,
    #[serde(default)]
    pub n_output_events: u64,
}

impl TimelineTile {
    /// Events per second, capped at 10, with a floor of 1 for any activity.
    #[must_use]
    pub fn height(self) -> f64 {
        let duration = (self.window_end - self.window_start) as f64;
        if duration <= 0.0 || self.n_output_events == 0 {
            return 0.0;
        }
        (self.n_output_events as f64 / duration).clamp(1.0, MAX_TILE_HEIGHT)
    }

    /// Converts second bounds to milliseconds.
    pub fn to_time_window(self) -> TimelineResult<TimeWindow> {
        let to_ms = |seconds: i64| {
            seconds.checked_mul(1000).ok_or_else(|| {
                TimelineError::FetchFailure(format!("tile bound {seconds}s overflows epoch ms"))
            })
        };
        Ok(TimeWindow::new(
            to_ms(self.window_start)?,
            to_ms(self.window_end)?,
            self.height(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineTileRecord {
    pub tile: TimelineTile,
}

/// Parses a timeline response body into an ordered, well-formed batch.
///
/// Every failure, including malformed tiles, is a `FetchFailure`.
pub fn parse_timeline_response(body: &str) -> TimelineResult<Vec<TimeWindow>> {
    let records: Vec<TimelineTileRecord> = serde_json::from_str(body).map_err(|e| {
        TimelineError::FetchFailure(format!("failed to parse timeline response: {e}"))
    })?;
    let windows = records
        .into_iter()
        .map(|record| record.tile.to_time_window())
        .collect::<TimelineResult<Vec<_>>>()?;
    if !windows.is_empty() {
        validate_batch(&windows).map_err(upstream_failure)?;
    }
    Ok(windows)
}

/// Rejects batches the coordinator would refuse, so they can be replaced
/// by placeholders instead of surfacing to the host.
fn check_upstream_batch(windows: &[TimeWindow], levels: &ZoomLevelTable) -> TimelineResult<()> {
    let Some(first) = windows.first() else {
        return Ok(());
    };
    validate_batch(windows).map_err(upstream_failure)?;
    levels
        .classify(first.length_ms())
        .map_err(upstream_failure)?;
    Ok(())
}

fn upstream_failure(err: TimelineError) -> TimelineError {
    match err {
        TimelineError::FetchFailure(_) => err,
        other => TimelineError::FetchFailure(format!("malformed timeline response: {other}")),
    }
}

/// Identifies one in-flight fetch for a chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    chart: ChartId,
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub fn chart(&self) -> &ChartId {
        &self.chart
    }
}

/// What a fetch completion did to the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchResolution {
    /// Upstream windows were merged; `None` for an empty response.
    Applied(Option<AddBarsOutcome>),
    /// The fetch failed and placeholder bars were synthesized instead.
    Placeholder,
    /// The fetch was cancelled or superseded; nothing was applied.
    Cancelled,
}

/// Tracks at most one live fetch per chart.
///
/// Starting a fetch supersedes the previous one for the same chart, and
/// completions of superseded or cancelled fetches are dropped.
#[derive(Debug, Default)]
pub struct FetchTracker {
    next_generation: u64,
    in_flight: IndexMap<ChartId, u64>,
}

impl FetchTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, chart: ChartId) -> FetchTicket {
        let generation = self.next_generation;
        self.next_generation += 1;
        if let Some(previous) = self.in_flight.insert(chart.clone(), generation) {
            debug!(chart = %chart, previous, generation, "supersede in-flight fetch");
        }
        FetchTicket { chart, generation }
    }

    /// Aborts the live fetch of `chart`. Returns `true` if one was in flight.
    pub fn cancel(&mut self, chart: &ChartId) -> bool {
        self.in_flight.shift_remove(chart).is_some()
    }

    #[must_use]
    pub fn is_live(&self, ticket: &FetchTicket) -> bool {
        self.in_flight.get(&ticket.chart) == Some(&ticket.generation)
    }

    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Applies a fetch outcome if its ticket is still live.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: TimelineResult<Vec<TimeWindow>>,
        coordinator: &mut ZoomPanCoordinator,
        now: DateTime<Utc>,
    ) -> TimelineResult<FetchResolution> {
        if !self.is_live(&ticket) {
            debug!(
                chart = %ticket.chart,
                generation = ticket.generation,
                "drop cancelled fetch result"
            );
            return Ok(FetchResolution::Cancelled);
        }
        self.in_flight.shift_remove(&ticket.chart);

        let checked = outcome.and_then(|windows| {
            check_upstream_batch(&windows, coordinator.levels())?;
            Ok(windows)
        });
        let windows = match checked {
            Ok(windows) if windows.is_empty() => return Ok(FetchResolution::Applied(None)),
            Ok(windows) => windows,
            Err(err) => return substitute_placeholder(&ticket.chart, &err, coordinator, now),
        };
        match coordinator.add_bars(&ticket.chart, &windows, &[]) {
            Ok(applied) => Ok(FetchResolution::Applied(Some(applied))),
            Err(err @ TimelineError::UnknownChart(_)) => Err(err),
            Err(err) => {
                substitute_placeholder(&ticket.chart, &upstream_failure(err), coordinator, now)
            }
        }
    }
}

fn substitute_placeholder(
    chart: &ChartId,
    err: &TimelineError,
    coordinator: &mut ZoomPanCoordinator,
    now: DateTime<Utc>,
) -> TimelineResult<FetchResolution> {
    warn!(
        chart = %chart,
        error = %err,
        "timeline fetch failed, substituting placeholder bars"
    );
    SyntheticBars::generate(now, PLACEHOLDER_INTENSITY).apply(coordinator, chart)?;
    Ok(FetchResolution::Placeholder)
}
