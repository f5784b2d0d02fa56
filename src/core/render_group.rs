use crate::core::{TimeWindow, ZoomLevel};
use crate::render::{BarRect, Color, GroupContainer};

/// Fixed bar layout constants shared by every group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    /// Local units between two consecutive nominal windows.
    pub bar_interval: f64,
    pub bar_width: f64,
    pub bar_max_height: f64,
    pub fill: Color,
}

/// Bars for one contiguous time span at one zoom level.
///
/// Bar positions are kept relative to `start`, in bar-interval units, so
/// their magnitude depends on how many windows the group holds and never on
/// how far `start` is from the epoch. `start` is fixed at creation; the
/// group only grows forward.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGroup {
    level: ZoomLevel,
    window_length_ms: i64,
    start: i64,
    end: i64,
    windows: Vec<TimeWindow>,
    provisional: Vec<TimeWindow>,
    container: GroupContainer,
}

impl RenderGroup {
    #[must_use]
    pub fn new(level: ZoomLevel, window_length_ms: i64, start: i64) -> Self {
        Self {
            level,
            window_length_ms,
            start,
            end: start,
            windows: Vec::new(),
            provisional: Vec::new(),
            container: GroupContainer::default(),
        }
    }

    #[must_use]
    pub fn level(&self) -> ZoomLevel {
        self.level
    }

    /// Nominal window length of the group's zoom level.
    #[must_use]
    pub fn window_length_ms(&self) -> i64 {
        self.window_length_ms
    }

    #[must_use]
    pub fn start(&self) -> i64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Finalized windows, ordered by `window_start`.
    #[must_use]
    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Provisional (blurred) windows awaiting a finalized replacement.
    #[must_use]
    pub fn provisional_windows(&self) -> &[TimeWindow] {
        &self.provisional
    }

    #[must_use]
    pub fn container(&self) -> &GroupContainer {
        &self.container
    }

    pub(crate) fn container_mut(&mut self) -> &mut GroupContainer {
        &mut self.container
    }

    /// Closed-interval containment, so a group ending at `t` still owns a
    /// batch that starts at `t`.
    #[must_use]
    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn extend(&mut self, new_end: i64) {
        self.end = self.end.max(new_end);
    }

    /// Upserts `incoming` over its own span `[first.start, last.end)`.
    ///
    /// Retained windows starting inside the span are replaced; everything
    /// outside it is kept. Provisional windows inside the span are dropped.
    pub fn merge_windows(&mut self, incoming: &[TimeWindow]) {
        let (Some(first), Some(last)) = (incoming.first(), incoming.last()) else {
            return;
        };
        let span_start = first.window_start;
        let span_end = last.window_end;

        let start_index = self
            .windows
            .partition_point(|window| window.window_start < span_start);
        let end_index = self
            .windows
            .partition_point(|window| window.window_start < span_end);
        self.windows
            .splice(start_index..end_index, incoming.iter().copied());

        self.provisional
            .retain(|window| window.window_start < span_start || window.window_start >= span_end);
    }

    /// Drops finalized windows starting inside `[span_start, span_end)`.
    ///
    /// Returns how many were removed. The group's span is left unchanged.
    pub fn discard_span(&mut self, span_start: i64, span_end: i64) -> usize {
        let start_index = self
            .windows
            .partition_point(|window| window.window_start < span_start);
        let end_index = self
            .windows
            .partition_point(|window| window.window_start < span_end);
        self.windows.drain(start_index..end_index).count()
    }

    /// Replaces the provisional windows, skipping any already finalized.
    pub fn set_provisional(&mut self, windows: &[TimeWindow]) {
        self.provisional = windows
            .iter()
            .filter(|window| {
                self.windows
                    .binary_search_by_key(&window.window_start, |w| w.window_start)
                    .is_err()
            })
            .copied()
            .collect();
    }

    /// Local x of a window starting at `window_start`.
    #[must_use]
    pub fn local_x(&self, window_start: i64, bar_interval: f64) -> f64 {
        (window_start - self.start) as f64 / self.window_length_ms as f64 * bar_interval
    }

    /// Rebuilds every bar at unit (most zoomed-out) scale.
    pub fn render_geometry(&mut self, geometry: &BarGeometry) {
        let finalized = self
            .windows
            .iter()
            .map(|window| self.bar_rect(window, geometry, None));
        let provisional = self.provisional.iter().map(|window| {
            let x = self.local_x(window.window_start, geometry.bar_interval);
            let observed = window.blur_start.map_or(0.0, |blur_start| {
                (blur_start - window.window_start) as f64 / window.length_ms() as f64
            });
            let blur_from = x + geometry.bar_width * observed.clamp(0.0, 1.0);
            self.bar_rect(window, geometry, Some(blur_from))
        });
        let rects = finalized.chain(provisional).collect();
        self.container.set_rects(rects);
    }

    fn bar_rect(
        &self,
        window: &TimeWindow,
        geometry: &BarGeometry,
        blur_from: Option<f64>,
    ) -> BarRect {
        let height = window.height.clamp(0.0, geometry.bar_max_height);
        BarRect {
            window_start: window.window_start,
            x: self.local_x(window.window_start, geometry.bar_interval),
            y: geometry.bar_max_height - height,
            width: geometry.bar_width,
            height,
            fill: geometry.fill,
            blur_from,
        }
    }
}
