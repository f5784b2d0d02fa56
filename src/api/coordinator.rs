use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::time_window::validate_batch;
use crate::core::{
    BarGeometry, RenderGroup, TimeScale, TimeWindow, ZoomLevel, ZoomLevelTable, ZoomTransform,
};
use crate::error::{TimelineError, TimelineResult};
use crate::interaction::ZoomTransition;
use crate::render::{GroupFrame, GroupTransform, TimelineFrame};

use super::axis::{AxisTick, time_axis_ticks};
use super::listener::ListenerSet;
use super::{ChartId, ChartInstance, ListenerId, TimelineConfig, ZoomListener, ZoomedEvent};

/// Result of one `add_bars` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddBarsOutcome {
    pub level: ZoomLevel,
    pub group_start: i64,
    pub group_end: i64,
    pub retained_windows: usize,
}

/// Result of one zoom/pan recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomOutcome {
    pub transform: ZoomTransform,
    pub domain: (f64, f64),
    pub visible_level: Option<ZoomLevel>,
    /// Charts that received the transform from another chart's gesture.
    pub broadcast: Vec<ChartId>,
}

/// Owns the shared time scale and zoom transform for every chart instance.
///
/// All charts are driven in lockstep: a gesture on one chart recomputes
/// level visibility and group placement for all of them. Construct one per
/// page or process and pass it by reference; `teardown` releases every
/// chart and listener.
#[derive(Debug)]
pub struct ZoomPanCoordinator {
    config: TimelineConfig,
    levels: ZoomLevelTable,
    geometry: BarGeometry,
    base_scale: TimeScale,
    transform: ZoomTransform,
    charts: IndexMap<ChartId, ChartInstance>,
    listeners: ListenerSet,
    transition: Option<ZoomTransition>,
    initial_zoom_started: bool,
}

impl ZoomPanCoordinator {
    /// Builds the base scale `[epoch origin, now] -> [0, 1]`.
    ///
    /// The range is replaced by the first `resize`.
    pub fn new(config: TimelineConfig, now: DateTime<Utc>) -> TimelineResult<Self> {
        config.validate()?;
        let levels = config.zoom_levels()?;
        let geometry = config.bar_geometry()?;
        let base_scale = TimeScale::new(
            config.epoch_origin_ms as f64,
            now.timestamp_millis() as f64,
            0.0,
            1.0,
        )?;
        Ok(Self {
            config,
            levels,
            geometry,
            base_scale,
            transform: ZoomTransform::IDENTITY,
            charts: IndexMap::new(),
            listeners: ListenerSet::default(),
            transition: None,
            initial_zoom_started: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    #[must_use]
    pub fn levels(&self) -> &ZoomLevelTable {
        &self.levels
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn base_scale(&self) -> TimeScale {
        self.base_scale
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.base_scale.range_width()
    }

    /// Base scale narrowed by the current transform.
    pub fn rescaled(&self) -> TimelineResult<TimeScale> {
        self.transform.rescale(self.base_scale)
    }

    pub fn register_chart(&mut self, id: ChartId) -> TimelineResult<()> {
        if self.charts.contains_key(&id) {
            return Err(TimelineError::DuplicateChart(id));
        }
        debug!(chart = %id, "register chart");
        let chart = ChartInstance::new(id.clone(), self.levels.len(), self.transform);
        self.charts.insert(id, chart);
        Ok(())
    }

    /// Removes a chart and destroys its groups.
    pub fn unregister_chart(&mut self, id: &ChartId) -> TimelineResult<ChartInstance> {
        debug!(chart = %id, "unregister chart");
        self.charts
            .shift_remove(id)
            .ok_or_else(|| TimelineError::UnknownChart(id.clone()))
    }

    #[must_use]
    pub fn chart(&self, id: &ChartId) -> Option<&ChartInstance> {
        self.charts.get(id)
    }

    pub fn chart_ids(&self) -> impl Iterator<Item = &ChartId> {
        self.charts.keys()
    }

    #[must_use]
    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    /// Releases every chart, listener and pending transition.
    pub fn teardown(&mut self) {
        debug!(charts = self.charts.len(), "teardown timeline coordinator");
        self.charts.clear();
        self.listeners.clear();
        self.transition = None;
    }

    pub fn subscribe(&mut self, listener: Box<dyn ZoomListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Owning group at `level` for `time`, if any.
    pub fn lookup_group(
        &self,
        chart: &ChartId,
        level: ZoomLevel,
        time: i64,
    ) -> TimelineResult<Option<&RenderGroup>> {
        let chart = self.chart_ref(chart)?;
        Ok(chart.registry.lookup(level, time))
    }

    /// Merges a batch into the owning group and redraws its bars.
    ///
    /// The zoom level comes from the first window's length. `provisional`
    /// windows are drawn blurred until a later batch finalizes them. Groups
    /// are not repositioned here; call `force_zoom_event` or wait for the
    /// next gesture.
    pub fn add_bars(
        &mut self,
        chart: &ChartId,
        windows: &[TimeWindow],
        provisional: &[TimeWindow],
    ) -> TimelineResult<AddBarsOutcome> {
        validate_batch(windows)?;
        for window in provisional {
            window.validate()?;
        }

        let first = windows[0];
        let level = self.levels.classify(first.length_ms())?;
        let window_length_ms = self
            .levels
            .window_length_ms(level)
            .ok_or(TimelineError::InvalidWindowLength {
                length_ms: first.length_ms(),
            })?;

        let last_end = windows
            .iter()
            .chain(provisional)
            .map(|window| window.window_end)
            .max()
            .unwrap_or(first.window_end);

        let geometry = self.geometry;
        let chart_instance = self
            .charts
            .get_mut(chart)
            .ok_or_else(|| TimelineError::UnknownChart(chart.clone()))?;
        let span = (first.window_start, windows[windows.len() - 1].window_end);
        let group = chart_instance
            .registry
            .claim_span(level, window_length_ms, span, &geometry);
        group.extend(last_end);
        group.merge_windows(windows);
        if !provisional.is_empty() {
            group.set_provisional(provisional);
        }
        group.render_geometry(&geometry);

        debug!(
            chart = %chart,
            level = level.index(),
            group_start = group.start(),
            group_end = group.end(),
            batch_start = first.window_start,
            batch_end = last_end,
            count = windows.len(),
            provisional = provisional.len(),
            "add bars"
        );

        Ok(AddBarsOutcome {
            level,
            group_start: group.start(),
            group_end: group.end(),
            retained_windows: group.windows().len(),
        })
    }

    /// First level whose bars are at least `min_bar_spacing` pixels apart.
    #[must_use]
    pub fn visible_level(&self, scale: TimeScale) -> Option<ZoomLevel> {
        let pixels_per_ms = scale.pixels_per_ms().abs();
        self.levels.levels().find(|&level| {
            let Some(length_ms) = self.levels.window_length_ms(level) else {
                return false;
            };
            let spacing = pixels_per_ms * length_ms as f64;
            trace!(level = level.index(), spacing, "level bar spacing");
            spacing >= self.config.min_bar_spacing
        })
    }

    /// Applies a gesture that originated on `source`.
    ///
    /// Interrupts the initial zoom animation if one is running.
    pub fn zoom(
        &mut self,
        source: &ChartId,
        transform: ZoomTransform,
    ) -> TimelineResult<ZoomOutcome> {
        self.chart_ref(source)?;
        self.transition = None;
        self.apply_transform(Some(source), transform)
    }

    /// Zooms by `factor` about the screen pixel `pointer_x`.
    pub fn wheel_zoom(
        &mut self,
        source: &ChartId,
        factor: f64,
        pointer_x: f64,
    ) -> TimelineResult<ZoomOutcome> {
        if !factor.is_finite() || factor <= 0.0 || !pointer_x.is_finite() {
            return Err(TimelineError::InvalidData(
                "wheel zoom factor must be finite and > 0 with a finite pointer".to_owned(),
            ));
        }
        let k = (self.transform.k * factor).clamp(1.0, self.config.max_scale_factor);
        let transform = self.transform.scale_about(k, pointer_x);
        self.zoom(source, transform)
    }

    /// Pans by `dx` screen pixels.
    pub fn pan(&mut self, source: &ChartId, dx: f64) -> TimelineResult<ZoomOutcome> {
        if !dx.is_finite() {
            return Err(TimelineError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }
        let transform = ZoomTransform {
            k: self.transform.k,
            x: self.transform.x + dx,
        };
        self.zoom(source, transform)
    }

    /// Re-applies the current transform to every chart.
    pub fn force_zoom_event(&mut self) -> TimelineResult<ZoomOutcome> {
        self.apply_transform(None, self.transform)
    }

    /// Moves the end of the base scale domain to `now`.
    pub fn update_domain(&mut self, now: DateTime<Utc>) -> TimelineResult<()> {
        let (start, _) = self.base_scale.domain();
        self.base_scale = self
            .base_scale
            .with_domain(start, now.timestamp_millis() as f64)?;
        Ok(())
    }

    /// Resizes every timeline to `width` pixels, keeping the visible
    /// time interval unchanged.
    ///
    /// The first resize also starts the initial zoom-in animation anchored
    /// at the right edge.
    pub fn resize(&mut self, width: f64) -> TimelineResult<ZoomOutcome> {
        if !width.is_finite() || width <= 0.0 {
            return Err(TimelineError::InvalidWidth { width });
        }
        let previous = self.transform;
        let previous_width = self.base_scale.range_width();
        let resized = ZoomTransform {
            k: previous.k,
            x: previous.x * width / previous_width,
        };
        self.base_scale = self.base_scale.with_range(0.0, width)?;
        debug!(previous_width, width, k = resized.k, x = resized.x, "resize timelines");

        let outcome = self.apply_transform(None, resized)?;

        // A running animation keeps its target but re-anchors to the new
        // right edge for the time it has left.
        if let Some(running) = self.transition.take() {
            self.transition = Some(ZoomTransition::new(
                self.transform,
                running.target_k(),
                width,
                running.remaining_ms(),
            )?);
        } else if !self.initial_zoom_started {
            self.initial_zoom_started = true;
            self.transition = Some(ZoomTransition::new(
                self.transform,
                self.config.initial_zoom_scale(),
                width,
                self.config.initial_zoom_duration_ms,
            )?);
        }
        Ok(outcome)
    }

    /// Resize driven by a host observation that may lack a content-box width.
    pub fn resize_from_observation(
        &mut self,
        content_box_width: Option<f64>,
    ) -> TimelineResult<ZoomOutcome> {
        let width = content_box_width.ok_or_else(|| {
            TimelineError::EnvironmentUnsupported(
                "resize observation without content-box size".to_owned(),
            )
        })?;
        self.resize(width)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Advances the initial zoom animation by `delta_ms`.
    ///
    /// Returns `None` when no animation is running.
    pub fn tick(&mut self, delta_ms: f64) -> TimelineResult<Option<ZoomOutcome>> {
        let Some(transition) = self.transition.as_mut() else {
            return Ok(None);
        };
        let transform = transition.step(delta_ms);
        if transition.is_finished() {
            self.transition = None;
        }
        self.apply_transform(None, transform).map(Some)
    }

    /// Materializes the current container state of `chart`.
    pub fn frame(&self, chart: &ChartId) -> TimelineResult<TimelineFrame> {
        let chart = self.chart_ref(chart)?;
        let groups = chart
            .registry
            .iter()
            .map(|group| GroupFrame {
                level: group.level(),
                start: group.start(),
                end: group.end(),
                container: group.container().clone(),
            })
            .collect();
        Ok(TimelineFrame {
            chart_id: chart.id().to_string(),
            width: self.width(),
            height: self.config.timeline_height,
            blur_std_deviation: self.config.blur_std_deviation,
            groups,
        })
    }

    /// Ticks for the axis above the timelines.
    pub fn time_axis_ticks(&self) -> TimelineResult<Vec<AxisTick>> {
        Ok(time_axis_ticks(self.rescaled()?))
    }

    fn chart_ref(&self, id: &ChartId) -> TimelineResult<&ChartInstance> {
        self.charts
            .get(id)
            .ok_or_else(|| TimelineError::UnknownChart(id.clone()))
    }

    fn constrain(&self, transform: ZoomTransform) -> ZoomTransform {
        let width = self.base_scale.range_width();
        transform
            .clamp_scale(1.0, self.config.max_scale_factor)
            .constrain((0.0, width), (0.0, width))
    }

    fn apply_transform(
        &mut self,
        source: Option<&ChartId>,
        transform: ZoomTransform,
    ) -> TimelineResult<ZoomOutcome> {
        transform.validate()?;
        let transform = self.constrain(transform);
        self.transform = transform;

        let scale = transform.rescale(self.base_scale)?;
        let visible_level = self.visible_level(scale);
        let bar_interval = self.geometry.bar_interval;

        let mut broadcast = Vec::new();
        for (id, chart) in &mut self.charts {
            if source != Some(id) && chart.transform != transform {
                broadcast.push(id.clone());
            }
            chart.transform = transform;
            for group in chart.registry.iter_mut() {
                position_group(group, scale, visible_level, bar_interval);
            }
        }

        let domain = scale.domain();
        trace!(
            k = transform.k,
            x = transform.x,
            domain_start = domain.0,
            domain_end = domain.1,
            visible_level = ?visible_level.map(ZoomLevel::index),
            "zoom timelines"
        );

        self.listeners.notify(&ZoomedEvent {
            domain_start_ms: domain.0,
            domain_end_ms: domain.1,
            visible_level,
        });

        Ok(ZoomOutcome {
            transform,
            domain,
            visible_level,
            broadcast,
        })
    }
}

/// Hides `group` or maps its local units onto the screen pixels of `scale`.
fn position_group(
    group: &mut RenderGroup,
    scale: TimeScale,
    visible_level: Option<ZoomLevel>,
    bar_interval: f64,
) {
    if visible_level != Some(group.level())
        || !scale.intersects(group.start() as f64, group.end() as f64)
    {
        group.container_mut().hide();
        return;
    }

    let x = scale.map(group.start() as f64);
    let window_length_ms = group.window_length_ms() as f64;
    let span_ms = group.end() - group.start();
    let scale_x = if span_ms > 0 {
        let x2 = scale.map(group.end() as f64);
        (x2 - x) * window_length_ms / span_ms as f64 / bar_interval
    } else {
        scale.pixels_per_ms() * window_length_ms / bar_interval
    };
    let transform = GroupTransform {
        translate_x: x,
        scale_x,
    };
    trace!(
        level = group.level().index(),
        start = group.start(),
        end = group.end(),
        transform = %transform,
        "position visible group"
    );
    group.container_mut().show(transform);
}
