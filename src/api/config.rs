use serde::{Deserialize, Serialize};

use crate::core::{BarGeometry, DEFAULT_ZOOM_LEVEL_SECONDS, ZoomLevelTable};
use crate::error::{TimelineError, TimelineResult};
use crate::render::Color;

/// `1900-01-01T00:00:00Z` in epoch milliseconds.
pub const DEFAULT_EPOCH_ORIGIN_MS: i64 = -2_208_988_800_000;

/// Intent is five pixels per smallest zoom level window at full zoom.
pub const DEFAULT_MAX_SCALE_FACTOR: f64 = 16.0 * 65536.0 * 29.0;

/// Timeline bootstrap configuration.
///
/// Serializable so hosts can persist/load timeline setup. Values are fixed
/// for the lifetime of a coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_bar_max_height")]
    pub bar_max_height: f64,
    #[serde(default = "default_bar_interval")]
    pub bar_interval: f64,
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    #[serde(default = "default_min_bar_spacing")]
    pub min_bar_spacing: f64,
    #[serde(default = "default_zoom_level_seconds")]
    pub zoom_level_seconds: Vec<u64>,
    #[serde(default = "default_max_scale_factor")]
    pub max_scale_factor: f64,
    #[serde(default = "default_timeline_height")]
    pub timeline_height: f64,
    #[serde(default = "default_epoch_origin_ms")]
    pub epoch_origin_ms: i64,
    #[serde(default = "default_initial_zoom_divisor")]
    pub initial_zoom_divisor: f64,
    #[serde(default = "default_initial_zoom_duration_ms")]
    pub initial_zoom_duration_ms: f64,
    #[serde(default = "default_bar_fill")]
    pub bar_fill: String,
    #[serde(default = "default_blur_std_deviation")]
    pub blur_std_deviation: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            bar_max_height: default_bar_max_height(),
            bar_interval: default_bar_interval(),
            bar_width: default_bar_width(),
            min_bar_spacing: default_min_bar_spacing(),
            zoom_level_seconds: default_zoom_level_seconds(),
            max_scale_factor: default_max_scale_factor(),
            timeline_height: default_timeline_height(),
            epoch_origin_ms: default_epoch_origin_ms(),
            initial_zoom_divisor: default_initial_zoom_divisor(),
            initial_zoom_duration_ms: default_initial_zoom_duration_ms(),
            bar_fill: default_bar_fill(),
            blur_std_deviation: default_blur_std_deviation(),
        }
    }
}

impl TimelineConfig {
    /// Sets the zoom level table, in seconds per bar.
    #[must_use]
    pub fn with_zoom_level_seconds(mut self, seconds: Vec<u64>) -> Self {
        self.zoom_level_seconds = seconds;
        self
    }

    /// Sets the minimum legible pixel spacing between bars.
    #[must_use]
    pub fn with_min_bar_spacing(mut self, spacing: f64) -> Self {
        self.min_bar_spacing = spacing;
        self
    }

    /// Sets the scale domain origin.
    #[must_use]
    pub fn with_epoch_origin_ms(mut self, origin_ms: i64) -> Self {
        self.epoch_origin_ms = origin_ms;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        for (name, value) in [
            ("bar_max_height", self.bar_max_height),
            ("bar_interval", self.bar_interval),
            ("bar_width", self.bar_width),
            ("min_bar_spacing", self.min_bar_spacing),
            ("timeline_height", self.timeline_height),
            ("initial_zoom_divisor", self.initial_zoom_divisor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        if !self.max_scale_factor.is_finite() || self.max_scale_factor < 1.0 {
            return Err(TimelineError::InvalidData(
                "`max_scale_factor` must be finite and >= 1".to_owned(),
            ));
        }
        if !self.initial_zoom_duration_ms.is_finite() || self.initial_zoom_duration_ms < 0.0 {
            return Err(TimelineError::InvalidData(
                "`initial_zoom_duration_ms` must be finite and >= 0".to_owned(),
            ));
        }
        if !self.blur_std_deviation.is_finite() || self.blur_std_deviation < 0.0 {
            return Err(TimelineError::InvalidData(
                "`blur_std_deviation` must be finite and >= 0".to_owned(),
            ));
        }
        self.zoom_levels()?;
        Color::from_hex(&self.bar_fill)?;
        Ok(())
    }

    pub fn zoom_levels(&self) -> TimelineResult<ZoomLevelTable> {
        ZoomLevelTable::new(&self.zoom_level_seconds)
    }

    pub fn bar_geometry(&self) -> TimelineResult<BarGeometry> {
        Ok(BarGeometry {
            bar_interval: self.bar_interval,
            bar_width: self.bar_width,
            bar_max_height: self.bar_max_height,
            fill: Color::from_hex(&self.bar_fill)?,
        })
    }

    /// Scale factor the initial animated zoom settles on.
    #[must_use]
    pub fn initial_zoom_scale(&self) -> f64 {
        (self.max_scale_factor / self.initial_zoom_divisor).clamp(1.0, self.max_scale_factor)
    }

    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize timeline config: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse timeline config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn default_bar_max_height() -> f64 {
    10.0
}

fn default_bar_interval() -> f64 {
    5.0
}

fn default_bar_width() -> f64 {
    3.0
}

fn default_min_bar_spacing() -> f64 {
    5.0
}

fn default_zoom_level_seconds() -> Vec<u64> {
    DEFAULT_ZOOM_LEVEL_SECONDS.to_vec()
}

fn default_max_scale_factor() -> f64 {
    DEFAULT_MAX_SCALE_FACTOR
}

fn default_timeline_height() -> f64 {
    10.0
}

fn default_epoch_origin_ms() -> i64 {
    DEFAULT_EPOCH_ORIGIN_MS
}

fn default_initial_zoom_divisor() -> f64 {
    60.0
}

fn default_initial_zoom_duration_ms() -> f64 {
    750.0
}

fn default_bar_fill() -> String {
    "#1db855".to_owned()
}

fn default_blur_std_deviation() -> f64 {
    2.0
}
