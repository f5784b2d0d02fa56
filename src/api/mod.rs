//! Public orchestration layer: configuration, chart instances, group
//! registries and the shared zoom/pan coordinator.

mod axis;
mod chart;
mod config;
mod coordinator;
mod listener;
mod registry;

pub use axis::{AXIS_TICK_SPACING_PX, AxisTick, time_axis_ticks};
pub use chart::{ChartId, ChartInstance};
pub use config::{DEFAULT_EPOCH_ORIGIN_MS, DEFAULT_MAX_SCALE_FACTOR, TimelineConfig};
pub use coordinator::{AddBarsOutcome, ZoomOutcome, ZoomPanCoordinator};
pub use listener::{ListenerId, ZoomListener, ZoomedEvent};
pub use registry::GroupRegistry;
