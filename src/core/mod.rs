pub mod render_group;
pub mod time_scale;
pub mod time_window;
pub mod transform;
pub mod zoom_level;

pub use render_group::{BarGeometry, RenderGroup};
pub use time_scale::TimeScale;
pub use time_window::TimeWindow;
pub use transform::ZoomTransform;
pub use zoom_level::{DEFAULT_ZOOM_LEVEL_SECONDS, ZoomLevel, ZoomLevelTable};
