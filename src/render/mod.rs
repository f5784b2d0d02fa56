mod container;
mod frame;
mod null_renderer;
mod primitives;
mod svg_renderer;

pub use container::{GroupContainer, GroupTransform, Visibility};
pub use frame::{GroupFrame, TimelineFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{BarRect, Color};
pub use svg_renderer::SvgRenderer;

use crate::error::TimelineResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `TimelineFrame`, so drawing code
/// stays isolated from group bookkeeping and zoom composition.
pub trait Renderer {
    fn render(&mut self, frame: &TimelineFrame) -> TimelineResult<()>;
}
