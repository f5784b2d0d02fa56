use crate::error::TimelineResult;
use crate::render::{Renderer, TimelineFrame};

/// Renderer that only validates and counts, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_group_count: usize,
    pub last_visible_group_count: usize,
    pub last_bar_count: usize,
    /// Provisional bars with a blurred part.
    pub last_blurred_bar_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &TimelineFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.last_group_count = frame.groups.len();
        self.last_visible_group_count = frame.visible_group_count();
        self.last_bar_count = frame.bar_count();
        self.last_blurred_bar_count = frame
            .groups
            .iter()
            .flat_map(|group| group.container.rects())
            .filter(|rect| rect.is_blurred())
            .count();
        Ok(())
    }
}
