use crate::core::ZoomLevel;
use crate::error::{TimelineError, TimelineResult};

use super::GroupContainer;

/// Snapshot of one group's container for a draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFrame {
    pub level: ZoomLevel,
    pub start: i64,
    pub end: i64,
    pub container: GroupContainer,
}

/// Backend-agnostic scene for one chart instance.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineFrame {
    pub chart_id: String,
    pub width: f64,
    pub height: f64,
    pub blur_std_deviation: f64,
    pub groups: Vec<GroupFrame>,
}

impl TimelineFrame {
    pub fn validate(&self) -> TimelineResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(TimelineError::InvalidWidth { width: self.width });
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(TimelineError::InvalidData(
                "timeline height must be finite and > 0".to_owned(),
            ));
        }
        for group in &self.groups {
            if let Some(transform) = group.container.transform() {
                if !transform.translate_x.is_finite() || !transform.scale_x.is_finite() {
                    return Err(TimelineError::InvalidData(format!(
                        "group at {} has a non-finite transform",
                        group.start
                    )));
                }
            }
            for rect in group.container.rects() {
                rect.validate()?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn visible_group_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|group| group.container.is_visible())
            .count()
    }

    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| group.container.rects().len())
            .sum()
    }
}
