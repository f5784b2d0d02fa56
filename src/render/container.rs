use std::fmt;

use super::BarRect;

/// Visibility attribute of a group container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => f.write_str("visible"),
            Self::Hidden => f.write_str("hidden"),
        }
    }
}

/// Maps a group's local units onto screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTransform {
    pub translate_x: f64,
    pub scale_x: f64,
}

impl GroupTransform {
    #[must_use]
    pub fn apply(self, local_x: f64) -> f64 {
        self.translate_x + local_x * self.scale_x
    }
}

impl fmt::Display for GroupTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({}, 0) scale({}, 1)",
            self.translate_x, self.scale_x
        )
    }
}

/// Visual container owned by one render group.
///
/// New containers are hidden until the coordinator positions them.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupContainer {
    visibility: Visibility,
    transform: Option<GroupTransform>,
    rects: Vec<BarRect>,
}

impl Default for GroupContainer {
    fn default() -> Self {
        Self {
            visibility: Visibility::Hidden,
            transform: None,
            rects: Vec::new(),
        }
    }
}

impl GroupContainer {
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Last applied transform. Kept while hidden, like an SVG attribute.
    #[must_use]
    pub fn transform(&self) -> Option<GroupTransform> {
        self.transform
    }

    #[must_use]
    pub fn rects(&self) -> &[BarRect] {
        &self.rects
    }

    pub fn hide(&mut self) {
        self.visibility = Visibility::Hidden;
    }

    pub fn show(&mut self, transform: GroupTransform) {
        self.visibility = Visibility::Visible;
        self.transform = Some(transform);
    }

    pub fn set_rects(&mut self, rects: Vec<BarRect>) {
        self.rects = rects;
    }
}
