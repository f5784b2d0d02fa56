use tracing::debug;

use crate::core::{BarGeometry, RenderGroup, ZoomLevel};

/// Render groups of one chart, bucketed by zoom level.
///
/// Groups are never merged, pruned or evicted; they live as long as the
/// chart instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupRegistry {
    levels: Vec<Vec<RenderGroup>>,
}

impl GroupRegistry {
    #[must_use]
    pub fn new(level_count: usize) -> Self {
        Self {
            levels: vec![Vec::new(); level_count],
        }
    }

    /// First group at `level` whose closed span contains `time`.
    #[must_use]
    pub fn lookup(&self, level: ZoomLevel, time: i64) -> Option<&RenderGroup> {
        self.groups(level).iter().find(|group| group.contains(time))
    }

    /// Returns the owning group for `time`, creating one anchored at `time` on miss.
    pub fn get_or_create(
        &mut self,
        level: ZoomLevel,
        window_length_ms: i64,
        time: i64,
    ) -> &mut RenderGroup {
        let index = self.get_or_create_index(level, window_length_ms, time);
        &mut self.levels[level.index()][index]
    }

    /// Resolves the owner of a batch spanning `[span.0, span.1)` and makes
    /// it the only group at `level` retaining windows in that span.
    ///
    /// Sibling groups whose data the batch supersedes are redrawn.
    pub(crate) fn claim_span(
        &mut self,
        level: ZoomLevel,
        window_length_ms: i64,
        span: (i64, i64),
        geometry: &BarGeometry,
    ) -> &mut RenderGroup {
        let owner = self.get_or_create_index(level, window_length_ms, span.0);
        let groups = &mut self.levels[level.index()];
        for (index, group) in groups.iter_mut().enumerate() {
            if index != owner && group.discard_span(span.0, span.1) > 0 {
                debug!(
                    level = level.index(),
                    start = group.start(),
                    "discard windows superseded by another group"
                );
                group.render_geometry(geometry);
            }
        }
        &mut groups[owner]
    }

    fn get_or_create_index(
        &mut self,
        level: ZoomLevel,
        window_length_ms: i64,
        time: i64,
    ) -> usize {
        if level.index() >= self.levels.len() {
            self.levels.resize_with(level.index() + 1, Vec::new);
        }
        let groups = &mut self.levels[level.index()];
        match groups.iter().position(|group| group.contains(time)) {
            Some(index) => index,
            None => {
                debug!(level = level.index(), start = time, "create render group");
                groups.push(RenderGroup::new(level, window_length_ms, time));
                groups.len() - 1
            }
        }
    }

    #[must_use]
    pub fn groups(&self, level: ZoomLevel) -> &[RenderGroup] {
        self.levels
            .get(level.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderGroup> {
        self.levels.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RenderGroup> {
        self.levels.iter_mut().flatten()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}
