use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{TimelineError, TimelineResult};

/// Nominal seconds per bar, finest first.
///
/// The year entry is 365 days; leap years are not accounted for.
pub const DEFAULT_ZOOM_LEVEL_SECONDS: [u64; 5] = [
    1,
    60,
    60 * 60,
    60 * 60 * 24,
    60 * 60 * 24 * 365,
];

/// Index into a [`ZoomLevelTable`], ordered by increasing window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoomLevel(usize);

impl ZoomLevel {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Ordered table of nominal window lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomLevelTable {
    seconds: SmallVec<[u64; 8]>,
}

impl Default for ZoomLevelTable {
    fn default() -> Self {
        Self {
            seconds: SmallVec::from_slice(&DEFAULT_ZOOM_LEVEL_SECONDS),
        }
    }
}

impl ZoomLevelTable {
    pub fn new(seconds: &[u64]) -> TimelineResult<Self> {
        if seconds.is_empty() {
            return Err(TimelineError::InvalidData(
                "zoom level table must not be empty".to_owned(),
            ));
        }
        if seconds.contains(&0) {
            return Err(TimelineError::InvalidData(
                "zoom level lengths must be > 0".to_owned(),
            ));
        }
        if seconds.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(TimelineError::InvalidData(
                "zoom level lengths must be strictly increasing".to_owned(),
            ));
        }
        Ok(Self {
            seconds: SmallVec::from_slice(seconds),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }

    pub fn levels(&self) -> impl Iterator<Item = ZoomLevel> + '_ {
        (0..self.seconds.len()).map(ZoomLevel)
    }

    #[must_use]
    pub fn level(&self, index: usize) -> Option<ZoomLevel> {
        (index < self.seconds.len()).then_some(ZoomLevel(index))
    }

    #[must_use]
    pub fn seconds(&self, level: ZoomLevel) -> Option<u64> {
        self.seconds.get(level.0).copied()
    }

    #[must_use]
    pub fn window_length_ms(&self, level: ZoomLevel) -> Option<i64> {
        self.seconds(level).map(|seconds| seconds as i64 * 1000)
    }

    /// Picks the smallest level whose nominal length covers `length_ms`.
    pub fn classify(&self, length_ms: i64) -> TimelineResult<ZoomLevel> {
        if length_ms <= 0 {
            return Err(TimelineError::InvalidWindowLength { length_ms });
        }
        self.seconds
            .iter()
            .position(|&seconds| seconds as i64 * 1000 >= length_ms)
            .map(ZoomLevel)
            .ok_or(TimelineError::InvalidWindowLength { length_ms })
    }
}
