use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ZoomTransform;

use super::GroupRegistry;

/// Opaque identifier of one timeline view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(String);

impl ChartId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ChartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One timeline view: its groups and the transform last applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    id: ChartId,
    pub(super) registry: GroupRegistry,
    pub(super) transform: ZoomTransform,
}

impl ChartInstance {
    pub(super) fn new(id: ChartId, level_count: usize, transform: ZoomTransform) -> Self {
        Self {
            id,
            registry: GroupRegistry::new(level_count),
            transform,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ChartId {
        &self.id
    }

    #[must_use]
    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }
}
