use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::ZoomLevel;

/// Emitted after every zoom/pan recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomedEvent {
    pub domain_start_ms: f64,
    pub domain_end_ms: f64,
    pub visible_level: Option<ZoomLevel>,
}

impl ZoomedEvent {
    #[must_use]
    pub fn domain_start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.domain_start_ms.floor() as i64)
    }

    #[must_use]
    pub fn domain_end(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.domain_end_ms.ceil() as i64)
    }
}

/// Observer of the visible interval, typically a fetch scheduler.
pub trait ZoomListener {
    fn on_zoomed(&mut self, event: &ZoomedEvent);
}

impl<F> ZoomListener for F
where
    F: FnMut(&ZoomedEvent),
{
    fn on_zoomed(&mut self, event: &ZoomedEvent) {
        self(event);
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Default)]
pub(super) struct ListenerSet {
    next_id: u64,
    entries: IndexMap<ListenerId, Box<dyn ZoomListener>>,
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("next_id", &self.next_id)
            .field("len", &self.entries.len())
            .finish()
    }
}

impl ListenerSet {
    pub(super) fn subscribe(&mut self, listener: Box<dyn ZoomListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, listener);
        id
    }

    pub(super) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.entries.shift_remove(&id).is_some()
    }

    pub(super) fn notify(&mut self, event: &ZoomedEvent) {
        for listener in self.entries.values_mut() {
            listener.on_zoomed(event);
        }
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }
}
