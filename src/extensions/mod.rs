//! Collaborator-side helpers around the core engine.
//!
//! Fetch errors are absorbed here and never reach the coordinator, which
//! only ever sees well-formed batches.

pub mod fetch;
pub mod synthetic;

pub use fetch::{
    FetchResolution, FetchTicket, FetchTracker, TimelineQuery, TimelineTile, TimelineTileRecord,
    parse_timeline_response,
};
pub use synthetic::{PLACEHOLDER_INTENSITY, SyntheticBars, sawtooth_hertz};
