//! timeline-rs: headless multi-resolution timeline engine.
//!
//! A timeline spanning decades cannot be drawn as one piece at pixel
//! precision: absolute coordinates grow into ~9 digits and transforms start
//! to lose precision. The engine therefore keeps bars in many
//! [`core::RenderGroup`]s, each with a small local coordinate space, and a
//! single [`api::ZoomPanCoordinator`] re-expresses the visible groups into
//! screen pixels with one translate+scale per group.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartId, TimelineConfig, ZoomPanCoordinator};
pub use error::{TimelineError, TimelineResult};
