//! Run Monitoring Module
//!
//! Tracks what happened during a release run.
//!
//! # Components
//!
//! - [`ExecutionTimeline`]: skipped, started and finished steps with timings

pub mod timeline;

pub use timeline::{EventType, ExecutionTimeline, TimelineEvent};
