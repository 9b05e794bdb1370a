//! The segmentation pipeline module.
//!
//! This module combines the processing stages into the composite
//! segment-and-link operation, and provides its configuration, events and
//! response types.

mod config;
pub mod events;
mod result;
mod segmenter;

pub use config::PipelineConfig;
pub use events::{NoopObserver, PipelineEvent, RecordingObserver, TracingObserver};
pub use result::{ImageSize, PipelineResponse, SegmentationResult, respond};
pub use segmenter::SegmentationPipeline;
