//! Domain-level structures shared across the segmentation pipeline.
//!
//! Regions are produced by the pipeline; text tokens come from an external
//! text-detection service; links join the two.

pub mod link;
pub mod region;
pub mod token;

pub use link::{Connection, Link};
pub use region::{ComponentType, Region, RegionShape};
pub use token::{TextDetection, TextDetectionResponse, TextToken, TokenBox, measurement_tokens};
