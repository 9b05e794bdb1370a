//! The core module of the segmentation pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Configuration validation
//! - Constants used throughout the pipeline
//! - Error handling
//! - Traits for injected collaborators
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;

pub use crate::utils::{decode_image, load_image, load_image_bytes};
pub use config::{ConfigError, ConfigValidator};
pub use constants::*;
pub use errors::{ErrorKind, PartsError, PartsResult, ProcessingStage};
pub use traits::{NoTextDetector, PipelineObserver, StaticTextDetector, TextDetector};
