//! # Furniture Parts
//!
//! A Rust library that finds furniture components in photographs and links
//! measurement text to them. Given an image and the text tokens an OCR service
//! found in it, it returns labelled part regions (legs, table tops, drawers,
//! panels) and the measurements that belong to each part.
//!
//! ## Features
//!
//! - Classical image processing, no models to download
//! - Edge-preserving smoothing, adaptive thresholding and morphology
//! - Contour-based region extraction with geometric filters
//! - Deterministic rule-based part classification
//! - Containment-based suppression of nested regions
//! - Nearest-region linking of measurement tokens
//! - Batch processing support
//!
//! ## Components
//!
//! - **Preprocessing**: Turn a photo into a binary edge mask
//! - **Region Extraction**: Trace contours and keep plausible part outlines
//! - **Classification**: Label each region with a component type
//! - **Overlap Suppression**: Drop duplicate and nested regions
//! - **Spatial Linking**: Attach each measurement to the nearest part
//!
//! ## Modules
//!
//! * [`core`] - Error handling, constants, configuration validation and collaborator traits
//! * [`domain`] - Regions, text tokens and links
//! * [`pipeline`] - The composite segment-and-link pipeline
//! * [`processors`] - The individual processing stages and geometry
//! * [`utils`] - Image loading and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use furniture_parts::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = SegmentationPipeline::new(PipelineConfig::default())?;
//!
//! let tokens = vec![TextToken::new(
//!     "36 in",
//!     0.97,
//!     TokenBox::new(410.0, 40.0, 52.0, 18.0),
//! )];
//! let image = load_image(Path::new("dresser.jpg"))?;
//! let result = pipeline.segment_and_link_image(&image, &tokens)?;
//!
//! for link in &result.links {
//!     println!("{} -> {} ({:.2}px)", link.token_text, link.region_type, link.distance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust
//! use furniture_parts::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::from_json_str(r#"
//! {
//!   "preprocess": { "threshold_block_size": 15 },
//!   "linking": { "max_distance": 300.0 }
//! }
//! "#)?;
//! assert_eq!(config.extraction.min_side, 15);
//!
//! let pipeline = SegmentationPipeline::new(config)?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;

pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use furniture_parts::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - The composite pipeline (`SegmentationPipeline`, `PipelineConfig`)
/// - Results (`SegmentationResult`, `PipelineResponse`, `Region`, `Link`)
/// - Inputs (`TextToken`, `TokenBox`, `TextDetector`)
/// - Essential error and result types (`PartsError`, `PartsResult`)
/// - Basic image loading (`load_image`)
///
/// For individual stages and geometry, import directly from
/// `furniture_parts::processors`.
pub mod prelude {
    // Pipeline (essential)
    pub use crate::pipeline::{
        PipelineConfig, PipelineResponse, SegmentationPipeline, SegmentationResult, respond,
    };

    // Domain types
    pub use crate::domain::{ComponentType, Link, Region, TextToken, TokenBox};

    // Collaborators
    pub use crate::core::traits::{NoTextDetector, StaticTextDetector, TextDetector};

    // Error Handling (essential)
    pub use crate::core::{PartsError, PartsResult};

    // Image Utility (minimal)
    pub use crate::utils::{decode_image, load_image};
}
