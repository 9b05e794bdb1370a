//! Segment and Link Example
//!
//! This example runs the furniture segmentation pipeline on one or more images
//! and prints one JSON response per image. Measurement tokens come from a JSON
//! file in the text-detection service format.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example segment_and_link -- [OPTIONS] <IMAGES>...
//! ```
//!
//! # Arguments
//!
//! * `-t, --tokens` - JSON text-detection response to link against
//! * `-c, --config` - JSON pipeline configuration
//! * `--max-distance` - Override the maximum link distance in pixels
//! * `-v, --verbose` - Print per-image statistics
//! * `<IMAGES>...` - Paths to input images to process
//!
//! # Example
//!
//! ```bash
//! cargo run --example segment_and_link -- -t tokens.json dresser.jpg table.png
//! ```

use clap::Parser;
use furniture_parts::core::traits::{NoTextDetector, StaticTextDetector, TextDetector};
use furniture_parts::pipeline::{PipelineConfig, PipelineResponse, SegmentationPipeline, respond};
use furniture_parts::utils::load_image_bytes;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Command-line arguments for the segment and link example
#[derive(Parser)]
#[command(name = "segment_and_link")]
#[command(about = "Segment and Link Example - finds furniture parts and links measurements")]
struct Args {
    /// Paths to input images to process
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON text-detection response (`{fullText, details, totalWords}` or `{error}`)
    #[arg(short, long)]
    tokens: Option<PathBuf>,

    /// JSON pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum centre-to-centre link distance in pixels
    #[arg(long)]
    max_distance: Option<f32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    furniture_parts::utils::init_tracing();

    // Parse command-line arguments
    let args = Args::parse();

    info!("Segment and Link Example");

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(max_distance) = args.max_distance {
        config.linking.max_distance = max_distance;
    }

    if args.verbose {
        info!("Pipeline Configuration:");
        info!("  Block size: {}", config.preprocess.threshold_block_size);
        info!("  Min area ratio: {}", config.extraction.min_area_ratio);
        info!("  Overlap threshold: {}", config.suppression.overlap_threshold);
        info!("  Max link distance: {}", config.linking.max_distance);
    }

    let pipeline = SegmentationPipeline::new(config)?;

    let detector: Box<dyn TextDetector> = match &args.tokens {
        Some(path) => Box::new(StaticTextDetector::from_json_file(path)?),
        None => Box::new(NoTextDetector),
    };

    let mut failures = 0usize;
    for path in &args.images {
        let start = Instant::now();
        let result = load_image_bytes(path)
            .and_then(|bytes| pipeline.segment_and_link_with_detector(&bytes, detector.as_ref()));
        let response = respond(result);

        match &response {
            PipelineResponse::Success(result) => {
                if args.verbose {
                    info!(
                        "{}: {} regions, {} links in {:.2?}",
                        path.display(),
                        result.num_regions,
                        result.links.len(),
                        start.elapsed()
                    );
                }
            }
            PipelineResponse::Error { error: message, .. } => {
                failures += 1;
                error!("{}: {}", path.display(), message);
            }
        }

        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    if failures > 0 {
        info!("{} of {} images failed", failures, args.images.len());
    }
    Ok(())
}
