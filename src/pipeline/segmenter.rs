//! The composite segment-and-link pipeline.
//!
//! [`SegmentationPipeline`] chains the five stages:
//!
//! ```text
//! bytes ─▶ decode ─▶ preprocess ─▶ extract ─▶ classify ─▶ suppress ─▶ link ─▶ result
//!                        mask      shapes     regions     regions    links
//! ```
//!
//! Every intermediate value is local to one call, so a single pipeline can be
//! shared across threads and used for many images at once.

use crate::core::config::ConfigValidator;
use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::{PartsError, PartsResult, ProcessingStage};
use crate::core::traits::{PipelineObserver, TextDetector};
use crate::domain::{Region, TextDetectionResponse, TextToken, measurement_tokens};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::events::{PipelineEvent, TracingObserver};
use crate::pipeline::result::{ImageSize, SegmentationResult};
use crate::processors::{
    ImagePreprocessor, OverlapSuppressor, RegionClassifier, RegionExtractor, SpatialLinker,
};
use crate::utils::decode_image;
use image::RgbImage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Finds furniture parts in an image and links measurement tokens to them.
///
/// # Examples
///
/// ```rust,no_run
/// use furniture_parts::prelude::*;
///
/// let pipeline = SegmentationPipeline::new(PipelineConfig::default())?;
/// let bytes = std::fs::read("cabinet.jpg")?;
/// let result = pipeline.segment_and_link(&bytes, &[])?;
/// println!("{} regions", result.num_regions);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SegmentationPipeline {
    config: PipelineConfig,
    preprocessor: ImagePreprocessor,
    extractor: RegionExtractor,
    classifier: RegionClassifier,
    suppressor: OverlapSuppressor,
    linker: SpatialLinker,
    observer: Arc<dyn PipelineObserver>,
}

impl Default for SegmentationPipeline {
    fn default() -> Self {
        Self::build(PipelineConfig::default())
    }
}

impl SegmentationPipeline {
    /// Creates a pipeline after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PartsError::Config`] if any stage configuration is invalid.
    pub fn new(config: PipelineConfig) -> PartsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PipelineConfig) -> Self {
        Self {
            preprocessor: ImagePreprocessor::new(config.preprocess.clone()),
            extractor: RegionExtractor::new(config.extraction.clone()),
            classifier: RegionClassifier::new(),
            suppressor: OverlapSuppressor::new(config.suppression.clone()),
            linker: SpatialLinker::new(config.linking.clone()),
            observer: Arc::new(TracingObserver),
            config,
        }
    }

    /// Replaces the event observer.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full pipeline on encoded image bytes.
    ///
    /// Only the measurement tokens (text with a digit and a bounding box) are
    /// linked; the rest of `tokens` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PartsError::ImageRead`] for missing or undecodable bytes and
    /// [`PartsError::Segmentation`] if a stage fails.
    pub fn segment_and_link(
        &self,
        image_bytes: &[u8],
        tokens: &[TextToken],
    ) -> PartsResult<SegmentationResult> {
        let image = self.decode(image_bytes)?;
        self.segment_and_link_image(&image, tokens)
    }

    /// Runs the full pipeline on an already decoded image.
    pub fn segment_and_link_image(
        &self,
        image: &RgbImage,
        tokens: &[TextToken],
    ) -> PartsResult<SegmentationResult> {
        let started = Instant::now();
        let (width, height) = image.dimensions();
        let regions = self.segment(image)?;

        let stage_started = Instant::now();
        let measurements = measurement_tokens(tokens);
        let links = self.linker.link_tokens(&measurements, &regions, None);
        self.report_stage(ProcessingStage::Linking, links.len(), stage_started.elapsed());

        debug!(
            width,
            height,
            regions = regions.len(),
            measurements = measurements.len(),
            links = links.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Segmented image and linked measurements"
        );
        Ok(SegmentationResult::new(
            regions,
            measurements,
            links,
            ImageSize { width, height },
        ))
    }

    /// Runs the pipeline with tokens obtained from `detector`.
    ///
    /// A detector error is reported as a
    /// [`PipelineEvent::TextDetectionFailed`] event and the run continues
    /// with zero tokens.
    pub fn segment_and_link_with_detector(
        &self,
        image_bytes: &[u8],
        detector: &dyn TextDetector,
    ) -> PartsResult<SegmentationResult> {
        let image = self.decode(image_bytes)?;
        let tokens = match detector.detect_text(image_bytes) {
            TextDetectionResponse::Success(detection) => detection.details,
            TextDetectionResponse::Failure { error } => {
                self.observer
                    .on_event(&PipelineEvent::TextDetectionFailed { message: error });
                Vec::new()
            }
        };
        self.segment_and_link_image(&image, &tokens)
    }

    /// Runs the pipeline on many independent images.
    ///
    /// Each input gets its own result, in input order.
    pub fn segment_and_link_batch<B>(
        &self,
        inputs: &[(B, Vec<TextToken>)],
    ) -> Vec<PartsResult<SegmentationResult>>
    where
        B: AsRef<[u8]> + Sync,
    {
        self.segment_and_link_batch_with_threshold(inputs, None)
    }

    /// Like [`Self::segment_and_link_batch`], with a custom parallel threshold.
    ///
    /// Batches larger than the threshold are processed on the rayon thread
    /// pool. If `parallel_threshold` is `None`, `DEFAULT_PARALLEL_THRESHOLD`
    /// is used.
    pub fn segment_and_link_batch_with_threshold<B>(
        &self,
        inputs: &[(B, Vec<TextToken>)],
        parallel_threshold: Option<usize>,
    ) -> Vec<PartsResult<SegmentationResult>>
    where
        B: AsRef<[u8]> + Sync,
    {
        let threshold = parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD);
        let run = |(bytes, tokens): &(B, Vec<TextToken>)| {
            self.segment_and_link(bytes.as_ref(), tokens)
        };

        if inputs.len() > threshold {
            use rayon::prelude::*;
            inputs.par_iter().map(run).collect()
        } else {
            inputs.iter().map(run).collect()
        }
    }

    /// Runs the four segmentation stages and returns the final regions.
    pub fn segment(&self, image: &RgbImage) -> PartsResult<Vec<Region>> {
        let (width, height) = image.dimensions();

        let started = Instant::now();
        let mask = self
            .preprocessor
            .preprocess(image)
            .inspect_err(|err| self.report_failure(ProcessingStage::Preprocess, err))?;
        self.report_stage(
            ProcessingStage::Preprocess,
            mask.foreground_count(),
            started.elapsed(),
        );

        let started = Instant::now();
        let shapes = self
            .extractor
            .extract(&mask, width, height)
            .inspect_err(|err| self.report_failure(ProcessingStage::RegionExtraction, err))?;
        self.report_stage(
            ProcessingStage::RegionExtraction,
            shapes.len(),
            started.elapsed(),
        );

        let started = Instant::now();
        let classified = self.classifier.classify_all(shapes, height);
        self.report_stage(
            ProcessingStage::Classification,
            classified.len(),
            started.elapsed(),
        );

        let started = Instant::now();
        let regions = self.suppressor.suppress(classified);
        self.report_stage(
            ProcessingStage::OverlapSuppression,
            regions.len(),
            started.elapsed(),
        );

        Ok(regions)
    }

    fn decode(&self, image_bytes: &[u8]) -> PartsResult<RgbImage> {
        decode_image(image_bytes)
            .inspect_err(|err| self.report_failure(ProcessingStage::Preprocess, err))
    }

    fn report_stage(&self, stage: ProcessingStage, items: usize, elapsed: Duration) {
        self.observer.on_event(&PipelineEvent::StageCompleted {
            stage,
            items,
            elapsed,
        });
    }

    fn report_failure(&self, stage: ProcessingStage, err: &PartsError) {
        self.observer.on_event(&PipelineEvent::PipelineFailed {
            stage: Some(err.stage().unwrap_or(stage)),
            message: err.to_string(),
        });
    }
}
