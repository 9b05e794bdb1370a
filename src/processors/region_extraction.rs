//! Candidate region extraction from a binary mask.
//!
//! The [`RegionExtractor`] traces every contour of the mask (outer borders
//! and the holes inside them), measures each one, and keeps the contours
//! that are large enough, not too large, and close to rectangular.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{
    APPROX_EPSILON_RATIO, FEATURE_EPSILON, MAX_AREA_RATIO, MIN_AREA_RATIO, MIN_EXTENT,
    MIN_REGION_SIDE,
};
use crate::core::errors::{PartsError, PartsResult, ProcessingStage};
use crate::domain::RegionShape;
use crate::processors::Polygon;
use crate::processors::preprocess::BinaryMask;
use imageproc::contours::{BorderType, find_contours};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for [`RegionExtractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Smallest accepted contour area as a fraction of the image area.
    pub min_area_ratio: f32,
    /// Largest accepted contour area as a fraction of the image area.
    pub max_area_ratio: f32,
    /// Minimum bounding box width and height in pixels.
    pub min_side: u32,
    /// Minimum ratio of contour area to bounding box area.
    pub min_extent: f32,
    /// Polygon approximation tolerance as a fraction of the perimeter.
    pub approx_epsilon_ratio: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_area_ratio: MIN_AREA_RATIO,
            max_area_ratio: MAX_AREA_RATIO,
            min_side: MIN_REGION_SIDE,
            min_extent: MIN_EXTENT,
            approx_epsilon_ratio: APPROX_EPSILON_RATIO,
        }
    }
}

impl ConfigValidator for ExtractionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_ratio("min_area_ratio", self.min_area_ratio)?;
        self.validate_ratio("max_area_ratio", self.max_area_ratio)?;
        if self.min_area_ratio > self.max_area_ratio {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "min_area_ratio ({}) must not exceed max_area_ratio ({})",
                    self.min_area_ratio, self.max_area_ratio
                ),
            });
        }
        if self.min_side == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "min_side must be greater than 0".to_string(),
            });
        }
        self.validate_ratio("min_extent", self.min_extent)?;
        self.validate_ratio("approx_epsilon_ratio", self.approx_epsilon_ratio)?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Why a contour was not turned into a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    AreaRatio,
    MinSide,
    Extent,
}

/// Extracts candidate regions from binary masks.
#[derive(Debug, Clone, Default)]
pub struct RegionExtractor {
    config: ExtractionConfig,
}

impl RegionExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracts candidate regions from the mask.
    ///
    /// Candidates are returned in contour tracing order, unclassified.
    ///
    /// # Arguments
    ///
    /// * `mask` - Binary mask from the preprocessor.
    /// * `image_width` - Width of the original image.
    /// * `image_height` - Height of the original image.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessingStage::RegionExtraction`] error if the image is
    /// empty or the mask dimensions do not match the image.
    pub fn extract(
        &self,
        mask: &BinaryMask,
        image_width: u32,
        image_height: u32,
    ) -> PartsResult<Vec<RegionShape>> {
        if image_width == 0 || image_height == 0 {
            return Err(PartsError::segmentation(
                ProcessingStage::RegionExtraction,
                format!("image has zero size ({image_width}x{image_height})"),
            ));
        }
        if mask.mask.dimensions() != (image_width, image_height) {
            let (mw, mh) = mask.mask.dimensions();
            return Err(PartsError::segmentation(
                ProcessingStage::RegionExtraction,
                format!(
                    "mask is {mw}x{mh} but the image is {image_width}x{image_height}"
                ),
            ));
        }

        let image_area = image_width as f32 * image_height as f32;
        let contours = find_contours::<u32>(&mask.mask);
        let total = contours.len();

        let mut candidates = Vec::new();
        let mut outer = 0usize;
        let mut rejected = [0usize; 3];

        for contour in &contours {
            if contour.border_type == BorderType::Outer {
                outer += 1;
            }
            match self.measure(&Polygon::from_contour(contour), image_area) {
                Ok(shape) => candidates.push(shape),
                Err(reason) => rejected[reason as usize] += 1,
            }
        }

        debug!(
            contours = total,
            outer,
            holes = total - outer,
            kept = candidates.len(),
            rejected_area = rejected[Rejection::AreaRatio as usize],
            rejected_side = rejected[Rejection::MinSide as usize],
            rejected_extent = rejected[Rejection::Extent as usize],
            "Extracted candidate regions"
        );

        Ok(candidates)
    }

    /// Measures one contour, applying the filters in their fixed order.
    fn measure(&self, polygon: &Polygon, image_area: f32) -> Result<RegionShape, Rejection> {
        let area = polygon.area();
        let area_ratio = area / image_area;
        if !(self.config.min_area_ratio..=self.config.max_area_ratio).contains(&area_ratio) {
            return Err(Rejection::AreaRatio);
        }

        // An empty contour has zero area and never gets here.
        let Some(bbox) = polygon.bounding_rect() else {
            return Err(Rejection::AreaRatio);
        };
        if bbox.width < self.config.min_side || bbox.height < self.config.min_side {
            return Err(Rejection::MinSide);
        }

        let aspect_ratio = bbox.aspect_ratio(FEATURE_EPSILON);

        let epsilon = self.config.approx_epsilon_ratio * polygon.perimeter();
        let vertex_count = polygon.approx_poly_dp(epsilon).len();

        let extent = area / (bbox.area() as f32 + FEATURE_EPSILON);
        if extent < self.config.min_extent {
            return Err(Rejection::Extent);
        }

        Ok(RegionShape {
            bbox,
            area,
            area_ratio,
            aspect_ratio,
            extent,
            vertex_count,
        })
    }
}
