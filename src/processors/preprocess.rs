//! Image preprocessing for region extraction.
//!
//! [`ImagePreprocessor`] turns a colour photograph into a binary edge mask in
//! four fixed steps: grayscale conversion, edge-preserving bilateral
//! smoothing, inverted Gaussian adaptive thresholding, and morphological
//! closing followed by opening.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{
    DEFAULT_BILATERAL_DIAMETER, DEFAULT_BILATERAL_SIGMA_COLOR, DEFAULT_BILATERAL_SIGMA_SPACE,
    DEFAULT_CLOSE_ITERATIONS, DEFAULT_OPEN_ITERATIONS, DEFAULT_THRESHOLD_BLOCK_SIZE,
    DEFAULT_THRESHOLD_OFFSET,
};
use crate::core::errors::{PartsError, PartsResult, ProcessingStage};
use crate::utils::decode_image;
use image::{GrayImage, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter;
use imageproc::map::map_subpixels;
use imageproc::morphology;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Configuration for [`ImagePreprocessor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Odd window size of the bilateral filter.
    pub bilateral_diameter: u32,
    /// Intensity sigma of the bilateral filter.
    pub bilateral_sigma_color: f32,
    /// Spatial sigma of the bilateral filter.
    pub bilateral_sigma_space: f32,
    /// Odd block size of the adaptive threshold.
    pub threshold_block_size: u32,
    /// Constant subtracted from the weighted local mean.
    pub threshold_offset: f32,
    /// Iterations of the 3x3 closing.
    pub close_iterations: u8,
    /// Iterations of the 3x3 opening.
    pub open_iterations: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            bilateral_diameter: DEFAULT_BILATERAL_DIAMETER,
            bilateral_sigma_color: DEFAULT_BILATERAL_SIGMA_COLOR,
            bilateral_sigma_space: DEFAULT_BILATERAL_SIGMA_SPACE,
            threshold_block_size: DEFAULT_THRESHOLD_BLOCK_SIZE,
            threshold_offset: DEFAULT_THRESHOLD_OFFSET,
            close_iterations: DEFAULT_CLOSE_ITERATIONS,
            open_iterations: DEFAULT_OPEN_ITERATIONS,
        }
    }
}

impl ConfigValidator for PreprocessConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bilateral_diameter % 2 == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "bilateral_diameter must be odd, got {}",
                    self.bilateral_diameter
                ),
            });
        }
        self.validate_positive("bilateral_sigma_color", self.bilateral_sigma_color)?;
        self.validate_positive("bilateral_sigma_space", self.bilateral_sigma_space)?;
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "threshold_block_size must be odd and at least 3, got {}",
                    self.threshold_block_size
                ),
            });
        }
        if !self.threshold_offset.is_finite() {
            return Err(ConfigError::InvalidConfig {
                message: "threshold_offset must be finite".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Binary foreground/background mask of an image.
///
/// Foreground pixels are 255 and background pixels are 0. The mask has the
/// same dimensions as the image it was computed from.
#[derive(Debug, Clone)]
pub struct BinaryMask {
    /// The mask pixels.
    pub mask: GrayImage,
    /// Width of the source image.
    pub image_width: u32,
    /// Height of the source image.
    pub image_height: u32,
}

impl BinaryMask {
    /// Wraps an existing single-channel image, binarising any non-zero pixel.
    pub fn from_gray(mut mask: GrayImage) -> Self {
        for pixel in mask.pixels_mut() {
            pixel.0[0] = if pixel.0[0] > 0 { 255 } else { 0 };
        }
        let (image_width, image_height) = mask.dimensions();
        Self {
            mask,
            image_width,
            image_height,
        }
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.mask.as_raw().iter().filter(|&&v| v > 0).count()
    }
}

/// Converts photographs into binary edge masks.
#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Creates a new preprocessor with the given configuration.
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Decodes image bytes and preprocesses the result.
    ///
    /// # Errors
    ///
    /// Returns [`PartsError::ImageRead`] if the bytes are empty or undecodable.
    pub fn preprocess_bytes(&self, bytes: &[u8]) -> PartsResult<BinaryMask> {
        let image = decode_image(bytes)?;
        self.preprocess(&image)
    }

    /// Computes the binary mask of an RGB image.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessingStage::Preprocess`] segmentation error for a
    /// zero-sized image.
    pub fn preprocess(&self, image: &RgbImage) -> PartsResult<BinaryMask> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PartsError::segmentation(
                ProcessingStage::Preprocess,
                format!("image has zero size ({width}x{height})"),
            ));
        }

        let start = Instant::now();
        let gray = image::imageops::grayscale(image);
        let smoothed = filter::bilateral_filter(
            &gray,
            self.config.bilateral_diameter,
            self.config.bilateral_sigma_color,
            self.config.bilateral_sigma_space,
        );
        let binary = adaptive_threshold_gaussian_inv(
            &smoothed,
            self.config.threshold_block_size,
            self.config.threshold_offset,
        );

        let closed = if self.config.close_iterations > 0 {
            morphology::close(&binary, Norm::LInf, self.config.close_iterations)
        } else {
            binary
        };
        let mask = if self.config.open_iterations > 0 {
            morphology::open(&closed, Norm::LInf, self.config.open_iterations)
        } else {
            closed
        };

        let result = BinaryMask {
            mask,
            image_width: width,
            image_height: height,
        };
        debug!(
            width,
            height,
            foreground = result.foreground_count(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Preprocessed image into binary mask"
        );
        Ok(result)
    }
}

/// Inverted adaptive thresholding against a Gaussian-weighted local mean.
///
/// A pixel becomes foreground (255) when its intensity is at most
/// `local_mean - offset`, so dark edges turn white. The Gaussian kernel has
/// `block_size` taps and the sigma `0.3 * ((block_size - 1) * 0.5 - 1) + 0.8`;
/// borders are replicated.
pub fn adaptive_threshold_gaussian_inv(image: &GrayImage, block_size: u32, offset: f32) -> GrayImage {
    let kernel = gaussian_kernel(block_size.max(1) as usize);
    // Kept in f32 between the row and column passes.
    let values = map_subpixels(image, |v: u8| f32::from(v));
    let means = filter::separable_filter_equal(&values, &kernel);

    let mut output = GrayImage::new(image.width(), image.height());
    for ((out, src), mean) in output.pixels_mut().zip(image.pixels()).zip(means.pixels()) {
        let mean = mean.0[0].round().clamp(0.0, 255.0);
        out.0[0] = if f32::from(src.0[0]) <= mean - offset { 255 } else { 0 };
    }
    output
}

/// Normalised 1D Gaussian kernel with the given number of taps.
fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= total;
    }
    kernel
}
