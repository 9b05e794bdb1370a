//! Constants used throughout the segmentation pipeline.
//!
//! These are the default thresholds of each stage. Stage configurations
//! start from these values; the classification cascade uses them directly.

/// Neighbourhood diameter of the edge-preserving smoothing filter.
pub const DEFAULT_BILATERAL_DIAMETER: u32 = 9;

/// Range (intensity) sigma of the edge-preserving smoothing filter.
pub const DEFAULT_BILATERAL_SIGMA_COLOR: f32 = 75.0;

/// Spatial sigma of the edge-preserving smoothing filter.
pub const DEFAULT_BILATERAL_SIGMA_SPACE: f32 = 75.0;

/// Block size of the Gaussian-weighted adaptive threshold.
pub const DEFAULT_THRESHOLD_BLOCK_SIZE: u32 = 13;

/// Constant subtracted from the local weighted mean before thresholding.
pub const DEFAULT_THRESHOLD_OFFSET: f32 = 3.0;

/// Iterations of the 3x3 morphological closing.
pub const DEFAULT_CLOSE_ITERATIONS: u8 = 2;

/// Iterations of the 3x3 morphological opening.
pub const DEFAULT_OPEN_ITERATIONS: u8 = 1;

/// Smallest accepted contour area as a fraction of the image area.
pub const MIN_AREA_RATIO: f32 = 0.003;

/// Largest accepted contour area as a fraction of the image area.
pub const MAX_AREA_RATIO: f32 = 0.90;

/// Minimum bounding box width and height in pixels.
pub const MIN_REGION_SIDE: u32 = 15;

/// Minimum ratio of contour area to bounding box area.
pub const MIN_EXTENT: f32 = 0.5;

/// Polygon approximation tolerance as a fraction of the contour perimeter.
pub const APPROX_EPSILON_RATIO: f32 = 0.02;

/// Guard added to denominators of aspect ratio and extent.
pub const FEATURE_EPSILON: f32 = 1e-5;

/// Aspect ratio above which a region is a support or a leg.
pub const ELONGATED_ASPECT_RATIO: f32 = 5.0;

/// Minimum area ratio for a table top.
pub const TABLE_TOP_MIN_AREA_RATIO: f32 = 0.25;

/// Minimum area ratio for a drawer section.
pub const DRAWER_SECTION_MIN_AREA_RATIO: f32 = 0.15;

/// Relative vertical centre separating the top band from the rest.
pub const TOP_BAND_RELATIVE_Y: f32 = 0.3;

/// Exclusive aspect ratio bounds for a drawer.
pub const DRAWER_ASPECT_RATIO_RANGE: (f32, f32) = (2.0, 4.0);

/// Exclusive upper area ratio for a drawer.
pub const DRAWER_MAX_AREA_RATIO: f32 = 0.1;

/// Minimum extent for a panel.
pub const PANEL_MIN_EXTENT: f32 = 0.85;

/// Maximum approximated vertex count for a panel.
pub const PANEL_MAX_VERTICES: usize = 6;

/// Multiplier applied to the extent to produce the predicted score.
pub const SCORE_EXTENT_FACTOR: f32 = 0.95;

/// Upper bound of the predicted score.
pub const MAX_PREDICTED_SCORE: f32 = 0.92;

/// Containment ratio above which a candidate is treated as a duplicate.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.6;

/// Maximum token to region centre distance, in pixels.
pub const DEFAULT_MAX_LINK_DISTANCE: f32 = 500.0;

/// The default threshold for parallel processing.
///
/// Batches larger than this are processed on the rayon thread pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;
