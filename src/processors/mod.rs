//! Image processing stages for furniture part segmentation.
//!
//! Each stage is a small value type wrapping its configuration, so stages can
//! be built once and reused across images.
//!
//! # Modules
//!
//! * `geometry` - Points, pixel rectangles and contour polygons
//! * `preprocess` - Grayscale, bilateral filter, adaptive threshold and morphology
//! * `region_extraction` - Contour tracing and geometric candidate filters
//! * `classification` - Rule cascade labelling candidates with a component type
//! * `overlap` - Containment-based suppression of nested candidates
//! * `linking` - Nearest-region matching of measurement tokens

pub mod classification;
mod geometry;
pub mod linking;
pub mod overlap;
pub mod preprocess;
pub mod region_extraction;

pub use classification::{RegionClassifier, RegionFeatures};
pub use geometry::*;
pub use linking::{LinkingConfig, SpatialLinker};
pub use overlap::{OverlapSuppressor, SuppressionConfig};
pub use preprocess::{BinaryMask, ImagePreprocessor, PreprocessConfig};
pub use region_extraction::{ExtractionConfig, RegionExtractor};
