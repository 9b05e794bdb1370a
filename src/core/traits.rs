//! Collaborator traits injected into the segmentation pipeline.
//!
//! The pipeline never talks to external services itself. Text detection and
//! event reporting are supplied by the caller through these traits:
//!
//! ```text
//! ┌─────────────┐    ┌──────────────────────┐    ┌──────────────────┐
//! │TextDetector │───▶│SegmentationPipeline  │───▶│PipelineObserver  │
//! │             │    │                      │    │                  │
//! │• detect_text│    │• segment_and_link    │    │• on_event        │
//! └─────────────┘    └──────────────────────┘    └──────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use furniture_parts::core::traits::{StaticTextDetector, TextDetector};
//! use furniture_parts::domain::{TextToken, TokenBox};
//!
//! let detector = StaticTextDetector::from_tokens(vec![TextToken::new(
//!     "24 in",
//!     0.98,
//!     TokenBox::new(100.0, 87.0, 40.0, 16.0),
//! )]);
//! let tokens = detector.detect_text(b"ignored").into_tokens();
//! assert_eq!(tokens.len(), 1);
//! ```

use crate::core::errors::PartsResult;
use crate::domain::{TextDetection, TextDetectionResponse};
use crate::pipeline::PipelineEvent;
use std::fmt::Debug;
use std::path::Path;

/// A text-detection capability.
///
/// Implementations wrap an OCR service or model. Failures are reported in the
/// response rather than as an error so the pipeline can continue with zero
/// tokens.
pub trait TextDetector: Send + Sync + Debug {
    /// Detects text in encoded image bytes.
    fn detect_text(&self, image_bytes: &[u8]) -> TextDetectionResponse;
}

/// A detector that always returns the same response.
#[derive(Debug, Clone)]
pub struct StaticTextDetector {
    response: TextDetectionResponse,
}

impl StaticTextDetector {
    /// Creates a detector returning `response` for every image.
    pub fn new(response: TextDetectionResponse) -> Self {
        Self { response }
    }

    /// Creates a detector returning a successful detection of `tokens`.
    pub fn from_tokens(tokens: Vec<crate::domain::TextToken>) -> Self {
        Self::new(TextDetectionResponse::Success(TextDetection::from_tokens(
            tokens,
        )))
    }

    /// Creates a detector returning the given error message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(TextDetectionResponse::Failure {
            error: message.into(),
        })
    }

    /// Parses a detector response from JSON.
    pub fn from_json_str(json: &str) -> PartsResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads a detector response from a JSON file.
    pub fn from_json_file(path: &Path) -> PartsResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl TextDetector for StaticTextDetector {
    fn detect_text(&self, _image_bytes: &[u8]) -> TextDetectionResponse {
        self.response.clone()
    }
}

/// A detector that never finds any text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextDetector;

impl TextDetector for NoTextDetector {
    fn detect_text(&self, _image_bytes: &[u8]) -> TextDetectionResponse {
        TextDetectionResponse::Success(TextDetection::default())
    }
}

/// Receives structured events emitted while the pipeline runs.
pub trait PipelineObserver: Send + Sync + Debug {
    /// Called once per event, in emission order.
    fn on_event(&self, event: &PipelineEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_detector_from_json() {
        let json = r#"{
            "fullText": "24 in",
            "details": [{"text": "24 in", "confidence": 0.9,
                         "bbox": {"x": 1, "y": 2, "width": 30, "height": 10}}],
            "totalWords": 1
        }"#;
        let detector = StaticTextDetector::from_json_str(json).unwrap();
        let tokens = detector.detect_text(&[]).into_tokens();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "24 in");
    }

    #[test]
    fn test_failing_and_empty_detectors() {
        let failing = StaticTextDetector::failing("quota exceeded").detect_text(&[]);
        assert_eq!(failing.error(), Some("quota exceeded"));
        assert!(failing.into_tokens().is_empty());

        let none = NoTextDetector.detect_text(&[]);
        assert!(none.error().is_none());
        assert!(none.into_tokens().is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(StaticTextDetector::from_json_str("[1, 2").is_err());
    }
}
