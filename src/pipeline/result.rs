//! Result of a segmentation run and its wire representation.

use crate::core::errors::{PartsError, PartsResult};
use crate::domain::{Link, Region, TextToken};
use serde::{Deserialize, Serialize};

/// Width and height of the processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Output of a successful segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationResult {
    /// Always `"success"`.
    pub status: String,
    /// Number of regions in `regions`.
    pub num_regions: usize,
    /// Final regions, largest first.
    pub regions: Vec<Region>,
    /// Measurement tokens that were considered for linking.
    pub measurements: Vec<TextToken>,
    /// Links between measurements and regions.
    pub links: Vec<Link>,
    /// Size of the processed image.
    pub image_size: ImageSize,
}

impl SegmentationResult {
    pub(crate) fn new(
        regions: Vec<Region>,
        measurements: Vec<TextToken>,
        links: Vec<Link>,
        image_size: ImageSize,
    ) -> Self {
        Self {
            status: "success".to_string(),
            num_regions: regions.len(),
            regions,
            measurements,
            links,
            image_size,
        }
    }
}

/// Response object returned to callers: a result or a structured error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineResponse {
    /// The run succeeded.
    Success(SegmentationResult),
    /// The run failed.
    Error {
        /// Human-readable error message.
        error: String,
        /// Diagnostic detail, typically the underlying cause.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl PipelineResponse {
    /// Returns true for a successful response.
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResponse::Success(_))
    }
}

impl From<&PartsError> for PipelineResponse {
    fn from(err: &PartsError) -> Self {
        PipelineResponse::Error {
            error: err.to_string(),
            detail: err.detail(),
        }
    }
}

/// Converts the outcome of a run into a response object.
pub fn respond(result: PartsResult<SegmentationResult>) -> PipelineResponse {
    match result {
        Ok(result) => PipelineResponse::Success(result),
        Err(err) => PipelineResponse::from(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ProcessingStage;

    #[test]
    fn test_success_serializes_camel_case() {
        let result = SegmentationResult::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            ImageSize {
                width: 1000,
                height: 800,
            },
        );
        let json = serde_json::to_value(respond(Ok(result))).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["numRegions"], 0);
        assert_eq!(json["imageSize"]["width"], 1000);
        assert!(json["regions"].as_array().unwrap().is_empty());
        assert!(json["links"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_error_response_carries_detail() {
        let io = std::io::Error::other("mask allocation failed");
        let err = PartsError::segmentation_with_source(ProcessingStage::Preprocess, "morphology", io);
        let response = respond(Err(err));
        assert!(!response.is_success());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "preprocess failed: morphology");
        assert_eq!(json["detail"], "mask allocation failed");
    }

    #[test]
    fn test_error_without_detail_omits_field() {
        let json = serde_json::to_value(respond(Err(PartsError::image_read("image bytes are empty"))))
            .unwrap();
        assert!(json.get("detail").is_none());
        assert!(json["error"].as_str().unwrap().contains("empty"));
    }
}
