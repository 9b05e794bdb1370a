//! Text tokens supplied by an external text-detection service.
//!
//! The pipeline never creates tokens itself. These types mirror the
//! collaborator contract so a provider response can be deserialized as-is.

use crate::processors::Point;
use serde::{Deserialize, Serialize};

/// Bounding box of a detected token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Horizontal centre, when reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_x: Option<f32>,
    /// Vertical centre, when reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_y: Option<f32>,
}

impl TokenBox {
    /// Creates a box without provider-reported centres.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            center_x: None,
            center_y: None,
        }
    }

    /// Creates a box centred on the given point.
    pub fn centered_at(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self::new(
            center_x - width / 2.0,
            center_y - height / 2.0,
            width,
            height,
        )
    }

    /// Centre of the box.
    ///
    /// Provider-reported centres take precedence over `x + w/2`, `y + h/2`.
    pub fn center(&self) -> Point {
        Point::new(
            self.center_x.unwrap_or(self.x + self.width / 2.0),
            self.center_y.unwrap_or(self.y + self.height / 2.0),
        )
    }
}

/// A piece of detected text with its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToken {
    /// Literal text.
    pub text: String,
    /// Detection confidence in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    /// Location of the token. Providers without geometry leave this empty.
    #[serde(default)]
    pub bbox: Option<TokenBox>,
}

fn default_confidence() -> f32 {
    1.0
}

impl TextToken {
    /// Creates a token with a bounding box.
    pub fn new(text: impl Into<String>, confidence: f32, bbox: TokenBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            bbox: Some(bbox),
        }
    }

    /// Returns true if the text contains at least one digit.
    pub fn is_measurement(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }

    /// Centre of the token, if it has a bounding box.
    pub fn center(&self) -> Option<Point> {
        self.bbox.as_ref().map(TokenBox::center)
    }
}

/// Keeps the tokens that look like measurements and can be located.
pub fn measurement_tokens(tokens: &[TextToken]) -> Vec<TextToken> {
    tokens
        .iter()
        .filter(|token| token.is_measurement() && token.bbox.is_some())
        .cloned()
        .collect()
}

/// Successful response of a text-detection service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDetection {
    /// Provider status string, usually `"success"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// All detected text as one string.
    #[serde(default, alias = "full_text")]
    pub full_text: String,
    /// Individual tokens.
    #[serde(default)]
    pub details: Vec<TextToken>,
    /// Number of tokens the provider reported.
    #[serde(default, alias = "total_words")]
    pub total_words: usize,
}

impl TextDetection {
    /// Wraps a token list in a detection result.
    pub fn from_tokens(details: Vec<TextToken>) -> Self {
        let full_text = details
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            status: Some("success".to_string()),
            total_words: details.len(),
            full_text,
            details,
        }
    }

    /// The full text with surrounding whitespace removed.
    pub fn simple_text(&self) -> &str {
        self.full_text.trim()
    }
}

/// Response of a text-detection service: a detection or an error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextDetectionResponse {
    /// The provider failed.
    Failure {
        /// Provider error message.
        error: String,
    },
    /// The provider returned text.
    Success(TextDetection),
}

impl TextDetectionResponse {
    /// Returns the tokens of a successful response, or an empty list.
    pub fn into_tokens(self) -> Vec<TextToken> {
        match self {
            TextDetectionResponse::Success(detection) => detection.details,
            TextDetectionResponse::Failure { .. } => Vec::new(),
        }
    }

    /// Returns the error message of a failed response.
    pub fn error(&self) -> Option<&str> {
        match self {
            TextDetectionResponse::Failure { error } => Some(error),
            TextDetectionResponse::Success(_) => None,
        }
    }
}
