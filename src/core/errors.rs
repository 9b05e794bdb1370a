//! Error types for the segmentation pipeline.
//!
//! Every stage returns either a well-formed value or a [`PartsError`]. The
//! composite pipeline stops at the first failing stage and surfaces the error
//! as a structured response; nothing in this crate panics on bad input.

use crate::core::config::ConfigError;
use thiserror::Error;

/// Stage of the segmentation pipeline in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    /// Grayscale conversion, smoothing, thresholding and morphology.
    Preprocess,
    /// Contour tracing and geometric filtering.
    RegionExtraction,
    /// Rule-based component labelling.
    Classification,
    /// Containment-based deduplication.
    OverlapSuppression,
    /// Token to region association.
    Linking,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Preprocess => write!(f, "preprocess"),
            ProcessingStage::RegionExtraction => write!(f, "region extraction"),
            ProcessingStage::Classification => write!(f, "classification"),
            ProcessingStage::OverlapSuppression => write!(f, "overlap suppression"),
            ProcessingStage::Linking => write!(f, "linking"),
        }
    }
}

/// Coarse classification of a [`PartsError`].
///
/// Callers use this to tell fatal input problems from internal failures
/// without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image bytes were missing or could not be decoded.
    ImageRead,
    /// Mask or contour processing failed.
    Segmentation,
    /// The pipeline configuration was rejected.
    Config,
}

/// Errors produced by the segmentation pipeline.
#[derive(Error, Debug)]
pub enum PartsError {
    /// The image could not be read or decoded.
    #[error("image read: {message}")]
    ImageRead {
        /// Description of what went wrong.
        message: String,
        /// The decoder error, when there was one.
        #[source]
        source: Option<image::ImageError>,
    },

    /// An unexpected failure during mask or contour processing.
    #[error("{stage} failed: {context}")]
    Segmentation {
        /// The stage that failed.
        stage: ProcessingStage,
        /// Additional context about the failure.
        context: String,
        /// The underlying error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid pipeline configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error while reading an image or configuration file.
    #[error("failed to read file")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration or collaborator payload.
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),
}

impl PartsError {
    /// Creates an image read error without an underlying decoder error.
    pub fn image_read(message: impl Into<String>) -> Self {
        Self::ImageRead {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an image read error wrapping a decoder failure.
    pub fn image_decode(error: image::ImageError) -> Self {
        Self::ImageRead {
            message: format!("failed to decode image: {error}"),
            source: Some(error),
        }
    }

    /// Creates a segmentation error for the given stage.
    pub fn segmentation(stage: ProcessingStage, context: impl Into<String>) -> Self {
        Self::Segmentation {
            stage,
            context: context.into(),
            source: None,
        }
    }

    /// Creates a segmentation error for the given stage with an underlying cause.
    pub fn segmentation_with_source(
        stage: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Segmentation {
            stage,
            context: context.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PartsError::ImageRead { .. } | PartsError::Io(_) => ErrorKind::ImageRead,
            PartsError::Segmentation { .. } => ErrorKind::Segmentation,
            PartsError::Config(_) | PartsError::Json(_) => ErrorKind::Config,
        }
    }

    /// Returns the stage that failed, for segmentation errors.
    pub fn stage(&self) -> Option<ProcessingStage> {
        match self {
            PartsError::Segmentation { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Renders the error source chain, used as diagnostic detail in responses.
    pub fn detail(&self) -> Option<String> {
        let mut source = std::error::Error::source(self);
        let mut parts = Vec::new();
        while let Some(err) = source {
            parts.push(err.to_string());
            source = err.source();
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(": "))
        }
    }
}

/// Convenient result alias for pipeline operations.
pub type PartsResult<T> = Result<T, PartsError>;
