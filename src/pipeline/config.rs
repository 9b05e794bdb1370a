//! Pipeline configuration loading.
//!
//! A [`PipelineConfig`] bundles the configuration of every stage. All fields
//! are optional in JSON; missing values take their defaults.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::errors::PartsResult;
use crate::processors::{ExtractionConfig, LinkingConfig, PreprocessConfig, SuppressionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of the whole segmentation pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Mask computation.
    pub preprocess: PreprocessConfig,
    /// Candidate filters.
    pub extraction: ExtractionConfig,
    /// Overlap suppression.
    pub suppression: SuppressionConfig,
    /// Token linking.
    pub linking: LinkingConfig,
}

impl PipelineConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::PartsError::Json`] for malformed JSON and
    /// [`crate::core::PartsError::Config`] for out-of-range values.
    pub fn from_json_str(content: &str) -> PartsResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> PartsResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> PartsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.preprocess.validate()?;
        self.extraction.validate()?;
        self.suppression.validate()?;
        self.linking.validate()
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{ErrorKind, PartsError};
    use std::io::Write;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{"linking": {"max_distance": 250.0}, "suppression": {}}"#,
        )
        .unwrap();
        assert_eq!(config.linking.max_distance, 250.0);
        assert_eq!(config.suppression, SuppressionConfig::default());
        assert_eq!(config.preprocess, PreprocessConfig::default());
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = PipelineConfig::from_json_str(r#"{"suppression": {"overlap_threshold": 2.0}}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(matches!(err, PartsError::Config(ConfigError::InvalidConfig { .. })));

        let err = PipelineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, PartsError::Json(_)));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"extraction": {{"min_side": 20}}}}"#).unwrap();
        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.extraction.min_side, 20);

        let missing = PipelineConfig::from_json_file(Path::new("/nonexistent/pipeline.json"));
        assert!(matches!(
            missing,
            Err(PartsError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
