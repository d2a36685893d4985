//! Configuration for canon-huff

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HuffmanError;

/// How the decoder matches accumulated bits against the code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    /// Scan the sorted table after every bit.
    LinearScan,
    /// Compare against the first canonical code of each length.
    #[default]
    LengthIndexed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub verify_magic: bool,
    pub decoder: DecodeStrategy,
    pub max_input_size: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            verify_magic: true,
            decoder: DecodeStrategy::default(),
            max_input_size: u32::MAX as u64, // total count field is 32 bits
        }
    }
}

impl CodecConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, HuffmanError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, HuffmanError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| HuffmanError::Config(e.to_string()))?;
        if config.max_input_size > u32::MAX as u64 {
            return Err(HuffmanError::Config(format!(
                "max_input_size {} does not fit the 32-bit symbol count",
                config.max_input_size
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CodecConfig::from_json_str(r#"{ "decoder": "linear_scan" }"#).unwrap();
        assert_eq!(config.decoder, DecodeStrategy::LinearScan);
        assert!(config.verify_magic);
        assert_eq!(config.max_input_size, u32::MAX as u64);
    }

    #[test]
    fn test_rejects_oversized_limit() {
        let result = CodecConfig::from_json_str(r#"{ "max_input_size": 5000000000 }"#);
        assert!(matches!(result, Err(HuffmanError::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(CodecConfig::from_json_str("{ verify_magic: yes").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codec.json");
        std::fs::write(&path, r#"{ "verify_magic": false }"#).unwrap();
        let config = CodecConfig::from_json_file(&path).unwrap();
        assert!(!config.verify_magic);
        assert_eq!(config.decoder, DecodeStrategy::LengthIndexed);
    }
}
