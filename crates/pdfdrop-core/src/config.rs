//! Widget configuration
//!
//! Every field has a default, so an empty TOML or JSON document is valid.
//!
//! ```toml
//! endpoint_base = "http://localhost:5000"
//! max_file_size = 16777216
//! accepted_extensions = [".pdf"]
//! accepted_mime_types = ["application/pdf"]
//! notice_timeout_ms = 5000
//! ```

use crate::error::ConfigError;
use crate::policy::{AcceptPolicy, DEFAULT_MAX_FILE_SIZE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Prefix for `/pdf/{operation}`; empty means same origin
    pub endpoint_base: String,
    pub max_file_size: u64,
    pub accepted_extensions: Vec<String>,
    pub accepted_mime_types: Vec<String>,
    pub notice_timeout_ms: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let policy = AcceptPolicy::default();
        Self {
            endpoint_base: String::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_extensions: policy.accepted_extensions,
            accepted_mime_types: policy.accepted_mime_types,
            notice_timeout_ms: 5000,
        }
    }
}

impl WidgetConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Check invariants and normalize allowlists to lowercase
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.max_file_size == 0 {
            return Err(ConfigError::Invalid {
                field: "max_file_size",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.accepted_extensions.is_empty() {
            return Err(ConfigError::Invalid {
                field: "accepted_extensions",
                reason: "at least one extension is required".to_string(),
            });
        }

        if let Some(bad) = self.accepted_extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(ConfigError::Invalid {
                field: "accepted_extensions",
                reason: format!("'{}' must start with '.'", bad),
            });
        }

        for ext in &mut self.accepted_extensions {
            *ext = ext.to_ascii_lowercase();
        }
        for mime in &mut self.accepted_mime_types {
            *mime = mime.trim().to_ascii_lowercase();
        }

        Ok(self)
    }

    pub fn policy(&self) -> AcceptPolicy {
        AcceptPolicy {
            max_file_size: self.max_file_size,
            accepted_extensions: self.accepted_extensions.clone(),
            accepted_mime_types: self.accepted_mime_types.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = WidgetConfig::from_toml_str("").unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.policy(), AcceptPolicy::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = WidgetConfig::from_toml_str(
            r#"
            endpoint_base = "http://localhost:5000"
            max_file_size = 1024
            accepted_extensions = [".PDF"]
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint_base, "http://localhost:5000");
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.accepted_extensions, vec![".pdf"]);
        assert_eq!(config.notice_timeout_ms, 5000);
    }

    #[test]
    fn test_json_config() {
        let config = WidgetConfig::from_json_str(r#"{"notice_timeout_ms": 2500}"#).unwrap();
        assert_eq!(config.notice_timeout_ms, 2500);
    }

    #[test]
    fn test_rejects_zero_size() {
        let err = WidgetConfig::from_toml_str("max_file_size = 0").unwrap_err();
        assert!(err.to_string().contains("max_file_size"));
    }

    #[test]
    fn test_rejects_extension_without_dot() {
        let err = WidgetConfig::from_toml_str(r#"accepted_extensions = ["pdf"]"#).unwrap_err();
        assert!(err.to_string().contains("must start with '.'"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            WidgetConfig::from_toml_str("max_file_size = ").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
