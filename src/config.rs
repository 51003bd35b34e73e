use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub insights: InsightsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Keep line structure in extracted text instead of flowing it.
    #[serde(default = "default_preserve_layout")]
    pub preserve_layout: bool,
    /// Direct extraction results at or below this many characters are
    /// treated as noise and trigger the next fallback method.
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
    #[serde(default = "default_ocr_dpi")]
    pub ocr_dpi: u32,
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    #[serde(default = "default_pdftoppm_path")]
    pub pdftoppm_path: String,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsSettings {
    /// Empty after expansion means insights are disabled.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_preserve_layout() -> bool {
    true
}

fn default_min_text_len() -> usize {
    10
}

fn default_ocr_dpi() -> u32 {
    300
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_pdftoppm_path() -> String {
    "pdftoppm".to_string()
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_api_key() -> String {
    "${GEMINI_API_KEY}".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            preserve_layout: default_preserve_layout(),
            min_text_len: default_min_text_len(),
            ocr_dpi: default_ocr_dpi(),
            ocr_language: default_ocr_language(),
            pdftoppm_path: default_pdftoppm_path(),
            tesseract_path: default_tesseract_path(),
        }
    }
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self { api_key: default_api_key(), model: default_model() }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("docsight");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration.
    ///
    /// A missing config file is not an error: the tool runs with zero
    /// setup, so defaults apply and `docsight init` merely writes a
    /// scaffold to customize. Environment expansion and overrides run in
    /// both cases.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config: Config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file at {}", config_path.display())
            })?;
            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config file at {}", config_path.display())
            })?
        } else {
            Config::default()
        };

        config.expand_env_vars();
        config.apply_env_overrides();

        Ok(config)
    }

    /// Expand environment variables in configuration values
    fn expand_env_vars(&mut self) {
        self.insights.api_key = expand_env_var(&self.insights.api_key);
        self.extraction.pdftoppm_path = expand_env_var(&self.extraction.pdftoppm_path);
        self.extraction.tesseract_path = expand_env_var(&self.extraction.tesseract_path);
    }

    /// Plain environment overrides, kept for parity with the older
    /// env-only deployment surface.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PRESERVE_FORMATTING") {
            self.extraction.preserve_layout =
                !matches!(v.to_lowercase().as_str(), "0" | "false" | "no");
        }
        if let Ok(cmd) = std::env::var("TESSERACT_CMD")
            && !cmd.is_empty()
        {
            self.extraction.tesseract_path = cmd;
        }
        // POPPLER_PATH points at Poppler's bin directory, not the binary.
        if let Ok(dir) = std::env::var("POPPLER_PATH")
            && !dir.is_empty()
        {
            self.extraction.pdftoppm_path =
                PathBuf::from(dir).join("pdftoppm").to_string_lossy().into_owned();
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL")
            && !model.is_empty()
        {
            self.insights.model = model;
        }
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_var_braces() {
        // SAFETY: test is single-threaded
        unsafe { std::env::set_var("TEST_VAR_A", "value_a") };
        assert_eq!(expand_env_var("${TEST_VAR_A}"), "value_a");
        unsafe { std::env::remove_var("TEST_VAR_A") };
    }

    #[test]
    fn test_expand_env_var_dollar() {
        unsafe { std::env::set_var("TEST_VAR_B", "value_b") };
        assert_eq!(expand_env_var("$TEST_VAR_B"), "value_b");
        unsafe { std::env::remove_var("TEST_VAR_B") };
    }

    #[test]
    fn test_expand_env_var_literal() {
        assert_eq!(expand_env_var("literal_value"), "literal_value");
    }

    #[test]
    fn test_expand_env_var_missing_returns_empty() {
        assert_eq!(expand_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), "");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [extraction]
            preserve_layout = false
            min_text_len = 25
            tesseract_path = "/opt/tesseract/bin/tesseract"

            [insights]
            api_key = "literal-key"
            model = "gemini-2.0-flash"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(!config.extraction.preserve_layout);
        assert_eq!(config.extraction.min_text_len, 25);
        assert_eq!(config.extraction.tesseract_path, "/opt/tesseract/bin/tesseract");
        assert_eq!(config.insights.api_key, "literal-key");
        assert_eq!(config.insights.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_config_default_values() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(config.extraction.preserve_layout);
        assert_eq!(config.extraction.min_text_len, 10);
        assert_eq!(config.extraction.ocr_dpi, 300);
        assert_eq!(config.extraction.ocr_language, "eng");
        assert_eq!(config.extraction.pdftoppm_path, "pdftoppm");
        assert_eq!(config.extraction.tesseract_path, "tesseract");
        assert_eq!(config.insights.api_key, "${GEMINI_API_KEY}");
        assert_eq!(config.insights.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let toml_str = r#"
            [extraction]
            min_text_len = 3
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.extraction.min_text_len, 3);
        assert!(config.extraction.preserve_layout);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_preserve_formatting_env_override() {
        let mut config = Config::default();
        unsafe { std::env::set_var("PRESERVE_FORMATTING", "no") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var("PRESERVE_FORMATTING") };
        assert!(!config.extraction.preserve_layout);
    }

    #[test]
    fn test_poppler_path_env_points_at_directory() {
        let mut config = Config::default();
        unsafe { std::env::set_var("POPPLER_PATH", "/opt/poppler/bin") };
        config.apply_env_overrides();
        unsafe { std::env::remove_var("POPPLER_PATH") };
        assert_eq!(config.extraction.pdftoppm_path, "/opt/poppler/bin/pdftoppm");
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.server.port, config.server.port);
        assert_eq!(deserialized.insights.api_key, "${GEMINI_API_KEY}");
    }
}
