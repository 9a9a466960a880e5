//! Configuration file support for raster-gate.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/raster-gate/config.toml` (lowest priority)
//! - Project-local: `.raster-gate.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Project-local config file name.
const PROJECT_CONFIG: &str = ".raster-gate.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Acceptance policy settings.
    pub policy: PolicyConfig,
    /// Batch audit settings.
    pub audit: AuditConfig,
    /// Decoding backend settings.
    pub decoder: DecoderConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Acceptance policy configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Maximum accepted DPI on either axis.
    pub dpi_threshold: Option<u32>,
}

/// Batch audit configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Records fetched per page.
    pub page_size: Option<usize>,
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Decoding backend configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Backend name: "native" or "magick".
    pub backend: Option<String>,
    /// Program run by the magick backend.
    pub magick_program: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/raster-gate/config.toml`
    /// 2. Project-local: `.raster-gate.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if self.policy.dpi_threshold == Some(0) {
            return Err("policy.dpi_threshold must be positive, got 0".to_string());
        }
        if self.audit.page_size == Some(0) {
            return Err("audit.page_size must be positive, got 0".to_string());
        }
        if let Some(ref b) = self.decoder.backend {
            if b != "native" && b != "magick" {
                return Err(format!(
                    "decoder.backend must be 'native' or 'magick', got '{b}'"
                ));
            }
        }
        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.policy.dpi_threshold = other.policy.dpi_threshold.or(self.policy.dpi_threshold);

        self.audit.page_size = other.audit.page_size.or(self.audit.page_size);
        self.audit.recursive = other.audit.recursive.or(self.audit.recursive);

        self.decoder.backend = other.decoder.backend.or_else(|| self.decoder.backend.take());
        self.decoder.magick_program = other
            .decoder
            .magick_program
            .or_else(|| self.decoder.magick_program.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("raster-gate").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.raster-gate.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.policy.dpi_threshold.is_none());
        assert!(config.decoder.backend.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[policy]
dpi_threshold = 150

[audit]
page_size = 50
recursive = true

[decoder]
backend = 'magick'
magick_program = '/usr/local/bin/identify'

[output]
format = 'json'
pretty = true
progress = false
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.policy.dpi_threshold, Some(150));
        assert_eq!(config.audit.page_size, Some(50));
        assert_eq!(config.audit.recursive, Some(true));
        assert_eq!(config.decoder.backend.as_deref(), Some("magick"));
        assert_eq!(
            config.decoder.magick_program,
            Some(PathBuf::from("/usr/local/bin/identify"))
        );
        assert_eq!(config.output.format.as_deref(), Some("json"));
        assert_eq!(config.output.pretty, Some(true));
        assert_eq!(config.output.progress, Some(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_configs() {
        let mut base: AppConfig = toml::from_str(
            r"
[policy]
dpi_threshold = 72

[audit]
page_size = 25
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[policy]
dpi_threshold = 150

[decoder]
backend = 'native'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.policy.dpi_threshold, Some(150));
        assert_eq!(base.audit.page_size, Some(25));
        assert_eq!(base.decoder.backend.as_deref(), Some("native"));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[output]
format = 'json'
pretty = true
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.output.format.as_deref(), Some("json"));
        assert_eq!(base.output.pretty, Some(true));
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let result: Result<AppConfig, _> = toml::from_str(
            r"
[policy]
dpi_threshold = 'high'
",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_section_ignored() {
        let config: AppConfig = toml::from_str(
            r"
[thumbnails]
sizes = [150, 300]

[policy]
dpi_threshold = 120
",
        )
        .expect("unknown sections are ignored");
        assert_eq!(config.policy.dpi_threshold, Some(120));
    }

    #[test]
    fn test_validate_zero_threshold() {
        let config: AppConfig = toml::from_str("[policy]\ndpi_threshold = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("policy.dpi_threshold"));
    }

    #[test]
    fn test_validate_zero_page_size() {
        let config: AppConfig = toml::from_str("[audit]\npage_size = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("audit.page_size"));
    }

    #[test]
    fn test_validate_unknown_backend() {
        let config: AppConfig = toml::from_str("[decoder]\nbackend = 'vips'").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("decoder.backend"));
    }

    #[test]
    fn test_validate_output_format_invalid() {
        let config: AppConfig = toml::from_str("[output]\nformat = 'xml'").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("output.format"));
    }

    #[test]
    fn test_find_config_in_parents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("wp-content").join("uploads");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(PROJECT_CONFIG), "").unwrap();

        assert_eq!(
            find_config_in_parents(&nested),
            Some(root.path().join(PROJECT_CONFIG))
        );
    }
}
