use crate::compositor::OutputFormat;
use crate::error::{CollageError, Result};
use crate::layout::{LayoutConfig, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the cloud-storage API base URL.
pub const API_URL_ENV: &str = "YANDEX_API_URL";

/// Remote API section (`[api]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the share link is appended to, e.g.
    /// `https://cloud-api.yandex.net/v1/disk/public/resources/download?public_key=`.
    pub base_url: Option<String>,
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout, applied to the API call and the archive download.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout_secs: 15,
            timeout_secs: 300,
        }
    }
}

impl ApiConfig {
    /// The configured base URL. Fails fast if it is missing or not an http(s) URL.
    pub fn base_url(&self) -> Result<&str> {
        let base = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                CollageError::InvalidConfig(format!(
                    "API base URL is not set (export {} or set api.base_url in config.toml)",
                    API_URL_ENV
                ))
            })?;
        let parsed = url::Url::parse(base).map_err(|e| {
            CollageError::InvalidConfig(format!("API base URL {:?}: {}", base, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CollageError::InvalidConfig(format!(
                "API base URL must be http or https, got {:?}",
                parsed.scheme()
            )));
        }
        Ok(base)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Grid parameters (`[layout]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub cell_width: u32,
    pub cell_height: u32,
    pub columns: u32,
    pub margin: u32,
    /// Canvas fill as `[r, g, b]`.
    pub background: [u8; 3],
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let d = LayoutConfig::default();
        Self {
            cell_width: d.cell_size.width,
            cell_height: d.cell_size.height,
            columns: d.columns,
            margin: d.margin,
            background: [255, 255, 255],
        }
    }
}

impl LayoutSettings {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            cell_size: Size::new(self.cell_width, self.cell_height),
            columns: self.columns,
            margin: self.margin,
        }
    }
}

/// Output container names accepted in config and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatName {
    #[default]
    Jpeg,
    Tiff,
    Png,
}

/// Output section (`[output]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output file; `None` means `Result.<ext>` in the current directory.
    pub path: Option<PathBuf>,
    /// Container; `None` means infer from `path`, falling back to JPEG.
    pub format: Option<FormatName>,
    /// JPEG quality 1..=100.
    pub jpeg_quality: u8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: None,
            format: None,
            jpeg_quality: 90,
        }
    }
}

impl OutputSettings {
    /// Explicit format, if one was configured.
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .map(|name| OutputFormat::from_name(name, self.jpeg_quality))
            .transpose()
    }
}

/// Global configuration loaded from `~/.config/collage/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollageConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl CollageConfig {
    /// Applies `YANDEX_API_URL` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url(std::env::var(API_URL_ENV).ok())
    }

    /// Overrides the API base URL when `url` is non-empty.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = Some(url);
        }
        self
    }
}

pub fn config_path() -> anyhow::Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("collage")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Parse configuration from an explicit file.
pub fn load_from(path: &Path) -> anyhow::Result<CollageConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: CollageConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> anyhow::Result<CollageConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CollageConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_config_values() {
        let cfg = CollageConfig::default();
        assert!(cfg.api.base_url.is_none());
        assert_eq!(cfg.api.connect_timeout_secs, 15);
        assert_eq!(cfg.layout.cell_width, 800);
        assert_eq!(cfg.layout.cell_height, 800);
        assert_eq!(cfg.layout.columns, 7);
        assert_eq!(cfg.layout.margin, 100);
        assert_eq!(cfg.layout.background, [255, 255, 255]);
        assert_eq!(cfg.output.jpeg_quality, 90);
        assert_eq!(cfg.layout.layout_config(), LayoutConfig::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = CollageConfig::default().with_api_url(Some("https://api.example/?k=".into()));
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CollageConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_sections() {
        let toml = r#"
            [api]
            base_url = "https://cloud-api.example/download?public_key="

            [layout]
            columns = 3
            margin = 10

            [output]
            format = "png"
        "#;
        let cfg: CollageConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.api.timeout_secs, 300);
        assert_eq!(cfg.layout.columns, 3);
        assert_eq!(cfg.layout.margin, 10);
        assert_eq!(cfg.layout.cell_width, 800);
        assert_eq!(cfg.output.format, Some(FormatName::Png));
        assert_eq!(cfg.output.output_format().unwrap(), Some(OutputFormat::Png));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\ncell_width = 64\ncell_height = 48\n").unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.layout.layout_config().cell_size, Size::new(64, 48));
    }

    #[test]
    fn missing_base_url_fails_fast() {
        let err = ApiConfig::default().base_url().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(err.to_string().contains(API_URL_ENV));
    }

    #[test]
    fn invalid_base_url_rejected() {
        let cfg = CollageConfig::default().with_api_url(Some("not a url".into()));
        assert_eq!(cfg.api.base_url().unwrap_err().kind(), ErrorKind::InvalidConfig);
        let cfg = CollageConfig::default().with_api_url(Some("ftp://x/".into()));
        assert_eq!(cfg.api.base_url().unwrap_err().kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn blank_override_keeps_file_value() {
        let cfg = CollageConfig::default()
            .with_api_url(Some("https://a.example/?k=".into()))
            .with_api_url(Some("  ".into()))
            .with_api_url(None);
        assert_eq!(cfg.api.base_url().unwrap(), "https://a.example/?k=");
    }
}
