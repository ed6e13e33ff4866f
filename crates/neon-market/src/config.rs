use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use neon_widgets::carousel::CarouselConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Storefront settings. Every field is optional in the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub carousel: CarouselSection,
    #[serde(default)]
    pub page: PageSection,
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarouselSection {
    #[serde(default = "default_true")]
    pub autoplay: bool,
    /// Milliseconds between automatic advances
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Milliseconds a slide handoff takes
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_true")]
    pub pause_on_hover: bool,
}

impl Default for CarouselSection {
    fn default() -> Self {
        Self {
            autoplay: true,
            interval_ms: default_interval_ms(),
            transition_ms: default_transition_ms(),
            pause_on_hover: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSection {
    /// Page markup file; the bundled storefront is used when unset
    #[serde(default)]
    pub markup: Option<PathBuf>,
    /// Rows scrolled before the back-to-top button shows
    #[serde(default = "default_back_to_top_rows")]
    pub back_to_top_rows: u16,
    /// Milliseconds a notice stays up
    #[serde(default = "default_notice_ms")]
    pub notice_ms: u64,
}

impl Default for PageSection {
    fn default() -> Self {
        Self {
            markup: None,
            back_to_top_rows: default_back_to_top_rows(),
            notice_ms: default_notice_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeSection {
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Capture the mouse (clicks, wheel and hover)
    #[serde(default = "default_true")]
    pub mouse: bool,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            mouse: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file; defaults to the data directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_transition_ms() -> u64 {
    500
}

fn default_back_to_top_rows() -> u16 {
    8
}

fn default_notice_ms() -> u64 {
    3000
}

fn default_fps() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load from `path`, or from the default location. A missing file yields
    /// the defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neon-market")
            .join("config.toml")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neon-market")
    }

    pub fn log_path(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("neon-market.log"))
    }

    pub fn carousel_config(&self) -> CarouselConfig {
        CarouselConfig::default()
            .with_autoplay(self.carousel.autoplay)
            .with_interval(Duration::from_millis(self.carousel.interval_ms))
            .with_transition(Duration::from_millis(self.carousel.transition_ms))
            .with_pause_on_hover(self.carousel.pause_on_hover)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.page.notice_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.carousel.autoplay);
        assert_eq!(config.carousel.interval_ms, 5000);
        assert_eq!(config.carousel.transition_ms, 500);
        assert_eq!(config.page.back_to_top_rows, 8);
        assert_eq!(config.runtime.fps, 60);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [carousel]
            interval_ms = 2000
            pause_on_hover = false

            [runtime]
            mouse = false
            "#,
        )
        .unwrap();
        let carousel = config.carousel_config();
        assert_eq!(carousel.interval, Duration::from_secs(2));
        assert_eq!(carousel.transition, Duration::from_millis(500));
        assert!(carousel.autoplay);
        assert!(!carousel.pause_on_hover);
        assert!(!config.runtime.mouse);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.page.notice_ms, 3000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[carousel]\ninterval_ms = \"soon\"").unwrap();
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn log_file_override() {
        let config: AppConfig = toml::from_str("[log]\nfile = \"/tmp/neon.log\"").unwrap();
        assert_eq!(config.log_path(), PathBuf::from("/tmp/neon.log"));
    }
}
