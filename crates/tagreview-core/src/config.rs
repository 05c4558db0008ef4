//! Configuration loading and discovery.
//!
//! Configuration is layered with [`figment`]:
//! 1. Built-in defaults
//! 2. User config from the platform config directory
//! 3. Project config found by walking up from the repository being reviewed
//! 4. Explicit files passed on the command line
//!
//! # Supported formats
//!
//! TOML (`.toml`), YAML (`.yaml`, `.yml`) and JSON (`.json`).
//!
//! # Config file locations (in order of precedence, highest first):
//! - `.tagreview.<ext>` in the repository directory or any parent
//! - `tagreview.<ext>` in the repository directory or any parent
//! - `~/.config/tagreview/config.<ext>` (user config)
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use tagreview_core::config::ConfigLoader;
//!
//! let repo = Utf8PathBuf::from(".");
//! let config = ConfigLoader::new()
//!     .with_project_search(&repo)
//!     .load()
//!     .unwrap();
//! let settings = config.review_settings();
//! assert_eq!(settings.tag_limit, 10);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::tags::TagOrder;

/// The configuration for tagreview.
///
/// Every section is optional; unset values fall back to the defaults in
/// [`ReviewSettings`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files (falls back to platform defaults if unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Review behavior overrides.
    pub review: Option<ReviewConfig>,
}

/// The `[review]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Prefix that marks a release tag (default `"v"`).
    pub tag_prefix: Option<String>,
    /// How many recent tags to show when no start ref is given (default 10).
    pub tag_limit: Option<usize>,
    /// Tag ranking (`"numeric"` or `"lexicographic"`).
    pub tag_order: Option<TagOrder>,
    /// Whether to `git fetch` before reviewing (default `true`).
    pub fetch: Option<bool>,
}

/// Effective review settings after applying defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSettings {
    /// Release tag prefix.
    pub tag_prefix: String,
    /// Number of recent tags to show.
    pub tag_limit: usize,
    /// Tag ranking.
    pub tag_order: TagOrder,
    /// Fetch before reviewing.
    pub fetch: bool,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            tag_prefix: "v".to_string(),
            tag_limit: 10,
            tag_order: TagOrder::default(),
            fetch: true,
        }
    }
}

impl Config {
    /// Resolve the `[review]` section against the defaults.
    pub fn review_settings(&self) -> ReviewSettings {
        let defaults = ReviewSettings::default();
        let Some(review) = &self.review else {
            return defaults;
        };

        ReviewSettings {
            tag_prefix: review.tag_prefix.clone().unwrap_or(defaults.tag_prefix),
            tag_limit: review.tag_limit.unwrap_or(defaults.tag_limit),
            tag_order: review.tag_order.unwrap_or(defaults.tag_order),
            fetch: review.fetch.unwrap_or(defaults.fetch),
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "tagreview";

/// Builder for loading configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when a parent directory contains this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load.
    explicit_files: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/tagreview/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// A parent directory containing this name ends the search; the start
    /// directory itself is always searched. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<Config> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if self.include_user_config
            && let Some(user_config) = find_user_config()
        {
            tracing::debug!(path = %user_config, "merging user config");
            figment = merge_file(figment, &user_config);
        }

        if let Some(ref root) = self.project_search_root
            && let Some(project_config) = self.find_project_config(root)
        {
            tracing::debug!(path = %project_config, "merging project config");
            figment = merge_file(figment, &project_config);
        }

        for file in &self.explicit_files {
            if !file.is_file() {
                return Err(ConfigError::Missing(file.clone()));
            }
            figment = merge_file(figment, file);
        }

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Find project config by walking up from the given directory.
    fn find_project_config(&self, start: &Utf8Path) -> Option<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            if let Some(ref marker) = self.boundary_marker
                && dir != start
                && dir.join(marker).exists()
            {
                break;
            }

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    return Some(dotfile);
                }

                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    return Some(regular);
                }
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        None
    }
}

/// Find user config in the platform config directory.
fn find_user_config() -> Option<Utf8PathBuf> {
    let config_dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| config_dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Merge a config file into the figment, detecting format from extension.
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/tagreview/` on Linux, `~/Library/Application Support/tagreview/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(tmp: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, contents).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    fn load_file(path: &Utf8Path) -> Config {
        ConfigLoader::new()
            .with_user_config(false)
            .with_file(path)
            .load()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert!(config.review.is_none());
    }

    #[test]
    fn test_default_review_settings() {
        let settings = Config::default().review_settings();
        assert_eq!(settings.tag_prefix, "v");
        assert_eq!(settings.tag_limit, 10);
        assert_eq!(settings.tag_order, TagOrder::Numeric);
        assert!(settings.fetch);
    }

    #[test]
    fn test_loader_builds_with_defaults() {
        let config = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load()
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_single_file_overrides_default() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            "config.toml",
            r#"log_level = "debug"
log_dir = "/tmp/tagreview"
"#,
        );

        let config = load_file(&path);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.log_dir.as_ref().map(|dir| dir.as_str()),
            Some("/tmp/tagreview")
        );
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let tmp = TempDir::new().unwrap();
        let base = write_config(&tmp, "base.toml", r#"log_level = "warn""#);
        let over = write_config(&tmp, "override.toml", r#"log_level = "error""#);

        let config = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&base)
            .with_file(&over)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Error);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file("/definitely/not/here/tagreview.toml")
            .load();
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_review_section_toml() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            "config.toml",
            r#"
[review]
tag_prefix = "release-"
tag_limit = 5
tag_order = "lexicographic"
fetch = false
"#,
        );

        let settings = load_file(&path).review_settings();
        assert_eq!(settings.tag_prefix, "release-");
        assert_eq!(settings.tag_limit, 5);
        assert_eq!(settings.tag_order, TagOrder::Lexicographic);
        assert!(!settings.fetch);
    }

    #[test]
    fn test_partial_review_section_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "config.yaml", "review:\n  tag_limit: 3\n");

        let settings = load_file(&path).review_settings();
        assert_eq!(settings.tag_limit, 3);
        assert_eq!(settings.tag_prefix, "v");
        assert!(settings.fetch);
    }

    #[test]
    fn test_review_section_json() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            "config.json",
            r#"{"review": {"tag_order": "numeric", "fetch": false}}"#,
        );

        let settings = load_file(&path).review_settings();
        assert_eq!(settings.tag_order, TagOrder::Numeric);
        assert!(!settings.fetch);
    }

    #[test]
    fn test_invalid_tag_order_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "config.toml", "[review]\ntag_order = \"random\"\n");

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&path)
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_project_config_discovery() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("src").join("deep");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(project_dir.join(".tagreview.toml"), r#"log_level = "debug""#).unwrap();

        let sub_dir = Utf8PathBuf::try_from(sub_dir).unwrap();
        let config = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&sub_dir)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_dotfile_preferred_over_regular_name() {
        let tmp = TempDir::new().unwrap();
        write_config(&tmp, ".tagreview.toml", r#"log_level = "debug""#);
        write_config(&tmp, "tagreview.toml", r#"log_level = "error""#);

        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(&root)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();

        // parent/.tagreview.toml, parent/child/.git/, parent/child/work/
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(parent.join(".tagreview.toml"), r#"log_level = "warn""#).unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let work = Utf8PathBuf::try_from(work).unwrap();
        let config = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(&work)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_repository_root_config_found_despite_marker() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        write_config(&tmp, "tagreview.toml", "[review]\ntag_limit = 4\n");

        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(&root)
            .load()
            .unwrap();

        assert_eq!(config.review_settings().tag_limit, 4);
    }

    #[test]
    fn test_explicit_file_overrides_project_config() {
        let tmp = TempDir::new().unwrap();
        write_config(&tmp, ".tagreview.toml", "[review]\ntag_prefix = \"r\"\n");
        let over = write_config(&tmp, "override.toml", "[review]\ntag_prefix = \"x\"\n");

        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&root)
            .with_file(&over)
            .load()
            .unwrap();

        assert_eq!(config.review_settings().tag_prefix, "x");
    }

    #[test]
    fn test_user_config_dir() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("tagreview"));
        }
    }
}
