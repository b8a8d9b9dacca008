//! Configuration module for sidediff
//!
//! Loads user configuration from ~/.sidediff/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a diff is displayed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub use_colors: bool,
    /// Side-by-side view; the unified colorizer is used when off
    pub side_by_side: bool,
    pub show_line_numbers: bool,
    /// Highlight unchanged lines by file type (needs `use_colors`)
    pub syntax_highlighting: bool,
    /// Context lines requested from git; never re-filtered here
    pub context_lines: u32,
    /// Upper bound on the terminal width, 0 for none
    pub terminal_width: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            use_colors: true,
            side_by_side: true,
            show_line_numbers: true,
            syntax_highlighting: true,
            context_lines: 3,
            terminal_width: 120,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Syntax theme name (syntect/bat theme)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_theme: Option<String>,
    pub display: DisplaySettings,
}

/// Values given on the command line, applied over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub use_colors: Option<bool>,
    pub side_by_side: Option<bool>,
    pub show_line_numbers: Option<bool>,
    pub syntax_highlighting: Option<bool>,
    pub context_lines: Option<u32>,
    pub terminal_width: Option<usize>,
}

impl Config {
    /// Load configuration from default path (~/.sidediff/config.toml)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sidediff")
            .join("config.toml")
    }

    /// Merge CLI overrides into config
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        let display = &mut self.display;
        if let Some(colors) = overrides.use_colors {
            display.use_colors = colors;
        }
        if let Some(sbs) = overrides.side_by_side {
            display.side_by_side = sbs;
        }
        if let Some(numbers) = overrides.show_line_numbers {
            display.show_line_numbers = numbers;
        }
        if let Some(syntax) = overrides.syntax_highlighting {
            display.syntax_highlighting = syntax;
        }
        if let Some(ctx) = overrides.context_lines {
            display.context_lines = ctx;
        }
        if let Some(width) = overrides.terminal_width {
            display.terminal_width = width;
        }
        self
    }

    /// Create a default config file at the default path
    pub fn create_default() -> Result<PathBuf> {
        let config_path = Self::default_path();
        Config::default().write_to(&config_path)?;
        Ok(config_path)
    }

    /// Write this config as TOML, creating parent directories
    pub fn write_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.display.terminal_width, 120);
        assert!(config.display.side_by_side);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "syntax_theme = \"Nord\"\n[display]\nuse_colors = false\ncontext_lines = 7\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.syntax_theme.as_deref(), Some("Nord"));
        assert!(!config.display.use_colors);
        assert_eq!(config.display.context_lines, 7);
        assert!(config.display.show_line_numbers);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\nuse_colors = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.display.terminal_width = 90;
        config.write_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let overrides = Overrides {
            side_by_side: Some(false),
            terminal_width: Some(0),
            ..Default::default()
        };
        let config = Config::default().with_overrides(&overrides);
        assert!(!config.display.side_by_side);
        assert_eq!(config.display.terminal_width, 0);
        assert!(config.display.use_colors);
    }
}
