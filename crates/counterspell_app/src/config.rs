//! Site configuration file handling (counterspell.toml)

use anyhow::{Context, Result};
use counterspell_animation::SpringConfig;
use counterspell_layout::{ParallaxConfig, Viewport};
use counterspell_theme::{DEFAULT_SCHEME, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "counterspell.toml";

/// Top-level site configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub parallax: ParallaxSection,
    #[serde(default)]
    pub theme: ThemeSection,
    #[serde(default)]
    pub viewport: ViewportSection,
    #[serde(default)]
    pub storage: StorageSection,
}

/// Scroll smoothing spring
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrollConfig {
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default = "default_tension")]
    pub tension: f32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Rest threshold in pixels
    #[serde(default = "default_precision")]
    pub precision: f32,
}

fn default_mass() -> f32 {
    1.0
}

fn default_tension() -> f32 {
    45.0
}

fn default_friction() -> f32 {
    10.0
}

fn default_precision() -> f32 {
    0.01
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            mass: default_mass(),
            tension: default_tension(),
            friction: default_friction(),
            precision: default_precision(),
        }
    }
}

impl ScrollConfig {
    pub fn spring(&self) -> SpringConfig {
        SpringConfig::new(self.tension, self.friction, self.mass).with_precision(self.precision)
    }
}

/// Horizontal scroll section
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParallaxSection {
    #[serde(default = "default_buffer")]
    pub buffer: f32,
    #[serde(default = "default_decoration_rate")]
    pub decoration_rate: f32,
}

fn default_buffer() -> f32 {
    80.0
}

fn default_decoration_rate() -> f32 {
    1.2
}

impl Default for ParallaxSection {
    fn default() -> Self {
        Self {
            buffer: default_buffer(),
            decoration_rate: default_decoration_rate(),
        }
    }
}

impl ParallaxSection {
    pub fn parallax(&self) -> ParallaxConfig {
        ParallaxConfig {
            buffer: self.buffer,
            decoration_rate: self.decoration_rate,
        }
    }
}

/// Color scheme defaults and persistence key
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThemeSection {
    #[serde(default = "default_scheme")]
    pub default_scheme: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for ThemeSection {
    fn default() -> Self {
        Self {
            default_scheme: default_scheme(),
            storage_key: default_storage_key(),
        }
    }
}

/// Initial viewport for headless runs
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewportSection {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    /// `navigator.maxTouchPoints`
    #[serde(default)]
    pub touch_points: u32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

impl Default for ViewportSection {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            touch_points: 0,
        }
    }
}

impl ViewportSection {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height).with_touch_points(self.touch_points)
    }
}

/// Key-value store backing theme persistence
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageSection {
    /// JSON file to persist into; in-memory when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SiteConfig {
    /// Load from a file, or from `counterspell.toml` inside a directory
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        if !config.scroll.spring().is_valid() {
            anyhow::bail!(
                "[scroll] mass, tension, friction and precision must be positive and finite"
            );
        }
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
