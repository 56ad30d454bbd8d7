//! Configuration types for loading and rendering transmission networks.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining source and style settings.
//! - [`SourceConfig`] - Where and how networks are fetched from the surveillance API.
//! - [`StyleConfig`] - Visual styling options for SVG output.
//!
//! The radial layout has no configuration: its center, radii and angular
//! offsets are fixed so every view of the same network looks the same.
//!
//! # Example
//!
//! ```
//! # use outbreak::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert_eq!(config.source().timeout_ms(), 10_000);
//! ```

use serde::Deserialize;

use outbreak_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Network source configuration section.
    #[serde(default)]
    source: SourceConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified source and style configurations.
    pub fn new(source: SourceConfig, style: StyleConfig) -> Self {
        Self { source, style }
    }

    /// Returns the network source configuration.
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Settings for fetching networks from the surveillance REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the REST API, e.g. `https://surveillance.example.org/api`.
    api_base_url: Option<String>,

    /// Request timeout in milliseconds.
    timeout_ms: u64,

    /// User agent sent with every request.
    user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            timeout_ms: 10_000,
            user_agent: concat!("outbreak/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SourceConfig {
    /// Creates a new [`SourceConfig`].
    pub fn new(api_base_url: Option<String>, timeout_ms: u64, user_agent: String) -> Self {
        Self {
            api_base_url,
            timeout_ms,
            user_agent,
        }
    }

    /// Returns the configured API base URL, if any.
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Visual styling configuration for rendered networks.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] for the SVG canvas, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Creates a new [`StyleConfig`] with an optional background color string.
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}
