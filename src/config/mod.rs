// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, loaded from a
//! `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language and theme mode
//! - `[map]` - Map style, access token and initial camera
//! - `[search]` - Place search debounce and limits
//! - `[backend]` - Which backend to use, with `[backend.firebase]` and
//!   `[backend.supabase]` connection settings
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `WAYFARER_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Environment Overrides
//!
//! After the file is read, `WAYFARER_MAPBOX_TOKEN` replaces the map access
//! token and `WAYFARER_BACKEND` replaces the backend kind.
//!
//! # Examples
//!
//! ```no_run
//! use wayfarer::config;
//!
//! // Load configuration (returns tuple with optional warning)
//! let (config, warning) = config::load();
//! if let Some(key) = warning {
//!     eprintln!("config warning: {key}");
//! }
//! println!("backend: {}", config.backend.kind);
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::Coordinate;
use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILE: &str = "settings.toml";

/// Environment variable holding the Mapbox access token.
pub const ENV_MAPBOX_TOKEN: &str = "WAYFARER_MAPBOX_TOKEN";

/// Environment variable selecting the backend kind.
pub const ENV_BACKEND: &str = "WAYFARER_BACKEND";

// =============================================================================
// BackendKind
// =============================================================================

/// Which backend stores pins and authenticates users.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Firebase,
    Supabase,
    #[default]
    Memory,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "firebase" => Ok(Self::Firebase),
            "supabase" => Ok(Self::Supabase),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!(
                "unknown backend `{other}`, expected firebase, supabase or memory"
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Firebase => "firebase",
            Self::Supabase => "supabase",
            Self::Memory => "memory",
        })
    }
}

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Map style and initial camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// `mapbox://styles/{owner}/{style}`
    pub style_url: String,

    /// Public access token. When absent the token screen is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    pub initial_latitude: f64,
    pub initial_longitude: f64,
    pub initial_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_STYLE_URL.to_string(),
            access_token: None,
            initial_latitude: DEFAULT_INITIAL_LATITUDE,
            initial_longitude: DEFAULT_INITIAL_LONGITUDE,
            initial_zoom: DEFAULT_INITIAL_ZOOM,
        }
    }
}

impl MapConfig {
    /// The configured token, ignoring blank values.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Initial map center, kept inside the projection's latitude range.
    #[must_use]
    pub fn initial_center(&self) -> Coordinate {
        Coordinate::normalized(
            self.initial_latitude
                .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE),
            self.initial_longitude,
        )
    }
}

/// Place search behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub min_query_chars: usize,
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Firebase project settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub storage_bucket: String,
}

/// Supabase project settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL, `https://<ref>.supabase.co`.
    pub url: String,
    pub anon_key: String,
    pub bucket: String,
    pub table: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            bucket: DEFAULT_SUPABASE_BUCKET.to_string(),
            table: DEFAULT_SUPABASE_TABLE.to_string(),
        }
    }
}

/// Backend selection and connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    #[serde(default)]
    pub firebase: FirebaseConfig,

    #[serde(default)]
    pub supabase: SupabaseConfig,
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Map style and camera.
    #[serde(default)]
    pub map: MapConfig,

    /// Place search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Config {
    /// Clamps numeric settings into their valid ranges.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let center = self.map.initial_center();
        self.map.initial_latitude = center.latitude();
        self.map.initial_longitude = center.longitude();
        self.map.initial_zoom = self.map.initial_zoom.clamp(MIN_ZOOM, MAX_ZOOM);

        self.search.debounce_ms = self.search.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
        self.search.min_query_chars = self
            .search
            .min_query_chars
            .clamp(DEFAULT_MIN_QUERY_CHARS, MAX_MIN_QUERY_CHARS);
        self.search.result_limit = self.search.result_limit.clamp(1, MAX_RESULT_LIMIT);
        self
    }

    /// Applies environment-style overrides.
    ///
    /// Blank values are ignored. An unknown backend name keeps the
    /// configured kind and returns a warning key.
    pub fn apply_overrides(
        &mut self,
        mapbox_token: Option<String>,
        backend: Option<String>,
    ) -> Option<String> {
        if let Some(token) = mapbox_token.filter(|t| !t.trim().is_empty()) {
            self.map.access_token = Some(token.trim().to_string());
        }

        match backend.filter(|b| !b.trim().is_empty()).map(|b| b.parse()) {
            Some(Ok(kind)) => {
                self.backend.kind = kind;
                None
            }
            Some(Err(err)) => {
                tracing::warn!(error = %err, "ignoring {ENV_BACKEND}");
                Some("notification-config-backend-invalid".to_string())
            }
            None => None,
        }
    }

    fn apply_env_overrides(&mut self) -> Option<String> {
        self.apply_overrides(
            std::env::var(ENV_MAPBOX_TOKEN).ok(),
            std::env::var(ENV_BACKEND).ok(),
        )
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {other}"))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path, then applies environment
/// overrides and clamping.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning i18n key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let (mut config, mut warning) = match get_config_path_with_override(base_dir) {
        Some(path) if path.exists() => match load_from_path(&path) {
            Ok(config) => (config, None),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load config");
                (
                    Config::default(),
                    Some("notification-config-load-error".to_string()),
                )
            }
        },
        _ => (Config::default(), None),
    };

    if let Some(env_warning) = config.apply_env_overrides() {
        warning.get_or_insert(env_warning);
    }
    (config.sanitized(), warning)
}

/// Loads configuration from a specific path, without environment overrides.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
