// SPDX-License-Identifier: MPL-2.0
//! Loading and saving relocation preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use relocation::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Render relocated toasts into a custom slot
//! config.default_slot = Some("notifications".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

mod defaults;

pub use defaults::*;

use crate::domain::relocation::SlotKey;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Relocation";

/// User preferences. Every field is optional in the file; the accessors
/// below apply defaults and bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_slot: Option<String>,
    #[serde(default)]
    pub diagnostics_capacity: Option<usize>,
    #[serde(default)]
    pub toast_spacing: Option<f32>,
    #[serde(default)]
    pub toast_padding: Option<f32>,
    #[serde(default)]
    pub toast_width: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_slot: Some(DEFAULT_SLOT.to_string()),
            diagnostics_capacity: Some(DEFAULT_DIAGNOSTICS_CAPACITY),
            toast_spacing: Some(DEFAULT_TOAST_SPACING),
            toast_padding: Some(DEFAULT_TOAST_PADDING),
            toast_width: Some(DEFAULT_TOAST_WIDTH),
        }
    }
}

impl Config {
    /// Slot used when a producer omits one. Blank values fall back to the default.
    #[must_use]
    pub fn default_slot_key(&self) -> SlotKey {
        match self.default_slot.as_deref().map(str::trim) {
            Some(slot) if !slot.is_empty() => SlotKey::from(slot.to_string()),
            _ => SlotKey::from(DEFAULT_SLOT),
        }
    }

    /// Number of diagnostic events to keep, at most [`MAX_DIAGNOSTICS_CAPACITY`].
    ///
    /// The collector may raise small values, see
    /// [`DiagnosticsCollector::new`](crate::diagnostics::DiagnosticsCollector::new).
    #[must_use]
    pub fn diagnostics_capacity(&self) -> usize {
        self.diagnostics_capacity
            .unwrap_or(DEFAULT_DIAGNOSTICS_CAPACITY)
            .min(MAX_DIAGNOSTICS_CAPACITY)
    }

    /// Gap between stacked toasts. Negative or non-finite values fall back to the default.
    #[must_use]
    pub fn toast_spacing(&self) -> f32 {
        non_negative(self.toast_spacing, DEFAULT_TOAST_SPACING)
    }

    /// Distance from the stack to the window edges, sanitized like the spacing.
    #[must_use]
    pub fn toast_padding(&self) -> f32 {
        non_negative(self.toast_padding, DEFAULT_TOAST_PADDING)
    }

    /// Toast width, clamped to [`MIN_TOAST_WIDTH`]..=[`MAX_TOAST_WIDTH`].
    #[must_use]
    pub fn toast_width(&self) -> f32 {
        match self.toast_width {
            Some(width) if width.is_finite() => width.clamp(MIN_TOAST_WIDTH, MAX_TOAST_WIDTH),
            _ => DEFAULT_TOAST_WIDTH,
        }
    }
}

fn non_negative(value: Option<f32>, fallback: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => fallback,
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the platform config directory.
///
/// Returns the defaults if no file exists yet or the platform has no config
/// directory.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves the configuration to the platform config directory.
///
/// Does nothing on platforms without a config directory.
///
/// # Errors
///
/// Returns an error if the file cannot be serialized or written.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads a config file. Unparseable content yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

/// Writes `config` to `path` as TOML, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or any file operation fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
