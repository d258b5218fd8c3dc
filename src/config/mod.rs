// SPDX-License-Identifier: MPL-2.0
//! This module handles the review configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[review]` - Paging, lookahead, undo depth and fetch order
//! - `[gesture]` - Swipe thresholds and which side is primary
//! - `[preview]` - Requested preview size and fitting
//! - `[buckets]` - Label and kind of the three swipe buckets
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `PHOTO_SWIPE_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use photo_swipe::config;
//!
//! let (mut config, _warning) = config::load();
//! config.review.batch_size = Some(50);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::application::loader::{BatchLoader, PreviewSettings};
use crate::application::port::FetchOptions;
use crate::application::session::{ReviewSession, SessionError};
use crate::domain::bucket::BucketKind;
use crate::domain::gesture::{Outcome, SwipeThresholds};
use crate::domain::newtypes::{BatchSize, LookaheadMargin, UndoDepth};
use crate::domain::preview::{ContentMode, TargetSize};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Directory name under the platform config directory.
const APP_NAME: &str = "PhotoSwipe";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "PHOTO_SWIPE_CONFIG_DIR";

// =============================================================================
// Enums (shared between sections)
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewFit {
    /// Whole photo visible, letterboxed.
    #[default]
    AspectFit,
    /// Target filled, photo cropped.
    AspectFill,
}

impl From<PreviewFit> for ContentMode {
    fn from(fit: PreviewFit) -> Self {
        match fit {
            PreviewFit::AspectFit => ContentMode::AspectFit,
            PreviewFit::AspectFill => ContentMode::AspectFill,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BucketKindSetting {
    Delete,
    #[default]
    Collection,
}

impl From<BucketKindSetting> for BucketKind {
    fn from(kind: BucketKindSetting) -> Self {
        match kind {
            BucketKindSetting::Delete => BucketKind::Delete,
            BucketKindSetting::Collection => BucketKind::Collection,
        }
    }
}

// =============================================================================
// Section Structs
// =============================================================================

/// Paging and history settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewConfig {
    /// Assets requested per batch.
    #[serde(default = "default_batch_size", skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    /// Unreviewed entries kept ahead of the cursor before paging.
    #[serde(default = "default_lookahead", skip_serializing_if = "Option::is_none")]
    pub lookahead: Option<usize>,

    /// Undo records retained.
    #[serde(default = "default_undo_depth", skip_serializing_if = "Option::is_none")]
    pub undo_depth: Option<usize>,

    /// Review oldest photos first instead of newest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldest_first: Option<bool>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            lookahead: default_lookahead(),
            undo_depth: default_undo_depth(),
            oldest_first: Some(true),
        }
    }
}

/// Swipe classification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureConfig {
    #[serde(
        default = "default_horizontal_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub horizontal_threshold: Option<f32>,

    #[serde(
        default = "default_vertical_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub vertical_threshold: Option<f32>,

    /// Whether a leftward swipe routes to the primary bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_on_left: Option<bool>,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            horizontal_threshold: default_horizontal_threshold(),
            vertical_threshold: default_vertical_threshold(),
            primary_on_left: Some(true),
        }
    }
}

/// Preview request settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PreviewConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_mode: Option<PreviewFit>,
}

/// One swipe bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketSetting {
    pub label: String,
    #[serde(default)]
    pub kind: BucketKindSetting,
}

impl BucketSetting {
    fn new(label: &str, kind: BucketKindSetting) -> Self {
        Self {
            label: label.to_string(),
            kind,
        }
    }
}

/// Buckets for the three routed swipe outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketsConfig {
    #[serde(default = "default_primary_bucket")]
    pub primary: BucketSetting,

    #[serde(default = "default_secondary_bucket")]
    pub secondary: BucketSetting,

    /// `None` leaves upward swipes unrouted (treated as skips).
    #[serde(
        default = "default_tertiary_bucket",
        skip_serializing_if = "Option::is_none"
    )]
    pub tertiary: Option<BucketSetting>,
}

impl Default for BucketsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_bucket(),
            secondary: default_secondary_bucket(),
            tertiary: default_tertiary_bucket(),
        }
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub gesture: GestureConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub buckets: BucketsConfig,
}

impl Config {
    #[must_use]
    pub fn batch_size(&self) -> BatchSize {
        self.review
            .batch_size
            .map_or_else(BatchSize::default, BatchSize::new)
    }

    #[must_use]
    pub fn lookahead(&self) -> LookaheadMargin {
        self.review
            .lookahead
            .map_or_else(LookaheadMargin::default, LookaheadMargin::new)
    }

    #[must_use]
    pub fn undo_depth(&self) -> UndoDepth {
        self.review
            .undo_depth
            .map_or_else(UndoDepth::default, UndoDepth::new)
    }

    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        if self.review.oldest_first.unwrap_or(true) {
            FetchOptions::oldest_first()
        } else {
            FetchOptions::newest_first()
        }
    }

    #[must_use]
    pub fn swipe_thresholds(&self) -> SwipeThresholds {
        SwipeThresholds::new(
            self.gesture
                .horizontal_threshold
                .unwrap_or(DEFAULT_HORIZONTAL_THRESHOLD),
            self.gesture
                .vertical_threshold
                .unwrap_or(DEFAULT_VERTICAL_THRESHOLD),
            self.gesture.primary_on_left.unwrap_or(true),
        )
    }

    #[must_use]
    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            target: TargetSize::new(
                self.preview.width.unwrap_or(DEFAULT_PREVIEW_EDGE),
                self.preview.height.unwrap_or(DEFAULT_PREVIEW_EDGE),
            ),
            mode: self.preview.content_mode.unwrap_or_default().into(),
        }
    }

    #[must_use]
    pub fn build_loader(&self) -> BatchLoader {
        BatchLoader::new(self.batch_size(), self.preview_settings())
    }

    /// Creates an empty session with the configured buckets routed.
    ///
    /// # Errors
    ///
    /// Fails when a label is blank or more than one bucket is a delete
    /// bucket.
    pub fn build_session(&self) -> std::result::Result<ReviewSession, SessionError> {
        let mut session =
            ReviewSession::new(self.swipe_thresholds(), self.lookahead(), self.undo_depth());

        let routed = [
            (Outcome::Primary, Some(&self.buckets.primary)),
            (Outcome::Secondary, Some(&self.buckets.secondary)),
            (Outcome::Tertiary, self.buckets.tertiary.as_ref()),
        ];
        for (outcome, setting) in routed {
            if let Some(setting) = setting {
                let bucket = session.create_bucket(&setting.label, setting.kind.into())?;
                session.route(outcome, bucket)?;
            }
        }
        Ok(session)
    }
}

// =============================================================================
// Default Value Functions (for serde)
// =============================================================================

#[allow(clippy::unnecessary_wraps)]
fn default_batch_size() -> Option<usize> {
    Some(DEFAULT_BATCH_SIZE)
}

#[allow(clippy::unnecessary_wraps)]
fn default_lookahead() -> Option<usize> {
    Some(DEFAULT_LOOKAHEAD)
}

#[allow(clippy::unnecessary_wraps)]
fn default_undo_depth() -> Option<usize> {
    Some(DEFAULT_UNDO_DEPTH)
}

#[allow(clippy::unnecessary_wraps)]
fn default_horizontal_threshold() -> Option<f32> {
    Some(DEFAULT_HORIZONTAL_THRESHOLD)
}

#[allow(clippy::unnecessary_wraps)]
fn default_vertical_threshold() -> Option<f32> {
    Some(DEFAULT_VERTICAL_THRESHOLD)
}

fn default_primary_bucket() -> BucketSetting {
    BucketSetting::new(DEFAULT_PRIMARY_LABEL, BucketKindSetting::Delete)
}

fn default_secondary_bucket() -> BucketSetting {
    BucketSetting::new(DEFAULT_SECONDARY_LABEL, BucketKindSetting::Collection)
}

#[allow(clippy::unnecessary_wraps)]
fn default_tertiary_bucket() -> Option<BucketSetting> {
    Some(BucketSetting::new(
        DEFAULT_TERTIARY_LABEL,
        BucketKindSetting::Collection,
    ))
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config directory.
///
/// # Resolution Order
///
/// 1. `override_path` parameter (if `Some`)
/// 2. `PHOTO_SWIPE_CONFIG_DIR` environment variable (if set and non-empty)
/// 3. Platform-specific config directory with the app name appended
#[must_use]
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional warning). If loading fails, returns
/// the default config with a warning explaining what went wrong.
#[must_use]
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
#[must_use]
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    let warning = format!("ignoring {}: {err}", path.display());
                    log::warn!("{warning}");
                    return (Config::default(), Some(warning));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// # Errors
///
/// Fails when the file cannot be read or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
///
/// # Errors
///
/// Fails when the file cannot be written.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
///
/// # Errors
///
/// Fails when the file cannot be written.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
///
/// # Errors
///
/// Fails when the config cannot be serialized or written.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Serializes tests that touch the config env var.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            review: ReviewConfig {
                batch_size: Some(12),
                lookahead: Some(3),
                undo_depth: Some(7),
                oldest_first: Some(false),
            },
            gesture: GestureConfig {
                horizontal_threshold: Some(80.0),
                vertical_threshold: Some(140.0),
                primary_on_left: Some(false),
            },
            preview: PreviewConfig {
                width: Some(640),
                height: Some(480),
                content_mode: Some(PreviewFit::AspectFill),
            },
            buckets: BucketsConfig {
                primary: BucketSetting::new("Trash", BucketKindSetting::Delete),
                secondary: BucketSetting::new("Best", BucketKindSetting::Collection),
                tertiary: None,
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.review, config.review);
        assert_eq!(loaded.gesture, config.gesture);
        assert_eq!(loaded.preview, config.preview);
        assert_eq!(loaded.buckets.primary, config.buckets.primary);
        assert_eq!(loaded.buckets.secondary, config.buckets.secondary);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        assert!(matches!(load_from_path(&config_path), Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_falls_back_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[review\nbatch_size = ")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn missing_file_loads_defaults_silently() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().join("absent")));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(
            &config_path,
            "[gesture]\nhorizontal_threshold = 90.0\n\n[preview]\ncontent_mode = \"aspect-fill\"\n",
        )
        .expect("failed to write config");

        let config = load_from_path(&config_path).expect("failed to load config");
        assert_eq!(config.gesture.horizontal_threshold, Some(90.0));
        assert_eq!(config.gesture.vertical_threshold, Some(DEFAULT_VERTICAL_THRESHOLD));
        assert_eq!(config.review, ReviewConfig::default());
        assert_eq!(config.preview_settings().mode, ContentMode::AspectFill);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config = Config::default();
        config.review.batch_size = Some(0);
        config.review.undo_depth = Some(1_000_000);
        config.gesture.horizontal_threshold = Some(-5.0);

        assert_eq!(config.batch_size().value(), MIN_BATCH_SIZE);
        assert_eq!(config.undo_depth().value(), MAX_UNDO_DEPTH);
        assert_eq!(
            config.swipe_thresholds().horizontal.value(),
            MIN_SWIPE_THRESHOLD
        );
    }

    #[test]
    fn default_session_routes_three_buckets() {
        let session = Config::default().build_session().expect("valid defaults");
        let label = |outcome| {
            let id = session.route_for(outcome).expect("routed");
            session.buckets().get(id).expect("bucket").label().to_string()
        };
        assert_eq!(label(Outcome::Primary), DEFAULT_PRIMARY_LABEL);
        assert_eq!(label(Outcome::Secondary), DEFAULT_SECONDARY_LABEL);
        assert_eq!(label(Outcome::Tertiary), DEFAULT_TERTIARY_LABEL);
        assert!(session.buckets().delete_bucket().is_some());
    }

    #[test]
    fn two_delete_buckets_are_rejected() {
        let mut config = Config::default();
        config.buckets.secondary = BucketSetting::new("Bin", BucketKindSetting::Delete);
        assert!(config.build_session().is_err());
    }

    #[test]
    fn env_var_overrides_default_config_dir() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let test_path = "/test/config/dir";
        std::env::set_var(ENV_CONFIG_DIR, test_path);

        let result = config_dir_with_override(None);
        assert_eq!(result, Some(PathBuf::from(test_path)));

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn override_path_takes_precedence_over_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "/env/path");

        let override_path = PathBuf::from("/override/path");
        let result = config_dir_with_override(Some(override_path.clone()));
        assert_eq!(result, Some(override_path));

        std::env::remove_var(ENV_CONFIG_DIR);
    }
}
