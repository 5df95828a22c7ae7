mod builder;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::animation::EdgeSnapTiming;
use crate::close_zone::CloseZoneTuning;
use crate::geometry::{Point, Size};

pub use builder::{BubbleBuilder, BubbleConfig, BubbleSpec, CloseZoneSpec, DEFAULT_BUBBLE_SIZE_PX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "floating-bubble";
const APP_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bubble image is required but was not configured")]
    MissingBubbleImage,
    #[error("failed to load icon {path}")]
    IconLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings: {path}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EdgeSnapSettings {
    pub duration_ms: Option<u64>,
    pub frame_interval_ms: Option<u64>,
}

impl EdgeSnapSettings {
    pub fn timing(&self) -> EdgeSnapTiming {
        let defaults = EdgeSnapTiming::default();
        EdgeSnapTiming {
            duration: self
                .duration_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.duration),
            frame_interval: self
                .frame_interval_ms
                .filter(|interval| *interval > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.frame_interval),
        }
    }
}

/// User settings from `config.json`. Every field is optional; unset fields
/// keep whatever the builder already holds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BubbleSettings {
    pub bubble_image: Option<PathBuf>,
    pub bubble_size: Option<Size>,
    pub close_bubble_image: Option<PathBuf>,
    pub close_bubble_size: Option<Size>,
    pub start_position: Option<Point>,
    pub opacity: Option<f32>,
    pub close_zone_enabled: Option<bool>,
    pub edge_snap_enabled: Option<bool>,
    pub bottom_background_enabled: Option<bool>,
    pub close_zone: Option<CloseZoneTuning>,
    pub edge_snap: Option<EdgeSnapSettings>,
    pub debug_logging: bool,
}

pub fn load_settings() -> BubbleSettings {
    let (xdg_config_home, home) = config_env_dirs();
    load_settings_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_settings_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> BubbleSettings {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(path) => path,
        Err(_) => return BubbleSettings::default(),
    };
    match load_settings_from(&path) {
        Ok(Some(settings)) => settings,
        Ok(None) => BubbleSettings::default(),
        Err(err) => {
            tracing::warn!(%err, "settings unusable; using defaults");
            BubbleSettings::default()
        }
    }
}

/// Reads settings from `path`; `Ok(None)` when the file does not exist.
pub fn load_settings_from(path: &Path) -> Result<Option<BubbleSettings>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(?path, "settings loaded");
    Ok(Some(settings))
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "floating-bubble",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/config-root/floating-bubble/config.json")
        );
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path(
            "floating-bubble",
            "config.json",
            Some(Path::new("")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/home/.config/floating-bubble/config.json")
        );
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("floating-bubble", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn missing_settings_file_yields_defaults() {
        let settings = load_settings_with(Some(Path::new("/nonexistent/xdg")), None);
        assert_eq!(settings, BubbleSettings::default());
        assert!(load_settings_from(Path::new("/nonexistent/xdg/config.json"))
            .expect("missing file is not an error")
            .is_none());
    }

    #[test]
    fn settings_parse_partial_documents() {
        let settings: BubbleSettings = serde_json::from_str(
            r#"{
                "opacity": 0.5,
                "edge_snap_enabled": false,
                "bubble_size": { "width": 120, "height": 96 },
                "start_position": { "x": -20, "y": 300 },
                "close_zone": { "horizontal_damping": 2.5 },
                "edge_snap": { "duration_ms": 400 }
            }"#,
        )
        .expect("settings should parse");

        assert_eq!(settings.opacity, Some(0.5));
        assert_eq!(settings.edge_snap_enabled, Some(false));
        assert_eq!(settings.close_zone_enabled, None);
        assert_eq!(settings.bubble_size, Some(Size::new(120, 96)));
        assert_eq!(settings.start_position, Some(Point::new(-20, 300)));
        let tuning = settings.close_zone.expect("tuning should parse");
        assert_eq!(tuning.horizontal_damping, 2.5);
        assert_eq!(tuning.vertical_damping, 10.0);
        let timing = settings.edge_snap.expect("edge snap should parse").timing();
        assert_eq!(timing.duration, Duration::from_millis(400));
        assert_eq!(timing.frame_interval, EdgeSnapTiming::default().frame_interval);
        assert!(!settings.debug_logging);
    }

    #[test]
    fn zero_frame_interval_falls_back_to_default() {
        let timing = EdgeSnapSettings {
            duration_ms: None,
            frame_interval_ms: Some(0),
        }
        .timing();
        assert_eq!(timing, EdgeSnapTiming::default());
    }
}
