//! Overlay configuration.
//!
//! [`OverlayConfig`] is stored as JSON with PascalCase keys, the layout the
//! plugin host uses for its own config files. Every field has a default, so a
//! partial or empty file loads cleanly. Loading always validates.
//!
//! # Example
//!
//! ```
//! use slice_overlay::config::OverlayConfig;
//!
//! let config = OverlayConfig::from_json_str(r#"{ "MaxDistance": 40.0 }"#).unwrap();
//! assert_eq!(config.max_distance, 40.0);
//! assert_eq!(config.designated_territory, 144);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use slice_host::surface::FillColor;

/// The Gold Saucer.
pub const DEFAULT_TERRITORY: u16 = 144;

/// Upper bound for `Shapes.StripSlices`.
pub const MAX_STRIP_SLICES: u32 = 1_000;

/// Upper bound for `Shapes.CircleSegments`.
pub const MAX_CIRCLE_SEGMENTS: u32 = 10_000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while loading, saving or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for [`OverlayConfig`].
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the overlay cannot work with.
    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ---------------------------------------------------------------------------
// OverlayConfig
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OverlayConfig {
    /// Config schema version.
    pub version: u32,
    /// Whether the settings window can be dragged. Persisted only.
    pub is_config_window_movable: bool,
    /// Placeholder flag kept for file compatibility.
    pub some_property_to_be_saved_and_with_a_default: bool,
    /// Territory in which the overlay is active.
    pub designated_territory: u16,
    /// Objects farther than this from the player are ignored, in world units.
    pub max_distance: f32,
    /// Time a marker must have been seen before it is drawn, in milliseconds.
    pub spawn_debounce_ms: u64,
    /// Hazard zone dimensions and tessellation.
    pub shapes: ShapeConfig,
    /// Fill colors per shape.
    pub colors: ShapePalette,
    /// Diagnostics drawn on top of the overlay.
    pub debug: DebugConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            version: 0,
            is_config_window_movable: true,
            some_property_to_be_saved_and_with_a_default: true,
            designated_territory: DEFAULT_TERRITORY,
            max_distance: 30.0,
            spawn_debounce_ms: 5_000,
            shapes: ShapeConfig::default(),
            colors: ShapePalette::default(),
            debug: DebugConfig::default(),
        }
    }
}

/// Hazard zone geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ShapeConfig {
    /// Strip length along its heading.
    pub strip_length: f32,
    /// Strip width across its heading.
    pub strip_width: f32,
    /// Number of independently filled slices per strip.
    pub strip_slices: u32,
    /// Circle radius.
    pub circle_radius: f32,
    /// Half the number of circle samples; the outline has `2 * n + 1` points.
    pub circle_segments: u32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            strip_length: 25.0,
            strip_width: 5.0,
            strip_slices: 20,
            circle_radius: 11.0,
            circle_segments: 100,
        }
    }
}

/// Fill color for each hazard shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ShapePalette {
    pub one_sided_strip: FillColor,
    pub two_sided_strip: FillColor,
    pub circle: FillColor,
}

impl Default for ShapePalette {
    fn default() -> Self {
        Self {
            one_sided_strip: FillColor::rgba(0.0, 0.0, 1.0, 0.15),
            two_sided_strip: FillColor::rgba(0.0, 1.0, 0.0, 0.15),
            circle: FillColor::rgba(1.0, 0.0, 0.0, 0.4),
        }
    }
}

/// Diagnostic drawing. Everything here is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DebugConfig {
    /// Label every in-range object with its id, kind, model and distance.
    pub object_labels: bool,
    /// Treat the local player as a circle marker.
    pub mark_local_player: bool,
    /// Show territory, player, login and object table state in a corner.
    pub status_line: bool,
}

impl OverlayConfig {
    /// The debounce window as a [`Duration`].
    pub fn spawn_debounce(&self) -> Duration {
        Duration::from_millis(self.spawn_debounce_ms)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, [`ConfigError::Invalid`] if
    /// validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), version = config.version, "config loaded");
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("MaxDistance", self.max_distance)?;
        positive("Shapes.StripLength", self.shapes.strip_length)?;
        positive("Shapes.StripWidth", self.shapes.strip_width)?;
        positive("Shapes.CircleRadius", self.shapes.circle_radius)?;
        count_in_range("Shapes.StripSlices", self.shapes.strip_slices, MAX_STRIP_SLICES)?;
        count_in_range(
            "Shapes.CircleSegments",
            self.shapes.circle_segments,
            MAX_CIRCLE_SEGMENTS,
        )?;
        normalized("Colors.OneSidedStrip", self.colors.one_sided_strip)?;
        normalized("Colors.TwoSidedStrip", self.colors.two_sided_strip)?;
        normalized("Colors.Circle", self.colors.circle)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive and finite, got {value}"),
        })
    }
}

fn count_in_range(field: &'static str, value: u32, max: u32) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be within 1..={max}, got {value}"),
        })
    }
}

fn normalized(field: &'static str, color: FillColor) -> Result<(), ConfigError> {
    if color.is_normalized() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("channels must be within 0..=1, got {:?}", color.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_marker_geometry() {
        let config = OverlayConfig::default();
        assert_eq!(config.max_distance, 30.0);
        assert_eq!(config.spawn_debounce(), Duration::from_secs(5));
        assert_eq!(config.shapes.strip_length, 25.0);
        assert_eq!(config.shapes.strip_width, 5.0);
        assert_eq!(config.shapes.strip_slices, 20);
        assert_eq!(config.shapes.circle_radius, 11.0);
        assert_eq!(config.shapes.circle_segments, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(OverlayConfig::from_json_str("{}").unwrap(), OverlayConfig::default());
    }

    #[test]
    fn host_written_flags_are_read() {
        let json = r#"{
            "Version": 0,
            "IsConfigWindowMovable": false,
            "SomePropertyToBeSavedAndWithADefault": false
        }"#;
        let config = OverlayConfig::from_json_str(json).unwrap();
        assert!(!config.is_config_window_movable);
        assert!(!config.some_property_to_be_saved_and_with_a_default);
    }

    #[test]
    fn nested_sections_use_pascal_case() {
        let json = r#"{
            "Shapes": { "CircleRadius": 6.5 },
            "Colors": { "Circle": [0.5, 0.0, 0.0, 1.0] },
            "Debug": { "ObjectLabels": true }
        }"#;
        let config = OverlayConfig::from_json_str(json).unwrap();
        assert_eq!(config.shapes.circle_radius, 6.5);
        assert_eq!(config.shapes.strip_slices, 20);
        assert_eq!(config.colors.circle, FillColor::rgba(0.5, 0.0, 0.0, 1.0));
        assert!(config.debug.object_labels);
        assert!(!config.debug.mark_local_player);
        assert!(!config.debug.status_line);
    }

    #[test]
    fn rejects_non_positive_distance() {
        let err = OverlayConfig::from_json_str(r#"{ "MaxDistance": 0.0 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "MaxDistance"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_slices() {
        let err =
            OverlayConfig::from_json_str(r#"{ "Shapes": { "StripSlices": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "Shapes.StripSlices",
                ..
            }
        ));
    }

    #[test]
    fn rejects_huge_tessellation() {
        let err = OverlayConfig::from_json_str(r#"{ "Shapes": { "CircleSegments": 2147483648 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "Shapes.CircleSegments",
                ..
            }
        ));

        let err = OverlayConfig::from_json_str(r#"{ "Shapes": { "StripSlices": 1001 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "Shapes.StripSlices",
                ..
            }
        ));
    }

    #[test]
    fn tessellation_limits_are_inclusive() {
        let json = format!(
            r#"{{ "Shapes": {{ "CircleSegments": {MAX_CIRCLE_SEGMENTS}, "StripSlices": {MAX_STRIP_SLICES} }} }}"#
        );
        assert!(OverlayConfig::from_json_str(&json).is_ok());
    }

    #[test]
    fn rejects_out_of_range_color() {
        let err = OverlayConfig::from_json_str(r#"{ "Colors": { "Circle": [1.0, 0.0, 0.0, 1.5] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "Colors.Circle", .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            OverlayConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("slice-overlay-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("SliceIsRight.json");

        let mut config = OverlayConfig::default();
        config.max_distance = 42.0;
        config.debug.object_labels = true;
        config.save(&path).unwrap();

        let loaded = OverlayConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = OverlayConfig::load("/definitely/not/here/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
