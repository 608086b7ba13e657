//! Editor configuration.

use crate::document::PageSize;
use crate::error::EditorResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable parameters of an [`Editor`](crate::Editor).
///
/// Every field has a default, so partial JSON files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Grid spacing in document units.
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    /// Quantize dragged positions to the grid.
    #[serde(default)]
    pub snap_to_grid: bool,
    /// Smallest width/height a resize can produce.
    #[serde(default = "default_min_element_size")]
    pub min_element_size: f64,
    /// Offset applied per paste so repeated pastes don't overlap.
    #[serde(default = "default_paste_offset")]
    pub paste_offset: f64,
    /// Maximum number of undo entries kept.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    /// Multiplicative step used by zoom in/out.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Handle hit radius in screen pixels.
    #[serde(default = "default_handle_tolerance")]
    pub handle_tolerance: f64,
    /// Rotation increment used when snapping a rotation gesture.
    #[serde(default = "default_rotation_snap")]
    pub rotation_snap_degrees: f64,
    /// Arrow-key nudge distance in document units (shift multiplies by 10).
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f64,
    /// Page size used for new scrapbooks.
    #[serde(default)]
    pub default_page_size: PageSize,
}

fn default_grid_size() -> f64 {
    crate::snap::GRID_SIZE
}

fn default_min_element_size() -> f64 {
    crate::transform::MIN_ELEMENT_SIZE
}

fn default_paste_offset() -> f64 {
    crate::clipboard::PASTE_OFFSET
}

fn default_max_history() -> usize {
    crate::history::MAX_UNDO_HISTORY
}

fn default_min_zoom() -> f64 {
    0.1
}

fn default_max_zoom() -> f64 {
    10.0
}

fn default_zoom_step() -> f64 {
    1.1
}

fn default_handle_tolerance() -> f64 {
    crate::selection::HANDLE_HIT_TOLERANCE
}

fn default_rotation_snap() -> f64 {
    crate::snap::ANGLE_SNAP_INCREMENT
}

fn default_nudge_step() -> f64 {
    1.0
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            snap_to_grid: false,
            min_element_size: default_min_element_size(),
            paste_offset: default_paste_offset(),
            max_history: default_max_history(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            zoom_step: default_zoom_step(),
            handle_tolerance: default_handle_tolerance(),
            rotation_snap_degrees: default_rotation_snap(),
            nudge_step: default_nudge_step(),
            default_page_size: PageSize::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file. A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_json(&content)
    }

    /// Write the configuration to a file as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "grid_size": 10.0, "snap_to_grid": true }"#).unwrap();
        assert!((config.grid_size - 10.0).abs() < f64::EPSILON);
        assert!(config.snap_to_grid);
        assert!((config.min_element_size - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.max_history, 50);
        assert_eq!(config.default_page_size, PageSize::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(EditorConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(dir.path().join("missing.json")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");

        let config = EditorConfig {
            paste_offset: 5.0,
            max_history: 3,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
