//! Photo element.

use serde::{Deserialize, Serialize};

/// Color adjustments applied to a photo when rendered.
///
/// Values are percentages, except `blur` which is in document units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoFilters {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub blur: f64,
    pub grayscale: f64,
    pub sepia: f64,
}

impl Default for PhotoFilters {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            grayscale: 0.0,
            sepia: 0.0,
        }
    }
}

impl PhotoFilters {
    /// Check if these filters leave the photo unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Clamp every value into its meaningful range.
    pub fn clamped(&self) -> Self {
        Self {
            brightness: self.brightness.clamp(0.0, 200.0),
            contrast: self.contrast.clamp(0.0, 200.0),
            saturation: self.saturation.clamp(0.0, 200.0),
            blur: self.blur.max(0.0),
            grayscale: self.grayscale.clamp(0.0, 100.0),
            sepia: self.sepia.clamp(0.0, 100.0),
        }
    }
}

/// A placed photo. `src` is an opaque URL supplied by the asset layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub src: String,
    #[serde(default)]
    pub filters: PhotoFilters,
}

impl Photo {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filters: PhotoFilters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_filters() {
        let mut filters = PhotoFilters::default();
        assert!(filters.is_identity());
        filters.sepia = 40.0;
        assert!(!filters.is_identity());
    }

    #[test]
    fn test_clamped() {
        let filters = PhotoFilters {
            brightness: 500.0,
            blur: -3.0,
            grayscale: 120.0,
            ..PhotoFilters::default()
        }
        .clamped();
        assert!((filters.brightness - 200.0).abs() < f64::EPSILON);
        assert!(filters.blur.abs() < f64::EPSILON);
        assert!((filters.grayscale - 100.0).abs() < f64::EPSILON);
    }
}
