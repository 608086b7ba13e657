//! Sticker element.

use serde::{Deserialize, Serialize};

/// A decorative sticker picked from a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    /// Opaque URL supplied by the asset layer.
    pub src: String,
    #[serde(default)]
    pub category: String,
}

impl Sticker {
    pub fn new(src: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            category: category.into(),
        }
    }
}
