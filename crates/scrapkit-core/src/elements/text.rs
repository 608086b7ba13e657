//! Text element.

use super::SerializableColor;
use serde::{Deserialize, Serialize};

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontWeight::Light => "Light",
            FontWeight::Normal => "Regular",
            FontWeight::Bold => "Bold",
        }
    }

    /// Numeric CSS-style weight.
    pub fn numeric(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    /// Font family name; fonts come from an external catalog.
    pub font_family: String,
    /// Font size in document units.
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_decoration: TextDecoration,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    #[serde(default)]
    pub letter_spacing: f64,
    pub color: SerializableColor,
    /// Fill behind the text (None = transparent).
    #[serde(default)]
    pub background_color: Option<SerializableColor>,
}

impl Text {
    pub const DEFAULT_FONT_FAMILY: &'static str = "Inter";
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            text_decoration: TextDecoration::default(),
            text_align: TextAlign::default(),
            line_height: 1.2,
            letter_spacing: 0.0,
            color: SerializableColor::black(),
            background_color: None,
        }
    }

    /// Height of a single line in document units.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}
