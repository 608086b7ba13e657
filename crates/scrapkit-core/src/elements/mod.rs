//! Element definitions for scrapbook pages.

mod photo;
mod shape;
mod sticker;
mod text;

pub use photo::{Photo, PhotoFilters};
pub use shape::{ShapeElement, ShapeType};
pub use sticker::Sticker;
pub use text::{FontStyle, FontWeight, Text, TextAlign, TextDecoration};

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let color = color.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
                255,
            )),
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Get the color with an extra opacity factor applied to alpha.
    pub fn with_opacity(&self, opacity: f64) -> Color {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Line style for element borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    /// Cycle to the next border style.
    pub fn next(self) -> Self {
        match self {
            BorderStyle::Solid => BorderStyle::Dashed,
            BorderStyle::Dashed => BorderStyle::Dotted,
            BorderStyle::Dotted => BorderStyle::Solid,
        }
    }
}

/// Border drawn around an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub enabled: bool,
    pub color: SerializableColor,
    pub width: f64,
    /// Corner radius in document units.
    pub radius: f64,
    pub style: BorderStyle,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            enabled: false,
            color: SerializableColor::black(),
            width: 2.0,
            radius: 0.0,
            style: BorderStyle::default(),
        }
    }
}

/// Drop shadow behind an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub enabled: bool,
    pub color: SerializableColor,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: SerializableColor::new(0, 0, 0, 64),
            blur: 8.0,
            offset_x: 4.0,
            offset_y: 4.0,
        }
    }
}

impl Shadow {
    /// Shadow offset as a vector.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }
}

/// Rotation and mirroring of an element around its center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementTransform {
    /// Rotation in degrees, clockwise in screen space.
    pub rotation: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

/// Type-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Photo(Photo),
    Text(Text),
    Shape(ShapeElement),
    Sticker(Sticker),
}

impl ElementKind {
    /// Type tag as written in the serialized form.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Photo(_) => "photo",
            ElementKind::Text(_) => "text",
            ElementKind::Shape(_) => "shape",
            ElementKind::Sticker(_) => "sticker",
        }
    }

    /// Human readable name for newly created elements.
    fn default_name(&self) -> String {
        match self {
            ElementKind::Photo(_) => "Photo".to_string(),
            ElementKind::Text(_) => "Text".to_string(),
            ElementKind::Shape(shape) => shape.shape_type.display_name().to_string(),
            ElementKind::Sticker(sticker) => {
                if sticker.category.is_empty() {
                    "Sticker".to_string()
                } else {
                    format!("Sticker ({})", sticker.category)
                }
            }
        }
    }

    /// Whether a point in element-local coordinates lies on the element.
    fn contains_local(&self, point: Point, size: Size) -> bool {
        match self {
            ElementKind::Shape(shape) => shape.contains_local(point, size),
            ElementKind::Photo(_) | ElementKind::Text(_) | ElementKind::Sticker(_) => {
                Rect::from_origin_size(Point::ZERO, size).contains(point)
            }
        }
    }
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// One placed object on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    #[serde(default)]
    pub name: String,
    /// Top-left corner before rotation, in document units.
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub transform: ElementTransform,
    /// Paint order key, ascending from back to front.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub border: Border,
    #[serde(default)]
    pub shadow: Shadow,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Default size of new photos.
    pub const PHOTO_SIZE: Size = Size::new(300.0, 200.0);
    /// Default size of new text boxes.
    pub const TEXT_SIZE: Size = Size::new(240.0, 60.0);
    /// Default size of new shapes.
    pub const SHAPE_SIZE: Size = Size::new(120.0, 120.0);
    /// Default size of new stickers.
    pub const STICKER_SIZE: Size = Size::new(100.0, 100.0);

    /// Create an element of any kind with default base properties.
    pub fn new(kind: ElementKind, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: kind.default_name(),
            position,
            size,
            transform: ElementTransform::default(),
            z_index: 0,
            opacity: 1.0,
            visible: true,
            locked: false,
            border: Border::default(),
            shadow: Shadow::default(),
            kind,
        }
    }

    /// Create a photo with identity filters.
    pub fn photo(src: impl Into<String>, position: Point) -> Self {
        Self::new(ElementKind::Photo(Photo::new(src)), position, Self::PHOTO_SIZE)
    }

    /// Create a text box with the default font.
    pub fn text(content: impl Into<String>, position: Point) -> Self {
        Self::new(ElementKind::Text(Text::new(content)), position, Self::TEXT_SIZE)
    }

    /// Create a shape with the default fill.
    pub fn shape(shape_type: ShapeType, position: Point) -> Self {
        Self::new(
            ElementKind::Shape(ShapeElement::new(shape_type)),
            position,
            Self::SHAPE_SIZE,
        )
    }

    /// Create a sticker.
    pub fn sticker(src: impl Into<String>, category: impl Into<String>, position: Point) -> Self {
        Self::new(
            ElementKind::Sticker(Sticker::new(src, category)),
            position,
            Self::STICKER_SIZE,
        )
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Give this element a fresh unique id (used by paste and duplication).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Unrotated bounds in document coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Axis-aligned bounds after rotation and flip.
    pub fn transformed_bounds(&self) -> Rect {
        let affine = crate::transform::element_affine(self);
        let local = Rect::from_origin_size(Point::ZERO, self.size);
        let corners = [
            Point::new(local.x0, local.y0),
            Point::new(local.x1, local.y0),
            Point::new(local.x0, local.y1),
            Point::new(local.x1, local.y1),
        ];
        let first = affine * corners[0];
        corners[1..].iter().fold(Rect::from_points(first, first), |acc, &c| {
            let p = affine * c;
            acc.union_pt(p)
        })
    }

    /// Check if a point (in document coordinates) hits this element.
    pub fn hit_test(&self, point: Point) -> bool {
        let local = crate::transform::element_affine(self).inverse() * point;
        self.kind.contains_local(local, self.size)
    }

    /// Set opacity, clamped to [0, 1].
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 1.0 };
    }

    /// Restore invariants after an arbitrary property edit.
    pub(crate) fn normalize(&mut self) {
        self.set_opacity(self.opacity);
        self.transform.rotation = crate::transform::normalize_degrees(self.transform.rotation);
        self.size.width = self.size.width.max(0.0);
        self.size.height = self.size.height.max(0.0);
    }
}
