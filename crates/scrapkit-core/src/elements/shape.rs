//! Vector shape element.

use super::SerializableColor;
use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Outline of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
    Heart,
}

impl ShapeType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "Rectangle",
            ShapeType::Circle => "Circle",
            ShapeType::Triangle => "Triangle",
            ShapeType::Star => "Star",
            ShapeType::Heart => "Heart",
        }
    }

    pub fn all() -> &'static [ShapeType] {
        &[
            ShapeType::Rectangle,
            ShapeType::Circle,
            ShapeType::Triangle,
            ShapeType::Star,
            ShapeType::Heart,
        ]
    }
}

/// Ratio between inner and outer radius of the star outline.
const STAR_INNER_RATIO: f64 = 0.382;
const STAR_POINTS: usize = 5;

/// A filled and/or stroked vector shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub shape_type: ShapeType,
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no stroke).
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
}

impl ShapeElement {
    /// Default fill for new shapes.
    pub const DEFAULT_FILL: SerializableColor = SerializableColor::new(244, 143, 177, 255);

    pub fn new(shape_type: ShapeType) -> Self {
        Self {
            shape_type,
            fill: Some(Self::DEFAULT_FILL),
            stroke: None,
            stroke_width: 2.0,
        }
    }

    /// Outline in element-local coordinates, filling `(0, 0)..size`.
    pub fn to_path(&self, size: Size) -> BezPath {
        let (w, h) = (size.width, size.height);
        let rect = Rect::new(0.0, 0.0, w, h);
        match self.shape_type {
            ShapeType::Rectangle => rect.to_path(0.1),
            ShapeType::Circle => Ellipse::from_rect(rect).to_path(0.1),
            ShapeType::Triangle => {
                let mut path = BezPath::new();
                path.move_to((w / 2.0, 0.0));
                path.line_to((w, h));
                path.line_to((0.0, h));
                path.close_path();
                path
            }
            ShapeType::Star => {
                let center = rect.center();
                let mut path = BezPath::new();
                for i in 0..STAR_POINTS * 2 {
                    let radius = if i % 2 == 0 { 0.5 } else { 0.5 * STAR_INNER_RATIO };
                    let angle = -FRAC_PI_2 + i as f64 * PI / STAR_POINTS as f64;
                    let p = Point::new(
                        center.x + radius * w * angle.cos(),
                        center.y + radius * h * angle.sin(),
                    );
                    if i == 0 {
                        path.move_to(p);
                    } else {
                        path.line_to(p);
                    }
                }
                path.close_path();
                path
            }
            ShapeType::Heart => {
                let p = |x: f64, y: f64| Point::new(x * w, y * h);
                let mut path = BezPath::new();
                path.move_to(p(0.5, 0.3));
                path.curve_to(p(0.5, 0.2), p(0.4, 0.0), p(0.25, 0.0));
                path.curve_to(p(0.0, 0.0), p(0.0, 0.3), p(0.0, 0.35));
                path.curve_to(p(0.0, 0.6), p(0.3, 0.8), p(0.5, 1.0));
                path.curve_to(p(0.7, 0.8), p(1.0, 0.6), p(1.0, 0.35));
                path.curve_to(p(1.0, 0.3), p(1.0, 0.0), p(0.75, 0.0));
                path.curve_to(p(0.6, 0.0), p(0.5, 0.2), p(0.5, 0.3));
                path.close_path();
                path
            }
        }
    }

    /// Check if a local point lies inside the outline.
    pub fn contains_local(&self, point: Point, size: Size) -> bool {
        match self.shape_type {
            ShapeType::Rectangle => Rect::new(0.0, 0.0, size.width, size.height).contains(point),
            _ => self.to_path(size).contains(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_hit_test() {
        let circle = ShapeElement::new(ShapeType::Circle);
        let size = Size::new(100.0, 100.0);
        assert!(circle.contains_local(Point::new(50.0, 50.0), size));
        // Bounding box corner is outside the circle.
        assert!(!circle.contains_local(Point::new(3.0, 3.0), size));
    }

    #[test]
    fn test_triangle_hit_test() {
        let triangle = ShapeElement::new(ShapeType::Triangle);
        let size = Size::new(100.0, 100.0);
        assert!(triangle.contains_local(Point::new(50.0, 80.0), size));
        assert!(!triangle.contains_local(Point::new(5.0, 10.0), size));
    }

    #[test]
    fn test_star_and_heart_paths_fit_size() {
        let size = Size::new(80.0, 60.0);
        for shape_type in [ShapeType::Star, ShapeType::Heart] {
            let bounds = ShapeElement::new(shape_type).to_path(size).bounding_box();
            assert!(bounds.x0 >= -1e-9 && bounds.y0 >= -1e-9);
            assert!(bounds.x1 <= 80.0 + 1e-9 && bounds.y1 <= 60.0 + 1e-9);
        }
    }

    #[test]
    fn test_star_center_is_inside() {
        let star = ShapeElement::new(ShapeType::Star);
        let size = Size::new(100.0, 100.0);
        assert!(star.contains_local(Point::new(50.0, 50.0), size));
        assert!(!star.contains_local(Point::new(2.0, 98.0), size));
    }
}
