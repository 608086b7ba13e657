//! Viewport module for pan/zoom transforms.

use crate::config::EditorConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport manages the view transform for the canvas.
///
/// Every screen/document conversion in the engine goes through
/// [`Viewport::screen_to_document`]: `document = (screen - offset) / zoom`.
/// The viewport never touches element geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen-space translation of the document origin (pan).
    pub offset: Vec2,
    /// Current zoom level; always within `[min_zoom, max_zoom]`.
    zoom: f64,
    /// Minimum allowed zoom level, always positive.
    min_zoom: f64,
    /// Maximum allowed zoom level, never below `min_zoom`.
    max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Viewport {
    /// Create a new viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport using the zoom limits of a config.
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut viewport = Self::default();
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom);
        viewport.set_zoom(1.0);
        viewport
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Allowed zoom range as `(min, max)`.
    pub fn zoom_limits(&self) -> (f64, f64) {
        self.limits()
    }

    /// Change the allowed zoom range and re-clamp the current zoom.
    /// A non-positive or non-finite minimum falls back to 0.1, and a maximum
    /// below the minimum is raised to it.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        (self.min_zoom, self.max_zoom) = self.limits();
        self.zoom = self.clamp_zoom(self.zoom);
    }

    /// Sanitized limits. Deserialized viewports may carry any values.
    fn limits(&self) -> (f64, f64) {
        let min = if self.min_zoom.is_finite() && self.min_zoom > 0.0 {
            self.min_zoom
        } else {
            0.1
        };
        let max = if self.max_zoom.is_finite() { self.max_zoom.max(min) } else { min };
        (min, max)
    }

    /// Set the zoom, clamped into the allowed range.
    /// Non-finite or non-positive values clamp to the minimum.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (min, max) = self.limits();
        if !zoom.is_finite() || zoom <= 0.0 {
            return min;
        }
        zoom.clamp(min, max)
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts document coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to document coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to document coordinates.
    pub fn screen_to_document(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a document point to screen coordinates.
    pub fn document_to_screen(&self, document_point: Point) -> Point {
        self.transform() * document_point
    }

    /// Convert a screen-space delta (e.g. a pointer drag) to document space.
    pub fn screen_delta_to_document(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the viewport, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = self.clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let document_point = self.screen_to_document(screen_point);
        self.zoom = new_zoom;

        // Adjust offset so document_point stays at screen_point
        let new_screen = self.document_to_screen(document_point);
        self.offset += screen_point - new_screen;
    }

    /// Zoom in by `step` around a screen point.
    pub fn zoom_in(&mut self, screen_point: Point, step: f64) {
        self.zoom_at(screen_point, step);
    }

    /// Zoom out by `step` around a screen point.
    pub fn zoom_out(&mut self, screen_point: Point, step: f64) {
        if step > 0.0 {
            self.zoom_at(screen_point, 1.0 / step);
        }
    }

    /// Reset viewport to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = self.clamp_zoom(1.0);
    }

    /// Fit the viewport to show the given bounding box centered.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.zoom = self.clamp_zoom(scale_x.min(scale_y));

        // Center the bounds in the viewport
        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);

        self.offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert!((viewport.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_document_with_zoom_and_pan() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        viewport.offset = Vec2::new(100.0, 50.0);
        let doc = viewport.screen_to_document(Point::new(300.0, 150.0));
        assert!((doc.x - 100.0).abs() < f64::EPSILON);
        assert!((doc.y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.set_zoom(1.5);

        let original = Point::new(123.0, 456.0);
        let doc = viewport.screen_to_document(original);
        let back = viewport.document_to_screen(doc);

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_delta_conversion() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(4.0);
        viewport.offset = Vec2::new(999.0, 999.0);
        let delta = viewport.screen_delta_to_document(Vec2::new(40.0, -8.0));
        assert!((delta.x - 10.0).abs() < f64::EPSILON);
        assert!((delta.y + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        let (min, max) = viewport.zoom_limits();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.zoom() - min).abs() < f64::EPSILON);

        viewport.set_zoom(1.0);
        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.zoom() - max).abs() < f64::EPSILON);

        viewport.set_zoom(0.0);
        assert!((viewport.zoom() - min).abs() < f64::EPSILON);
        viewport.set_zoom(f64::NAN);
        assert!(viewport.zoom() > 0.0);
        viewport.set_zoom(-3.0);
        assert!(viewport.zoom() > 0.0);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(12.0, 34.0);
        let anchor = Point::new(200.0, 100.0);
        let before = viewport.screen_to_document(anchor);
        viewport.zoom_in(anchor, 1.25);
        let after = viewport.screen_to_document(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        viewport.zoom_out(anchor, 1.25);
        assert!((viewport.zoom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan() {
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(10.0, 20.0));
        assert!((viewport.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((viewport.offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_bounds_centers_page() {
        let mut viewport = Viewport::new();
        viewport.fit_to_bounds(Rect::new(0.0, 0.0, 1000.0, 500.0), Size::new(600.0, 600.0), 50.0);
        assert!((viewport.zoom() - 0.5).abs() < 1e-9);
        let center = viewport.document_to_screen(Point::new(500.0, 250.0));
        assert!((center.x - 300.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_config_limits() {
        let config = EditorConfig {
            min_zoom: 0.5,
            max_zoom: 2.0,
            ..EditorConfig::default()
        };
        let mut viewport = Viewport::from_config(&config);
        viewport.set_zoom(8.0);
        assert!((viewport.zoom() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inverted_zoom_limits_do_not_panic() {
        let mut viewport = Viewport::new();
        viewport.set_zoom_limits(0.1, 0.05);
        viewport.set_zoom(2.0);
        assert!((viewport.zoom() - 0.1).abs() < f64::EPSILON);
        assert_eq!(viewport.zoom_limits(), (0.1, 0.1));
    }

    #[test]
    fn test_zero_min_zoom_never_gives_zero_zoom() {
        let mut viewport = Viewport::new();
        viewport.set_zoom_limits(0.0, f64::NAN);
        viewport.set_zoom(0.0);
        assert!(viewport.zoom() > 0.0);
        let point = viewport.screen_to_document(Point::new(10.0, 10.0));
        assert!(point.x.is_finite() && point.y.is_finite());
    }

    #[test]
    fn test_deserialized_bad_limits_are_sanitized() {
        let json = r#"{"offset":{"x":0.0,"y":0.0},"zoom":1.0,"min_zoom":5.0,"max_zoom":1.0}"#;
        let mut viewport: Viewport = serde_json::from_str(json).unwrap();
        viewport.zoom_at(Point::ZERO, 0.5);
        assert!((viewport.zoom() - 5.0).abs() < f64::EPSILON);
    }
}
