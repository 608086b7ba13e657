//! Drag, resize and rotate geometry.
//!
//! Gesture math always starts from the geometry captured when the gesture
//! began and the total pointer travel since then, never from the previous
//! frame, so rounding errors do not accumulate over a long drag.

use crate::elements::{Element, ElementId, ElementTransform};
use crate::selection::Corner;
use crate::snap::{snap_angle, snap_value};
use crate::viewport::Viewport;
use kurbo::{Affine, Point, Size, Vec2};

/// Smallest width/height a resize can produce, in document units.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Wrap an angle into `[0, 360)`. Non-finite angles become 0.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if degrees.is_finite() {
        let wrapped = degrees.rem_euclid(360.0);
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    } else {
        0.0
    }
}

/// Affine transform from element-local coordinates (`(0, 0)..size`) to
/// document coordinates.
///
/// Rotation and flip both act around the element center. A flip is a mirror
/// and rotation is orthogonal, so the composition never skews.
pub fn element_affine(element: &Element) -> Affine {
    let half = element.size.to_vec2() / 2.0;
    Affine::translate(element.position.to_vec2() + half) * frame_linear(&element.transform) * Affine::translate(-half)
}

/// Rotation and flip part of the element affine, without translation.
fn frame_linear(transform: &ElementTransform) -> Affine {
    let sx = if transform.flip_x { -1.0 } else { 1.0 };
    let sy = if transform.flip_y { -1.0 } else { 1.0 };
    Affine::rotate(transform.rotation.to_radians()) * Affine::scale_non_uniform(sx, sy)
}

/// Position after moving `start` by a document-space delta, optionally
/// quantized to the grid as the last step.
pub fn offset_position(start: Point, delta: Vec2, grid: Option<f64>) -> Point {
    let raw = start + delta;
    match grid {
        Some(grid_size) => Point::new(snap_value(raw.x, grid_size), snap_value(raw.y, grid_size)),
        None => raw,
    }
}

/// Position after dragging by a screen-space delta.
pub fn drag_position(start: Point, screen_delta: Vec2, viewport: &Viewport, grid: Option<f64>) -> Point {
    offset_position(start, viewport.screen_delta_to_document(screen_delta), grid)
}

/// Resize a box from one of its corners by a document-space delta.
///
/// Only the edges named by the corner move. Width and height never go below
/// `min_size`; when the left or top edge moves, the position shifts by the
/// clamped amount so the opposite edge stays put.
pub fn resize(position: Point, size: Size, corner: Corner, delta: Vec2, min_size: f64) -> (Point, Size) {
    let min = min_size.max(1.0);
    let mut new_position = position;
    let mut new_size = size;

    if corner.moves_right() {
        new_size.width = (size.width + delta.x).max(min);
    } else if corner.moves_left() {
        new_size.width = (size.width - delta.x).max(min);
        new_position.x = position.x + (size.width - new_size.width);
    }

    if corner.moves_bottom() {
        new_size.height = (size.height + delta.y).max(min);
    } else if corner.moves_top() {
        new_size.height = (size.height - delta.y).max(min);
        new_position.y = position.y + (size.height - new_size.height);
    }

    (new_position, new_size)
}

/// Resize a rotated or flipped element from one of its corners.
///
/// `delta` is in document space. It is mapped into the element's local frame,
/// the local box is resized with [`resize`], and the position is chosen so the
/// document point of the opposite corner does not move.
pub fn resize_transformed(
    position: Point,
    size: Size,
    transform: &ElementTransform,
    corner: Corner,
    delta: Vec2,
    min_size: f64,
) -> (Point, Size) {
    let linear = frame_linear(transform);
    let local_delta = (linear.inverse() * delta.to_point()).to_vec2();
    let (local_origin, new_size) = resize(Point::ZERO, size, corner, local_delta, min_size);

    let half = size.to_vec2() / 2.0;
    let new_half = new_size.to_vec2() / 2.0;
    let shift = (linear * (local_origin.to_vec2() - half + new_half).to_point()).to_vec2();
    (position + half - new_half + shift, new_size)
}

/// Rotation angle in degrees that points the rotation handle from `center`
/// towards `pointer` (0 = straight up). Optionally snapped.
pub fn rotation_from_pointer(center: Point, pointer: Point, snap_increment: Option<f64>) -> f64 {
    let d = pointer - center;
    let degrees = d.y.atan2(d.x).to_degrees() + 90.0;
    match snap_increment {
        Some(increment) => snap_angle(degrees, increment),
        None => normalize_degrees(degrees),
    }
}

/// State for moving one or more elements at once.
#[derive(Debug, Clone)]
pub struct DragState {
    /// Starting pointer position (screen).
    pub start_pointer: Point,
    /// Current pointer position (screen).
    pub current_pointer: Point,
    /// Gesture-start positions of the dragged elements.
    pub originals: Vec<(ElementId, Point)>,
}

impl DragState {
    pub fn new(start_pointer: Point, originals: Vec<(ElementId, Point)>) -> Self {
        Self {
            start_pointer,
            current_pointer: start_pointer,
            originals,
        }
    }

    /// Get the drag delta in screen space.
    pub fn delta(&self) -> Vec2 {
        self.current_pointer - self.start_pointer
    }

    /// Target position for every dragged element.
    pub fn positions(&self, viewport: &Viewport, grid: Option<f64>) -> Vec<(ElementId, Point)> {
        let delta = self.delta();
        self.originals
            .iter()
            .map(|&(id, start)| (id, drag_position(start, delta, viewport, grid)))
            .collect()
    }
}

/// State of a corner resize on a single element.
#[derive(Debug, Clone)]
pub struct ResizeState {
    pub element_id: ElementId,
    pub corner: Corner,
    /// Starting pointer position (screen).
    pub start_pointer: Point,
    /// Current pointer position (screen).
    pub current_pointer: Point,
    pub original_position: Point,
    pub original_size: Size,
    pub original_transform: ElementTransform,
}

impl ResizeState {
    pub fn new(element: &Element, corner: Corner, start_pointer: Point) -> Self {
        Self {
            element_id: element.id(),
            corner,
            start_pointer,
            current_pointer: start_pointer,
            original_position: element.position,
            original_size: element.size,
            original_transform: element.transform,
        }
    }

    /// Resulting geometry for the current pointer.
    pub fn geometry(&self, viewport: &Viewport, min_size: f64) -> (Point, Size) {
        let delta = viewport.screen_delta_to_document(self.current_pointer - self.start_pointer);
        resize_transformed(
            self.original_position,
            self.original_size,
            &self.original_transform,
            self.corner,
            delta,
            min_size,
        )
    }
}

/// State of a rotation drag on a single element.
#[derive(Debug, Clone)]
pub struct RotateState {
    pub element_id: ElementId,
    /// Element center in document coordinates.
    pub center: Point,
    pub original_rotation: f64,
}

impl RotateState {
    pub fn new(element: &Element) -> Self {
        Self {
            element_id: element.id(),
            center: element.center(),
            original_rotation: element.transform.rotation,
        }
    }

    /// Rotation for a pointer given in screen coordinates. A pointer on the
    /// center has no direction and keeps the original rotation.
    pub fn rotation(&self, screen_pointer: Point, viewport: &Viewport, snap_increment: Option<f64>) -> f64 {
        let pointer = viewport.screen_to_document(screen_pointer);
        if (pointer - self.center).hypot() < f64::EPSILON {
            return self.original_rotation;
        }
        rotation_from_pointer(self.center, pointer, snap_increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeType;

    #[test]
    fn test_drag_divides_by_zoom() {
        let mut viewport = Viewport::new();
        viewport.set_zoom(2.0);
        let pos = drag_position(Point::new(10.0, 10.0), Vec2::new(50.0, -20.0), &viewport, None);
        assert!((pos.x - 35.0).abs() < f64::EPSILON);
        assert!((pos.y - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_without_snap_is_exact_offset() {
        let start = Point::new(13.7, -4.2);
        let pos = offset_position(start, Vec2::new(0.3, 7.9), None);
        assert!((pos.x - (13.7 + 0.3)).abs() < 1e-12);
        assert!((pos.y - (-4.2 + 7.9)).abs() < 1e-12);
    }

    #[test]
    fn test_drag_snaps_raw_position() {
        let pos = offset_position(Point::new(3.0, 3.0), Vec2::new(14.0, 40.0), Some(20.0));
        assert_eq!(pos, Point::new(20.0, 40.0));
    }

    #[test]
    fn test_drag_state_uses_gesture_start() {
        let id = uuid::Uuid::new_v4();
        let mut state = DragState::new(Point::new(100.0, 100.0), vec![(id, Point::new(5.0, 5.0))]);
        let viewport = Viewport::new();
        for step in 1..=100 {
            state.current_pointer = Point::new(100.0 + step as f64 * 0.1, 100.0);
        }
        let positions = state.positions(&viewport, None);
        assert!((positions[0].1.x - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_se_grows() {
        let (pos, size) = resize(Point::new(0.0, 0.0), Size::new(100.0, 100.0), Corner::Se, Vec2::new(50.0, 25.0), 20.0);
        assert_eq!(pos, Point::new(0.0, 0.0));
        assert_eq!(size, Size::new(150.0, 125.0));
    }

    #[test]
    fn test_resize_se_never_below_floor() {
        for delta in [-50.0, -100.0, -1e9] {
            let (_, size) = resize(Point::ZERO, Size::new(100.0, 80.0), Corner::Se, Vec2::new(delta, delta), 20.0);
            assert!(size.width >= 20.0);
            assert!(size.height >= 20.0);
        }
    }

    #[test]
    fn test_resize_nw_anchors_opposite_edge() {
        let position = Point::new(10.0, 20.0);
        let size = Size::new(100.0, 60.0);
        // Pull the top-left corner far past the bottom-right corner.
        let (pos, new_size) = resize(position, size, Corner::Nw, Vec2::new(500.0, 500.0), 20.0);
        assert_eq!(new_size, Size::new(20.0, 20.0));
        assert!((pos.x + new_size.width - 110.0).abs() < 1e-9);
        assert!((pos.y + new_size.height - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_ne_and_sw_axes() {
        let (pos, size) = resize(Point::new(0.0, 0.0), Size::new(100.0, 100.0), Corner::Ne, Vec2::new(10.0, 10.0), 20.0);
        assert_eq!(size, Size::new(110.0, 90.0));
        assert_eq!(pos, Point::new(0.0, 10.0));

        let (pos, size) = resize(Point::new(0.0, 0.0), Size::new(100.0, 100.0), Corner::Sw, Vec2::new(10.0, 10.0), 20.0);
        assert_eq!(size, Size::new(90.0, 110.0));
        assert_eq!(pos, Point::new(10.0, 0.0));
    }

    fn corner_point(position: Point, size: Size, transform: &ElementTransform, local: Point) -> Point {
        let mut element = Element::shape(ShapeType::Rectangle, position);
        element.size = size;
        element.transform = *transform;
        element_affine(&element) * local
    }

    #[test]
    fn test_resize_rotated_keeps_opposite_corner() {
        let position = Point::ZERO;
        let size = Size::new(100.0, 100.0);
        let transform = ElementTransform {
            rotation: 90.0,
            ..Default::default()
        };
        let anchor = corner_point(position, size, &transform, Point::ZERO);
        assert!((anchor - Point::new(100.0, 0.0)).hypot() < 1e-9);

        let (new_pos, new_size) =
            resize_transformed(position, size, &transform, Corner::Se, Vec2::new(50.0, 0.0), 20.0);
        // Dragging right on a quarter-turned box pulls its local bottom edge up.
        assert!((new_size.width - 100.0).abs() < 1e-9);
        assert!((new_size.height - 50.0).abs() < 1e-9);
        let moved = corner_point(new_pos, new_size, &transform, Point::ZERO);
        assert!((moved - anchor).hypot() < 1e-9);
    }

    #[test]
    fn test_resize_flipped_and_rotated_nw_anchor() {
        let position = Point::new(40.0, 30.0);
        let size = Size::new(120.0, 80.0);
        let transform = ElementTransform {
            rotation: 30.0,
            flip_x: true,
            flip_y: false,
        };
        let se = Point::new(size.width, size.height);
        let anchor = corner_point(position, size, &transform, se);
        let (new_pos, new_size) =
            resize_transformed(position, size, &transform, Corner::Nw, Vec2::new(-15.0, 25.0), 20.0);
        let new_se = Point::new(new_size.width, new_size.height);
        let moved = corner_point(new_pos, new_size, &transform, new_se);
        assert!((moved - anchor).hypot() < 1e-9);
    }

    #[test]
    fn test_resize_transformed_matches_plain_without_rotation() {
        let transform = ElementTransform::default();
        let plain = resize(Point::new(5.0, 5.0), Size::new(100.0, 60.0), Corner::Ne, Vec2::new(10.0, 10.0), 20.0);
        let framed = resize_transformed(
            Point::new(5.0, 5.0),
            Size::new(100.0, 60.0),
            &transform,
            Corner::Ne,
            Vec2::new(10.0, 10.0),
            20.0,
        );
        assert!((plain.0 - framed.0).hypot() < 1e-9);
        assert!((plain.1.width - framed.1.width).abs() < 1e-9);
        assert!((plain.1.height - framed.1.height).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_state_pointer_on_center_keeps_rotation() {
        let mut element = Element::shape(ShapeType::Rectangle, Point::ZERO);
        element.transform.rotation = 33.0;
        let state = RotateState::new(&element);
        let viewport = Viewport::new();
        let center = viewport.document_to_screen(element.center());
        assert!((state.rotation(center, &viewport, None) - 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_from_pointer() {
        let center = Point::new(0.0, 0.0);
        assert!(rotation_from_pointer(center, Point::new(0.0, -10.0), None).abs() < 1e-9);
        assert!((rotation_from_pointer(center, Point::new(10.0, 0.0), None) - 90.0).abs() < 1e-9);
        assert!((rotation_from_pointer(center, Point::new(-10.0, 0.0), None) - 270.0).abs() < 1e-9);
        let snapped = rotation_from_pointer(center, Point::new(10.0, -9.0), Some(15.0));
        assert!((snapped - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_affine_has_no_skew() {
        let mut el = Element::shape(ShapeType::Rectangle, Point::new(40.0, 40.0));
        el.transform.rotation = 33.0;
        el.transform.flip_x = true;
        let [a, b, c, d, _, _] = element_affine(&el).as_coeffs();
        // Columns stay orthonormal.
        assert!((a * c + b * d).abs() < 1e-12);
        assert!(((a * a + b * b) - 1.0).abs() < 1e-12);
        assert!(((c * c + d * d) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_affine_keeps_center_fixed() {
        let mut el = Element::photo("p", Point::new(100.0, 50.0));
        el.transform = crate::elements::ElementTransform { rotation: 127.0, flip_x: true, flip_y: true };
        let local_center = Point::new(el.size.width / 2.0, el.size.height / 2.0);
        let mapped = element_affine(&el) * local_center;
        assert!((mapped - el.center()).hypot() < 1e-9);
    }

    #[test]
    fn test_flip_mirrors_horizontally() {
        let mut el = Element::photo("p", Point::new(0.0, 0.0));
        el.size = Size::new(100.0, 50.0);
        el.transform.flip_x = true;
        let mapped = element_affine(&el) * Point::new(0.0, 0.0);
        assert!((mapped.x - 100.0).abs() < 1e-9);
        assert!(mapped.y.abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(-90.0) - 270.0).abs() < f64::EPSILON);
        assert!((normalize_degrees(720.0)).abs() < f64::EPSILON);
        assert!(normalize_degrees(f64::NAN).abs() < f64::EPSILON);
    }
}
