//! Selection set and manipulation handles.

use crate::elements::{Element, ElementId};
use crate::page::Page;
use crate::transform::element_affine;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;

/// Distance from the top edge to the rotation handle (in document units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Corner positions, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    pub fn all() -> [Corner; 4] {
        [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se]
    }

    /// Whether this corner drags the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, Corner::Nw | Corner::Sw)
    }

    /// Whether this corner drags the right edge.
    pub fn moves_right(self) -> bool {
        !self.moves_left()
    }

    /// Whether this corner drags the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, Corner::Nw | Corner::Ne)
    }

    /// Whether this corner drags the bottom edge.
    pub fn moves_bottom(self) -> bool {
        !self.moves_top()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::Nw => "nw",
            Corner::Ne => "ne",
            Corner::Sw => "sw",
            Corner::Se => "se",
        }
    }
}

impl FromStr for Corner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nw" => Ok(Corner::Nw),
            "ne" => Ok(Corner::Ne),
            "sw" => Ok(Corner::Sw),
            "se" => Ok(Corner::Se),
            other => Err(format!("unknown resize handle '{}'", other)),
        }
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for resizing.
    Corner(Corner),
    /// Rotation handle (positioned above the element).
    Rotate,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in document coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in document coordinates) hits this handle.
    /// `tolerance` should be adjusted for viewport zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Get the selection handles for an element.
/// Locked elements have none.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    if element.locked {
        return Vec::new();
    }
    let affine = element_affine(element);
    let (w, h) = (element.size.width, element.size.height);
    let local = |corner: Corner| match corner {
        Corner::Nw => Point::new(0.0, 0.0),
        Corner::Ne => Point::new(w, 0.0),
        Corner::Sw => Point::new(0.0, h),
        Corner::Se => Point::new(w, h),
    };

    let mut handles: Vec<Handle> = Corner::all()
        .into_iter()
        .map(|corner| Handle::new(affine * local(corner), HandleKind::Corner(corner)))
        .collect();

    // The rotation handle must stay above the element even when it is
    // flipped vertically, so it is placed from the center with rotation only.
    let rotation = element.transform.rotation.to_radians();
    let reach = h / 2.0 + ROTATE_HANDLE_OFFSET;
    let center = element.center();
    handles.push(Handle::new(
        Point::new(center.x + reach * rotation.sin(), center.y - reach * rotation.cos()),
        HandleKind::Rotate,
    ));
    handles
}

/// Find which handle (if any) is hit at the given point.
/// The rotation handle wins over corners when both are in range.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    let handles = get_handles(element);
    handles
        .iter()
        .find(|h| h.kind == HandleKind::Rotate && h.hit_test(point, tolerance))
        .or_else(|| handles.iter().find(|h| h.hit_test(point, tolerance)))
        .map(|h| h.kind)
}

/// Ordered set of selected element ids on the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Select an element. Additive selection toggles membership;
    /// otherwise the selection becomes exactly `{id}`.
    /// Ids that are not on `page` are ignored.
    pub fn select(&mut self, page: &Page, id: ElementId, additive: bool) {
        if !page.contains(id) {
            return;
        }
        if additive {
            if let Some(pos) = self.ids.iter().position(|&e| e == id) {
                self.ids.remove(pos);
            } else {
                self.ids.push(id);
            }
        } else {
            self.ids.clear();
            self.ids.push(id);
        }
    }

    /// Replace the selection, keeping only ids present on `page`.
    pub fn set(&mut self, page: &Page, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            if page.contains(id) && !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }

    /// Select every element on the page, in paint order.
    pub fn select_all(&mut self, page: &Page) {
        self.ids = page.paint_order_ids();
    }

    /// Drop ids that no longer exist on `page`.
    pub fn retain_on(&mut self, page: &Page) {
        self.ids.retain(|&id| page.contains(id));
    }

    /// Snapshots of the selected elements that still exist on `page`.
    pub fn selected_elements(&self, page: &Page) -> Vec<Element> {
        self.ids.iter().filter_map(|&id| page.element(id)).cloned().collect()
    }
}
