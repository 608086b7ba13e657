//! Read-only view of a page for the rendering layer.

use crate::elements::Element;
use crate::page::Page;
use crate::transform::element_affine;
use kurbo::{Affine, Rect};

/// One element ready to paint.
#[derive(Debug, Clone, Copy)]
pub struct RenderItem<'a> {
    pub element: &'a Element,
    /// Element-local to document transform.
    pub transform: Affine,
    pub opacity: f64,
}

impl RenderItem<'_> {
    /// Screen-space transform for the given view transform.
    pub fn screen_transform(&self, view: Affine) -> Affine {
        view * self.transform
    }

    /// Axis-aligned document bounds of the painted element.
    pub fn bounds(&self) -> Rect {
        self.element.transformed_bounds()
    }
}

/// Visible elements of a page, back to front.
pub fn paint_list(page: &Page) -> Vec<RenderItem<'_>> {
    page.paint_order()
        .into_iter()
        .filter(|e| e.visible)
        .map(|element| RenderItem {
            element,
            transform: element_affine(element),
            opacity: element.opacity,
        })
        .collect()
}
