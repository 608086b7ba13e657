//! Per-page paint order.
//!
//! `z_index` is the primary key; ties fall back to the element's position in
//! `Page::elements`, so the order is total and stable.

use crate::elements::{Element, ElementId};
use crate::page::Page;

impl Page {
    /// Elements back to front.
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        // sort_by_key is stable, so insertion order breaks ties.
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// Element ids back to front.
    pub fn paint_order_ids(&self) -> Vec<ElementId> {
        self.paint_order().into_iter().map(|e| e.id()).collect()
    }

    pub fn max_z_index(&self) -> Option<i64> {
        self.elements.iter().map(|e| e.z_index).max()
    }

    pub fn min_z_index(&self) -> Option<i64> {
        self.elements.iter().map(|e| e.z_index).min()
    }

    /// z_index for an element placed above everything on the page.
    pub fn next_z_index(&self) -> i64 {
        self.max_z_index().map_or(0, |z| z + 1)
    }

    /// Rewrite z indices as 0..n in current paint order.
    pub fn normalize_z_order(&mut self) {
        let ids = self.paint_order_ids();
        for (z, id) in ids.into_iter().enumerate() {
            if let Some(element) = self.element_mut(id) {
                element.z_index = z as i64;
            }
        }
    }

    /// Bring an element to the front (topmost).
    /// Returns false if it is missing or already alone at the front.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(z) = self.element(id).map(|e| e.z_index) else {
            return false;
        };
        let others_max = self.elements.iter().filter(|e| e.id() != id).map(|e| e.z_index).max();
        match others_max {
            Some(max) if max >= z => {
                if let Some(element) = self.element_mut(id) {
                    element.z_index = max + 1;
                }
                true
            }
            _ => false,
        }
    }

    /// Send an element to the back (bottommost).
    /// Returns false if it is missing or already alone at the back.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let Some(z) = self.element(id).map(|e| e.z_index) else {
            return false;
        };
        let others_min = self.elements.iter().filter(|e| e.id() != id).map(|e| e.z_index).min();
        match others_min {
            Some(min) if min <= z => {
                if let Some(element) = self.element_mut(id) {
                    element.z_index = min - 1;
                }
                true
            }
            _ => false,
        }
    }

    /// Move an element one layer forward (towards front).
    /// Returns true if the element was moved, false if already at front.
    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.swap_with_neighbor(id, 1)
    }

    /// Move an element one layer backward (towards back).
    /// Returns true if the element was moved, false if already at back.
    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.swap_with_neighbor(id, -1)
    }

    fn swap_with_neighbor(&mut self, id: ElementId, direction: isize) -> bool {
        let order = self.paint_order_ids();
        let Some(pos) = order.iter().position(|&e| e == id) else {
            return false;
        };
        let Some(neighbor_pos) = pos.checked_add_signed(direction).filter(|&p| p < order.len()) else {
            return false;
        };
        let neighbor = order[neighbor_pos];

        let z_of = |page: &Page, id: ElementId| page.element(id).map(|e| e.z_index);
        if z_of(self, id) == z_of(self, neighbor) {
            // Equal keys can't be swapped meaningfully; spread them out first.
            self.normalize_z_order();
        }

        let (Some(z_self), Some(z_neighbor)) = (z_of(self, id), z_of(self, neighbor)) else {
            return false;
        };
        if let Some(element) = self.element_mut(id) {
            element.z_index = z_neighbor;
        }
        if let Some(element) = self.element_mut(neighbor) {
            element.z_index = z_self;
        }
        true
    }
}
