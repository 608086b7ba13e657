//! Process-local element clipboard.

use crate::elements::Element;
use kurbo::Vec2;

/// Offset applied per paste, in document units.
pub const PASTE_OFFSET: f64 = 20.0;

/// Single-slot clipboard holding deep copies of elements.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    contents: Vec<Element>,
    /// Pastes since the last copy; each one lands further from the original.
    paste_count: u32,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot with copies of `elements`, kept in paint order.
    pub fn copy(&mut self, elements: impl IntoIterator<Item = Element>) {
        let mut contents: Vec<Element> = elements.into_iter().collect();
        contents.sort_by_key(|e| e.z_index);
        self.contents = contents;
        self.paste_count = 0;
    }

    pub fn contents(&self) -> &[Element] {
        &self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn paste_count(&self) -> u32 {
        self.paste_count
    }

    pub fn clear(&mut self) {
        self.contents.clear();
        self.paste_count = 0;
    }

    /// Produce the next batch of elements to paste.
    ///
    /// Every element gets a fresh id, is offset by `offset` times the number
    /// of pastes so far and receives sequential z indices starting at
    /// `base_z`. Returns an empty list when the slot is empty.
    pub fn prepare_paste(&mut self, base_z: i64, offset: f64) -> Vec<Element> {
        if self.contents.is_empty() {
            return Vec::new();
        }
        self.paste_count += 1;
        let shift = offset * f64::from(self.paste_count);
        prepare_copies(&self.contents, base_z, Vec2::new(shift, shift))
    }
}

/// Clone elements with fresh ids, shifted by `offset` and restacked from
/// `base_z` upwards in their current relative order.
pub fn prepare_copies(elements: &[Element], base_z: i64, offset: Vec2) -> Vec<Element> {
    let mut ordered: Vec<&Element> = elements.iter().collect();
    ordered.sort_by_key(|e| e.z_index);
    ordered
        .into_iter()
        .zip(base_z..)
        .map(|(original, z)| {
            let mut copy = original.clone();
            copy.regenerate_id();
            copy.position += offset;
            copy.z_index = z;
            copy
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeType;
    use kurbo::Point;

    fn sample() -> Vec<Element> {
        let mut back = Element::shape(ShapeType::Star, Point::new(10.0, 10.0));
        back.z_index = 7;
        let mut front = Element::text("front", Point::new(50.0, 50.0));
        front.z_index = 9;
        vec![front, back]
    }

    #[test]
    fn test_copy_orders_by_z() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(sample());
        let zs: Vec<i64> = clipboard.contents().iter().map(|e| e.z_index).collect();
        assert_eq!(zs, vec![7, 9]);
    }

    #[test]
    fn test_paste_fresh_ids_and_offsets() {
        let originals = sample();
        let mut clipboard = Clipboard::new();
        clipboard.copy(originals.clone());

        let first = clipboard.prepare_paste(3, PASTE_OFFSET);
        assert_eq!(first.len(), 2);
        for pasted in &first {
            assert!(originals.iter().all(|o| o.id() != pasted.id()));
        }
        assert_eq!(first[0].z_index, 3);
        assert_eq!(first[1].z_index, 4);
        assert!((first[0].position.x - 30.0).abs() < f64::EPSILON);

        let second = clipboard.prepare_paste(5, PASTE_OFFSET);
        assert!((second[0].position.x - 50.0).abs() < f64::EPSILON);
        assert_ne!(first[0].id(), second[0].id());
    }

    #[test]
    fn test_copy_resets_paste_count() {
        let mut clipboard = Clipboard::new();
        clipboard.copy(sample());
        clipboard.prepare_paste(0, PASTE_OFFSET);
        clipboard.prepare_paste(0, PASTE_OFFSET);
        assert_eq!(clipboard.paste_count(), 2);
        clipboard.copy(sample());
        assert_eq!(clipboard.paste_count(), 0);
    }

    #[test]
    fn test_empty_paste() {
        let mut clipboard = Clipboard::new();
        assert!(clipboard.prepare_paste(0, PASTE_OFFSET).is_empty());
        assert_eq!(clipboard.paste_count(), 0);
    }
}
