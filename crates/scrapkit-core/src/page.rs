//! Pages: one canvas surface with a background and its elements.

use crate::document::PageSize;
use crate::elements::{Element, ElementId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

/// A color stop; `position` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: SerializableColor,
    pub position: f64,
}

/// Page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Solid {
        color: SerializableColor,
    },
    Gradient {
        gradient_type: GradientType,
        /// Angle in degrees (linear gradients only).
        angle: f64,
        colors: Vec<GradientStop>,
    },
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid {
            color: SerializableColor::white(),
        }
    }
}

impl Background {
    /// Linear gradient between two colors.
    pub fn linear(angle: f64, from: SerializableColor, to: SerializableColor) -> Self {
        Background::Gradient {
            gradient_type: GradientType::Linear,
            angle,
            colors: vec![
                GradientStop { color: from, position: 0.0 },
                GradientStop { color: to, position: 1.0 },
            ],
        }
    }

    /// Sort gradient stops and clamp their positions into [0, 1].
    pub fn normalized(mut self) -> Self {
        if let Background::Gradient { colors, .. } = &mut self {
            for stop in colors.iter_mut() {
                stop.position = stop.position.clamp(0.0, 1.0);
            }
            colors.sort_by(|a, b| a.position.total_cmp(&b.position));
        }
        self
    }
}

/// One page of a scrapbook.
///
/// `elements` keeps insertion order, which breaks ties between equal
/// `z_index` values when painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub(crate) id: PageId,
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// Position of the page in its scrapbook.
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    /// Create an empty page.
    pub fn new(name: impl Into<String>, size: &PageSize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width: size.width,
            height: size.height,
            order: 0,
            background: Background::default(),
            elements: Vec::new(),
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// Page rectangle in document coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Deep copy with a new page id and new element ids.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.name = format!("{} (copy)", self.name);
        for element in &mut copy.elements {
            element.regenerate_id();
        }
        copy
    }

    /// Append an element and return its id. Its z_index is left as given.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        self.elements.push(element);
        id
    }

    /// Remove an element from the page.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    /// Get an element by ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Element ids in insertion order.
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Find visible elements at a point (in document coordinates),
    /// front to back.
    pub fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .filter(|e| e.visible && e.hit_test(point))
            .map(|e| e.id())
            .collect()
    }

    /// Topmost visible element at a point.
    pub fn element_at_point(&self, point: Point) -> Option<ElementId> {
        self.elements_at_point(point).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeType;

    fn page() -> Page {
        Page::new("Page 1", &PageSize::default())
    }

    #[test]
    fn test_page_inherits_size() {
        let size = PageSize::new(800.0, 600.0, "Landscape");
        let page = Page::new("Cover", &size);
        assert!((page.width - 800.0).abs() < f64::EPSILON);
        assert!((page.height - 600.0).abs() < f64::EPSILON);
        assert!(page.is_empty());
    }

    #[test]
    fn test_add_remove_element() {
        let mut page = page();
        let id = page.add_element(Element::text("hi", Point::ZERO));
        assert_eq!(page.len(), 1);
        assert!(page.contains(id));
        assert!(page.remove_element(id).is_some());
        assert!(page.remove_element(id).is_none());
        assert!(page.is_empty());
    }

    #[test]
    fn test_duplicate_regenerates_ids() {
        let mut page = page();
        let a = page.add_element(Element::shape(ShapeType::Heart, Point::ZERO));
        let b = page.add_element(Element::photo("p.jpg", Point::ZERO));

        let copy = page.duplicate();
        assert_ne!(copy.id(), page.id());
        assert_eq!(copy.len(), 2);
        assert!(!copy.contains(a));
        assert!(!copy.contains(b));
        assert_eq!(copy.elements[0].kind, page.elements[0].kind);
    }

    #[test]
    fn test_elements_at_point_front_first() {
        let mut page = page();
        let mut back = Element::shape(ShapeType::Rectangle, Point::new(0.0, 0.0));
        back.z_index = 0;
        let mut front = Element::shape(ShapeType::Rectangle, Point::new(50.0, 50.0));
        front.z_index = 1;
        let back_id = page.add_element(back);
        let front_id = page.add_element(front);

        let hits = page.elements_at_point(Point::new(75.0, 75.0));
        assert_eq!(hits, vec![front_id, back_id]);

        let hits = page.elements_at_point(Point::new(25.0, 25.0));
        assert_eq!(hits, vec![back_id]);
    }

    #[test]
    fn test_hidden_elements_are_not_hit() {
        let mut page = page();
        let mut el = Element::sticker("s.png", "", Point::ZERO);
        el.visible = false;
        page.add_element(el);
        assert!(page.element_at_point(Point::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_background_normalized() {
        let bg = Background::Gradient {
            gradient_type: GradientType::Radial,
            angle: 0.0,
            colors: vec![
                GradientStop { color: SerializableColor::black(), position: 1.4 },
                GradientStop { color: SerializableColor::white(), position: 0.2 },
            ],
        }
        .normalized();
        match bg {
            Background::Gradient { colors, .. } => {
                assert!((colors[0].position - 0.2).abs() < f64::EPSILON);
                assert!((colors[1].position - 1.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected gradient"),
        }
    }
}
