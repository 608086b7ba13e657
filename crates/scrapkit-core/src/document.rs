//! Scrapbook document: the full multi-page structure.

use crate::elements::{Element, ElementId};
use crate::error::{EditorError, EditorResult};
use crate::page::{Page, PageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Physical size shared by new pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    pub name: String,
}

impl PageSize {
    pub fn new(width: f64, height: f64, name: impl Into<String>) -> Self {
        Self {
            width,
            height,
            name: name.into(),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::new(1080.0, 1080.0, "Square")
    }
}

/// A scrapbook document containing all pages and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scrapbook {
    pub(crate) id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub page_size: PageSize,
    pub pages: Vec<Page>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,
}

impl Scrapbook {
    /// Create a scrapbook with a single empty page.
    pub fn new(title: impl Into<String>, page_size: PageSize) -> Self {
        let now = Utc::now();
        let mut scrapbook = Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            page_size,
            pages: Vec::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            is_public: false,
        };
        scrapbook.add_page();
        scrapbook
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Mark the document as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn page_index(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == id)
    }

    /// Append an empty page and return its index.
    pub fn add_page(&mut self) -> usize {
        self.insert_page(self.pages.len())
    }

    /// Insert an empty page at `index` (clamped) and return where it landed.
    fn insert_page(&mut self, index: usize) -> usize {
        let index = index.min(self.pages.len());
        let name = format!("Page {}", self.pages.len() + 1);
        self.pages.insert(index, Page::new(name, &self.page_size));
        self.renumber_pages();
        index
    }

    /// Duplicate the page at `index`, inserting the copy right after it.
    /// Returns the index of the copy.
    pub fn duplicate_page(&mut self, index: usize) -> Option<usize> {
        let copy = self.pages.get(index)?.duplicate();
        self.pages.insert(index + 1, copy);
        self.renumber_pages();
        Some(index + 1)
    }

    /// Delete the page at `index` along with its elements.
    /// The last remaining page is never deleted.
    pub fn delete_page(&mut self, index: usize) -> Option<Page> {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return None;
        }
        let page = self.pages.remove(index);
        self.renumber_pages();
        Some(page)
    }

    /// Move a page from one position to another.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from >= self.pages.len() || to >= self.pages.len() || from == to {
            return false;
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.renumber_pages();
        true
    }

    fn renumber_pages(&mut self) {
        for (order, page) in self.pages.iter_mut().enumerate() {
            page.order = order;
        }
    }

    /// Find an element anywhere in the document.
    /// Returns the page index along with the element.
    pub fn find_element(&self, id: ElementId) -> Option<(usize, &Element)> {
        self.pages
            .iter()
            .enumerate()
            .find_map(|(index, page)| page.element(id).map(|e| (index, e)))
    }

    pub fn contains_element(&self, id: ElementId) -> bool {
        self.find_element(id).is_some()
    }

    /// Total number of elements across all pages.
    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|p| p.len()).sum()
    }

    /// All element ids in the document.
    pub fn element_ids(&self) -> HashSet<ElementId> {
        self.pages.iter().flat_map(|p| p.elements.iter().map(|e| e.id())).collect()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON.
    ///
    /// Elements with an unrecognized type tag are logged and skipped instead of
    /// failing the whole load. The result is repaired so that it has at least
    /// one page and unique ids.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;

        let pages = value
            .get_mut("pages")
            .and_then(|p| p.as_array_mut())
            .ok_or_else(|| EditorError::InvalidDocument("Missing 'pages' array".to_string()))?;

        for (page_index, page) in pages.iter_mut().enumerate() {
            if let Some(elements) = page.get_mut("elements").and_then(|e| e.as_array_mut()) {
                elements.retain(|element| {
                    match serde_json::from_value::<Element>(element.clone()) {
                        Ok(_) => true,
                        Err(e) => {
                            let tag = element.get("type").and_then(|t| t.as_str()).unwrap_or("<none>");
                            log::error!("Skipping element of type '{}' on page {}: {}", tag, page_index, e);
                            false
                        }
                    }
                });
            }
        }

        let mut scrapbook: Scrapbook = serde_json::from_value(value)?;
        scrapbook.repair();
        Ok(scrapbook)
    }

    /// Restore document invariants after loading external data.
    fn repair(&mut self) {
        if self.pages.is_empty() {
            log::warn!("Scrapbook '{}' has no pages, adding an empty one", self.title);
            self.add_page();
        }

        let mut page_ids = HashSet::new();
        let mut element_ids = HashSet::new();
        for page in &mut self.pages {
            if !page_ids.insert(page.id) {
                log::warn!("Duplicate page id {} regenerated", page.id);
                page.id = Uuid::new_v4();
                page_ids.insert(page.id);
            }
            for element in &mut page.elements {
                if !element_ids.insert(element.id()) {
                    log::warn!("Duplicate element id {} regenerated", element.id());
                    element.regenerate_id();
                    element_ids.insert(element.id());
                }
                element.normalize();
            }
        }
        self.renumber_pages();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeType;
    use kurbo::Point;

    #[test]
    fn test_new_scrapbook_has_one_page() {
        let scrapbook = Scrapbook::new("Summer", PageSize::default());
        assert_eq!(scrapbook.page_count(), 1);
        assert!((scrapbook.pages[0].width - 1080.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_page_order_is_renumbered() {
        let mut scrapbook = Scrapbook::new("Summer", PageSize::default());
        scrapbook.add_page();
        scrapbook.insert_page(0);
        let orders: Vec<usize> = scrapbook.pages.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let first = scrapbook.pages[0].id();
        assert!(scrapbook.move_page(0, 2));
        assert_eq!(scrapbook.page_index(first), Some(2));
        assert_eq!(scrapbook.pages[2].order, 2);
    }

    #[test]
    fn test_cannot_delete_last_page() {
        let mut scrapbook = Scrapbook::new("Summer", PageSize::default());
        assert!(scrapbook.delete_page(0).is_none());
        scrapbook.add_page();
        assert!(scrapbook.delete_page(0).is_some());
        assert_eq!(scrapbook.page_count(), 1);
    }

    #[test]
    fn test_duplicate_page_inserts_after() {
        let mut scrapbook = Scrapbook::new("Summer", PageSize::default());
        scrapbook.pages[0].add_element(Element::text("a", Point::ZERO));
        scrapbook.add_page();

        assert_eq!(scrapbook.duplicate_page(0), Some(1));
        assert_eq!(scrapbook.page_count(), 3);
        assert_eq!(scrapbook.pages[1].len(), 1);
        assert_eq!(scrapbook.element_ids().len(), 2);
        assert_eq!(scrapbook.duplicate_page(7), None);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut scrapbook = Scrapbook::new("Trip", PageSize::default());
        scrapbook.pages[0].add_element(Element::shape(ShapeType::Circle, Point::new(5.0, 5.0)));
        let json = scrapbook.to_json().unwrap();
        let loaded = Scrapbook::from_json(&json).unwrap();
        assert_eq!(loaded, scrapbook);
    }

    #[test]
    fn test_load_skips_unknown_element_types() {
        let mut scrapbook = Scrapbook::new("Trip", PageSize::default());
        let keep = scrapbook.pages[0].add_element(Element::text("keep", Point::ZERO));
        let mut value = serde_json::to_value(&scrapbook).unwrap();
        let mut bogus = serde_json::to_value(Element::text("drop", Point::ZERO)).unwrap();
        bogus["type"] = serde_json::Value::String("hologram".to_string());
        value["pages"][0]["elements"].as_array_mut().unwrap().push(bogus);

        let loaded = Scrapbook::from_json(&value.to_string()).unwrap();
        assert_eq!(loaded.pages[0].element_ids(), vec![keep]);
    }

    #[test]
    fn test_load_repairs_document() {
        let mut scrapbook = Scrapbook::new("Trip", PageSize::default());
        let el = Element::text("twin", Point::ZERO);
        scrapbook.pages[0].add_element(el.clone());
        scrapbook.pages[0].add_element(el);
        let mut value = serde_json::to_value(&scrapbook).unwrap();
        value["pages"][0]["elements"][0]["opacity"] = serde_json::json!(3.0);

        let loaded = Scrapbook::from_json(&value.to_string()).unwrap();
        assert_eq!(loaded.element_ids().len(), 2);
        assert!((loaded.pages[0].elements[0].opacity - 1.0).abs() < f64::EPSILON);

        value["pages"] = serde_json::json!([]);
        let loaded = Scrapbook::from_json(&value.to_string()).unwrap();
        assert_eq!(loaded.page_count(), 1);
    }

    #[test]
    fn test_load_requires_pages() {
        assert!(matches!(
            Scrapbook::from_json(r#"{ "title": "x" }"#),
            Err(EditorError::InvalidDocument(_))
        ));
        assert!(matches!(Scrapbook::from_json("nope"), Err(EditorError::Serialization(_))));
    }
}
