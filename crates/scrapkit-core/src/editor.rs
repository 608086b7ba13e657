//! Editor state and the mutating operations on the open scrapbook.

use crate::clipboard::{Clipboard, prepare_copies};
use crate::config::EditorConfig;
use crate::document::Scrapbook;
use crate::elements::{Element, ElementId};
use crate::history::History;
use crate::page::{Background, Page};
use crate::selection::{Corner, HandleKind, Selection, hit_test_handles};
use crate::transform::{normalize_degrees, resize_transformed};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};

/// Editor state captured for undo/redo.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub scrapbook: Scrapbook,
    pub current_page: usize,
}

/// An open scrapbook together with its editing state (not persisted).
///
/// Every mutating operation records at most one undo entry and only when the
/// document actually changed. Operations without an open scrapbook, or on
/// ids missing from the current page, are no-ops.
#[derive(Debug, Clone)]
pub struct Editor {
    scrapbook: Option<Scrapbook>,
    current_page: usize,
    selection: Selection,
    clipboard: Clipboard,
    /// View transform for the canvas.
    pub viewport: Viewport,
    history: History<EditorSnapshot>,
    config: EditorConfig,
    /// State at the start of the open gesture, if any.
    gesture_start: Option<EditorSnapshot>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with no scrapbook loaded.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scrapbook: None,
            current_page: 0,
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            viewport: Viewport::from_config(&config),
            history: History::new(config.max_history),
            config,
            gesture_start: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Turn grid snapping for drags on or off.
    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.config.snap_to_grid = enabled;
    }

    /// Grid size to snap to, if snapping is enabled.
    pub fn grid(&self) -> Option<f64> {
        self.config.snap_to_grid.then_some(self.config.grid_size)
    }

    // --- Lifecycle ---

    /// Open a scrapbook, replacing any open one. History, selection and clipboard are reset.
    pub fn load(&mut self, scrapbook: Scrapbook) {
        log::info!(
            "Loaded scrapbook '{}' ({} pages, {} elements)",
            scrapbook.title,
            scrapbook.page_count(),
            scrapbook.element_count()
        );
        self.scrapbook = Some(scrapbook);
        self.current_page = 0;
        self.selection.deselect_all();
        self.clipboard.clear();
        self.history.clear();
        self.gesture_start = None;
    }

    /// Create and open a new scrapbook with the configured page size.
    pub fn new_scrapbook(&mut self, title: impl Into<String>) {
        let scrapbook = Scrapbook::new(title, self.config.default_page_size.clone());
        self.load(scrapbook);
    }

    /// Close the open scrapbook and return it.
    pub fn close(&mut self) -> Option<Scrapbook> {
        let scrapbook = self.scrapbook.take()?;
        log::info!("Closed scrapbook '{}'", scrapbook.title);
        self.current_page = 0;
        self.selection.deselect_all();
        self.clipboard.clear();
        self.history.clear();
        self.gesture_start = None;
        Some(scrapbook)
    }

    pub fn scrapbook(&self) -> Option<&Scrapbook> {
        self.scrapbook.as_ref()
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    /// The page being edited, if a scrapbook is open.
    pub fn current_page(&self) -> Option<&Page> {
        self.scrapbook.as_ref()?.page(self.current_page)
    }

    fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.scrapbook.as_mut()?.page_mut(self.current_page)
    }

    /// Switch to another page. Clears the selection.
    pub fn set_current_page(&mut self, index: usize) -> bool {
        let in_range = self.scrapbook.as_ref().is_some_and(|s| index < s.page_count());
        if !in_range || index == self.current_page {
            return false;
        }
        self.current_page = index;
        self.selection.deselect_all();
        true
    }

    fn clamp_current_page(&mut self) {
        let count = self.scrapbook.as_ref().map_or(0, |s| s.page_count());
        self.current_page = self.current_page.min(count.saturating_sub(1));
    }

    // --- History ---

    fn snapshot(&self) -> Option<EditorSnapshot> {
        self.scrapbook.as_ref().map(|scrapbook| EditorSnapshot {
            scrapbook: scrapbook.clone(),
            current_page: self.current_page,
        })
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.scrapbook = Some(snapshot.scrapbook);
        self.current_page = snapshot.current_page;
        self.clamp_current_page();
        self.prune_selection();
    }

    /// Run a mutation and record the prior state if the document changed.
    fn record<R>(&mut self, action: &str, apply: impl FnOnce(&mut Self) -> R) -> R {
        let before = self.snapshot();
        let result = apply(self);
        if let Some(before) = before {
            self.commit(before, action);
        }
        result
    }

    /// Push `before` onto the undo stack if the document differs from it.
    /// Inside a gesture the change is folded into the gesture's entry.
    fn commit(&mut self, before: EditorSnapshot, action: &str) -> bool {
        let Some(scrapbook) = self.scrapbook.as_mut() else {
            return false;
        };
        if before.scrapbook == *scrapbook {
            return false;
        }
        scrapbook.touch();
        if self.gesture_start.is_none() {
            log::debug!("Recorded '{}'", action);
            self.history.push(before);
        }
        true
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.gesture_start.is_some() {
            return false;
        }
        let Some(current) = self.snapshot() else {
            return false;
        };
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.gesture_start.is_some() {
            return false;
        }
        let Some(current) = self.snapshot() else {
            return false;
        };
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of entries on the undo stack.
    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    // --- Gestures ---

    /// Open a gesture. Changes made until [`Editor::end_gesture`] form a
    /// single undo entry. Returns false if no scrapbook is open or a gesture
    /// is already open.
    pub fn begin_gesture(&mut self) -> bool {
        if self.gesture_start.is_some() {
            return false;
        }
        match self.snapshot() {
            Some(snapshot) => {
                self.gesture_start = Some(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_start.is_some()
    }

    /// Close the open gesture, recording one entry if the document changed.
    pub fn end_gesture(&mut self) -> bool {
        match self.gesture_start.take() {
            Some(before) => self.commit(before, "gesture"),
            None => false,
        }
    }

    /// Mutable access to the current page while a gesture is open.
    pub fn gesture_page_mut(&mut self) -> Option<&mut Page> {
        if self.gesture_start.is_none() {
            return None;
        }
        self.current_page_mut()
    }

    // --- Selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.selection.ids().to_vec()
    }

    /// Select an element on the current page; additive toggles it.
    pub fn select_element(&mut self, id: ElementId, additive: bool) {
        if let Some(page) = self.scrapbook.as_ref().and_then(|s| s.page(self.current_page)) {
            self.selection.select(page, id, additive);
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    pub fn select_all(&mut self) {
        if let Some(page) = self.scrapbook.as_ref().and_then(|s| s.page(self.current_page)) {
            self.selection.select_all(page);
        }
    }

    /// Snapshots of the selected elements that still exist.
    pub fn selected_elements(&self) -> Vec<Element> {
        self.current_page()
            .map(|page| self.selection.selected_elements(page))
            .unwrap_or_default()
    }

    fn set_selection(&mut self, ids: &[ElementId]) {
        if let Some(page) = self.scrapbook.as_ref().and_then(|s| s.page(self.current_page)) {
            self.selection.set(page, ids.iter().copied());
        }
    }

    fn prune_selection(&mut self) {
        match self.scrapbook.as_ref().and_then(|s| s.page(self.current_page)) {
            Some(page) => self.selection.retain_on(page),
            None => self.selection.deselect_all(),
        }
    }

    // --- Hit testing ---

    /// Topmost visible element under a screen point.
    pub fn element_at_screen(&self, screen_point: Point) -> Option<ElementId> {
        let point = self.viewport.screen_to_document(screen_point);
        self.current_page()?.element_at_point(point)
    }

    /// Handle of a selected, unlocked element under a screen point.
    pub fn handle_at_screen(&self, screen_point: Point) -> Option<(ElementId, HandleKind)> {
        let page = self.current_page()?;
        let point = self.viewport.screen_to_document(screen_point);
        let tolerance = self.config.handle_tolerance / self.viewport.zoom();
        self.selection.ids().iter().rev().find_map(|&id| {
            let element = page.element(id)?;
            hit_test_handles(element, point, tolerance).map(|kind| (id, kind))
        })
    }

    // --- Elements ---

    /// Add an element on top of the current page and select it.
    /// An element whose id is already in the scrapbook gets a fresh id.
    pub fn add_element(&mut self, mut element: Element) -> Option<ElementId> {
        if self.scrapbook.as_ref()?.contains_element(element.id()) {
            element.regenerate_id();
        }
        element.normalize();
        let id = self.record("add element", |editor| {
            let page = editor.current_page_mut()?;
            element.z_index = page.next_z_index();
            Some(page.add_element(element))
        })?;
        self.set_selection(&[id]);
        Some(id)
    }

    /// Edit an element's properties in place.
    pub fn update_element(&mut self, id: ElementId, edit: impl FnOnce(&mut Element)) -> bool {
        self.record("edit element", |editor| {
            let Some(element) = editor.current_page_mut().and_then(|p| p.element_mut(id)) else {
                return false;
            };
            edit(element);
            element.normalize();
            true
        })
    }

    /// Same as [`Editor::update_element`] but refused on locked elements.
    fn update_unlocked(&mut self, id: ElementId, action: &str, edit: impl FnOnce(&mut Element)) -> bool {
        self.record(action, |editor| {
            let Some(element) = editor.current_page_mut().and_then(|p| p.element_mut(id)) else {
                return false;
            };
            if element.locked {
                return false;
            }
            edit(element);
            element.normalize();
            true
        })
    }

    pub fn set_opacity(&mut self, id: ElementId, opacity: f64) -> bool {
        self.update_element(id, |e| e.set_opacity(opacity))
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> bool {
        self.update_element(id, |e| e.visible = visible)
    }

    pub fn toggle_lock(&mut self, id: ElementId) -> bool {
        self.update_element(id, |e| e.locked = !e.locked)
    }

    pub fn rename_element(&mut self, id: ElementId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.update_element(id, |e| e.name = name)
    }

    pub fn move_element(&mut self, id: ElementId, position: Point) -> bool {
        self.update_unlocked(id, "move", |e| e.position = position)
    }

    /// Resize from a corner by a document-space delta. The opposite corner
    /// stays where it is on the page, also for rotated elements.
    pub fn resize_element(&mut self, id: ElementId, corner: Corner, delta: Vec2) -> bool {
        let min_size = self.config.min_element_size;
        self.update_unlocked(id, "resize", |e| {
            let (position, size) = resize_transformed(e.position, e.size, &e.transform, corner, delta, min_size);
            e.position = position;
            e.size = size;
        })
    }

    pub fn set_size(&mut self, id: ElementId, size: Size) -> bool {
        let min = self.config.min_element_size;
        self.update_unlocked(id, "resize", |e| {
            e.size = Size::new(size.width.max(min), size.height.max(min));
        })
    }

    pub fn set_rotation(&mut self, id: ElementId, degrees: f64) -> bool {
        self.update_unlocked(id, "rotate", |e| e.transform.rotation = normalize_degrees(degrees))
    }

    /// Mirror an element around its center.
    pub fn flip_element(&mut self, id: ElementId, horizontal: bool) -> bool {
        self.update_unlocked(id, "flip", |e| {
            if horizontal {
                e.transform.flip_x = !e.transform.flip_x;
            } else {
                e.transform.flip_y = !e.transform.flip_y;
            }
        })
    }

    /// Mirror every selected unlocked element around its own center.
    pub fn flip_selected(&mut self, horizontal: bool) -> bool {
        let ids = self.selected_ids();
        self.record("flip", |editor| {
            let Some(page) = editor.current_page_mut() else {
                return false;
            };
            let mut flipped = false;
            for id in ids {
                if let Some(element) = page.element_mut(id).filter(|e| !e.locked) {
                    if horizontal {
                        element.transform.flip_x = !element.transform.flip_x;
                    } else {
                        element.transform.flip_y = !element.transform.flip_y;
                    }
                    flipped = true;
                }
            }
            flipped
        })
    }

    /// Move every selected unlocked element by a document-space delta.
    pub fn move_selected_by(&mut self, delta: Vec2) -> bool {
        let ids = self.selected_ids();
        self.record("nudge", |editor| {
            let Some(page) = editor.current_page_mut() else {
                return false;
            };
            let mut moved = false;
            for id in ids {
                if let Some(element) = page.element_mut(id).filter(|e| !e.locked) {
                    element.position += delta;
                    moved = true;
                }
            }
            moved
        })
    }

    pub fn delete_element(&mut self, id: ElementId) -> bool {
        let removed = self.record("delete element", |editor| {
            editor.current_page_mut().and_then(|p| p.remove_element(id)).is_some()
        });
        self.prune_selection();
        removed
    }

    /// Delete all selected elements. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        self.record("delete selection", |editor| editor.remove_selected())
    }

    fn remove_selected(&mut self) -> usize {
        let ids = self.selected_ids();
        let Some(page) = self.current_page_mut() else {
            return 0;
        };
        let removed = ids.into_iter().filter_map(|id| page.remove_element(id)).count();
        self.selection.deselect_all();
        removed
    }

    // --- Z-order ---

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.record("bring to front", |editor| {
            editor.current_page_mut().is_some_and(|p| p.bring_to_front(id))
        })
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.record("send to back", |editor| {
            editor.current_page_mut().is_some_and(|p| p.send_to_back(id))
        })
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.record("bring forward", |editor| {
            editor.current_page_mut().is_some_and(|p| p.bring_forward(id))
        })
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.record("send backward", |editor| {
            editor.current_page_mut().is_some_and(|p| p.send_backward(id))
        })
    }

    // --- Clipboard ---

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Copy the selection. Returns how many elements were copied.
    pub fn copy(&mut self) -> usize {
        let elements = self.selected_elements();
        if elements.is_empty() {
            return 0;
        }
        let count = elements.len();
        self.clipboard.copy(elements);
        count
    }

    /// Copy and delete the selection as one undo entry.
    pub fn cut(&mut self) -> usize {
        let count = self.copy();
        if count == 0 {
            return 0;
        }
        self.record("cut", |editor| editor.remove_selected());
        log::info!("Cut {} element(s)", count);
        count
    }

    /// Paste the clipboard onto the current page and select the copies.
    pub fn paste(&mut self) -> Vec<ElementId> {
        let Some(base_z) = self.current_page().map(|p| p.next_z_index()) else {
            return Vec::new();
        };
        let elements = self.clipboard.prepare_paste(base_z, self.config.paste_offset);
        if elements.is_empty() {
            return Vec::new();
        }
        let ids = self.insert_elements(elements, "paste");
        log::info!("Pasted {} element(s)", ids.len());
        ids
    }

    /// Duplicate the selection in place, leaving the clipboard untouched.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let selected = self.selected_elements();
        let Some(base_z) = self.current_page().map(|p| p.next_z_index()) else {
            return Vec::new();
        };
        if selected.is_empty() {
            return Vec::new();
        }
        let offset = self.config.paste_offset;
        let copies = prepare_copies(&selected, base_z, Vec2::new(offset, offset));
        self.insert_elements(copies, "duplicate")
    }

    fn insert_elements(&mut self, elements: Vec<Element>, action: &str) -> Vec<ElementId> {
        let ids: Vec<ElementId> = self.record(action, |editor| match editor.current_page_mut() {
            Some(page) => elements.into_iter().map(|e| page.add_element(e)).collect(),
            None => Vec::new(),
        });
        self.set_selection(&ids);
        ids
    }

    // --- Pages ---

    /// Append a page and switch to it. Returns its index.
    pub fn add_page(&mut self) -> Option<usize> {
        let index = self.record("add page", |editor| editor.scrapbook.as_mut().map(|s| s.add_page()))?;
        self.current_page = index;
        self.selection.deselect_all();
        Some(index)
    }

    /// Duplicate a page and switch to the copy.
    pub fn duplicate_page(&mut self, index: usize) -> Option<usize> {
        let copy = self.record("duplicate page", |editor| {
            editor.scrapbook.as_mut().and_then(|s| s.duplicate_page(index))
        })?;
        self.current_page = copy;
        self.selection.deselect_all();
        Some(copy)
    }

    /// Delete a page. The last remaining page cannot be deleted.
    pub fn delete_page(&mut self, index: usize) -> bool {
        let deleted = self.record("delete page", |editor| {
            editor.scrapbook.as_mut().and_then(|s| s.delete_page(index)).is_some()
        });
        if deleted {
            if index < self.current_page {
                self.current_page -= 1;
            } else if index == self.current_page {
                self.selection.deselect_all();
            }
            self.clamp_current_page();
        }
        deleted
    }

    /// Reorder pages; the current page stays current.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        let current_id = self.current_page().map(|p| p.id());
        let moved = self.record("move page", |editor| {
            editor.scrapbook.as_mut().is_some_and(|s| s.move_page(from, to))
        });
        if let (true, Some(id)) = (moved, current_id) {
            if let Some(index) = self.scrapbook.as_ref().and_then(|s| s.page_index(id)) {
                self.current_page = index;
            }
        }
        moved
    }

    pub fn rename_page(&mut self, index: usize, name: impl Into<String>) -> bool {
        let name = name.into();
        self.record("rename page", |editor| {
            match editor.scrapbook.as_mut().and_then(|s| s.page_mut(index)) {
                Some(page) => {
                    page.name = name;
                    true
                }
                None => false,
            }
        })
    }

    /// Replace the current page's background.
    pub fn set_background(&mut self, background: Background) -> bool {
        let background = background.normalized();
        self.record("background", |editor| match editor.current_page_mut() {
            Some(page) => {
                page.background = background;
                true
            }
            None => false,
        })
    }

    // --- Scrapbook metadata ---

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        self.update_scrapbook("title", |s| s.title = title)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        let description = description.into();
        self.update_scrapbook("description", |s| s.description = description)
    }

    pub fn set_tags(&mut self, tags: Vec<String>) -> bool {
        self.update_scrapbook("tags", |s| s.tags = tags)
    }

    pub fn set_public(&mut self, is_public: bool) -> bool {
        self.update_scrapbook("visibility", |s| s.is_public = is_public)
    }

    fn update_scrapbook(&mut self, action: &str, edit: impl FnOnce(&mut Scrapbook)) -> bool {
        self.record(action, |editor| match editor.scrapbook.as_mut() {
            Some(scrapbook) => {
                edit(scrapbook);
                true
            }
            None => false,
        })
    }

    // --- Viewport ---

    /// Zoom in one step around a screen point.
    pub fn zoom_in(&mut self, screen_point: Point) {
        self.viewport.zoom_in(screen_point, self.config.zoom_step);
    }

    /// Zoom out one step around a screen point.
    pub fn zoom_out(&mut self, screen_point: Point) {
        self.viewport.zoom_out(screen_point, self.config.zoom_step);
    }

    /// Fit the current page into a viewport of the given size.
    pub fn fit_page(&mut self, viewport_size: Size) {
        if let Some(bounds) = self.current_page().map(|p| p.bounds()) {
            self.viewport.fit_to_bounds(bounds, viewport_size, 50.0);
        }
    }
}
