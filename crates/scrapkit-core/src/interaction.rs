//! Canvas interaction state machine.
//!
//! Turns pointer and keyboard input into editor operations. At most one
//! gesture is active at a time, and each gesture becomes a single undo entry
//! when it ends.

use crate::editor::Editor;
use crate::elements::ElementId;
use crate::input::{Key, Modifiers, MouseButton, PointerEvent};
use crate::selection::HandleKind;
use crate::shortcuts::{ShortcutAction, resolve};
use crate::tools::ToolKind;
use crate::transform::{DragState, ResizeState, RotateState};
use kurbo::{Point, Vec2};

/// The gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
    Rotating(RotateState),
    Panning {
        /// Last applied pointer position (screen).
        last: Point,
    },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging(_) => "dragging",
            Gesture::Resizing(_) => "resizing",
            Gesture::Rotating(_) => "rotating",
            Gesture::Panning { .. } => "panning",
        }
    }
}

/// Routes input for one editor.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
    tool: ToolKind,
    text_input_focused: bool,
    /// Latest pointer move not yet applied, with the modifiers held.
    pending_move: Option<(Point, Modifiers)>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools, ending any active gesture first.
    pub fn set_tool(&mut self, editor: &mut Editor, tool: ToolKind) {
        if !self.is_idle() {
            self.finish(editor);
        }
        self.tool = tool;
    }

    /// Tell the controller whether a text-editing control has focus.
    /// Shortcuts are ignored while it does.
    pub fn set_text_input_focus(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer_event(&mut self, editor: &mut Editor, event: PointerEvent, modifiers: Modifiers) -> bool {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(editor, position, button, modifiers),
            PointerEvent::Move { position } => {
                self.pointer_move(position, modifiers);
                false
            }
            PointerEvent::Up { position, .. } => self.pointer_up(editor, position, modifiers),
            PointerEvent::Scroll { position, delta } => self.scroll(editor, position, delta, modifiers),
        }
    }

    /// Start a gesture or update the selection.
    /// Returns false if the press was ignored.
    pub fn pointer_down(&mut self, editor: &mut Editor, position: Point, button: MouseButton, modifiers: Modifiers) -> bool {
        if !self.is_idle() {
            log::debug!("Ignoring pointer down while {}", self.gesture.name());
            return false;
        }

        match (button, self.tool) {
            (MouseButton::Middle, _) | (MouseButton::Left, ToolKind::Pan) => {
                self.gesture = Gesture::Panning { last: position };
                log::debug!("Gesture: panning");
                true
            }
            (MouseButton::Left, ToolKind::Select) => self.select_down(editor, position, modifiers),
            (MouseButton::Right, _) => false,
        }
    }

    fn select_down(&mut self, editor: &mut Editor, position: Point, modifiers: Modifiers) -> bool {
        if editor.current_page().is_none() {
            return false;
        }

        if !modifiers.shift {
            if let Some((id, handle)) = editor.handle_at_screen(position) {
                return self.start_handle_gesture(editor, id, handle, position);
            }
        }

        let Some(id) = editor.element_at_screen(position) else {
            if !modifiers.shift {
                editor.deselect_all();
            }
            return true;
        };

        if modifiers.shift {
            editor.select_element(id, true);
        } else if !editor.selection().contains(id) {
            editor.select_element(id, false);
        }
        if !editor.selection().contains(id) {
            return true;
        }

        let originals: Vec<(ElementId, Point)> = editor
            .selected_elements()
            .into_iter()
            .filter(|e| !e.locked)
            .map(|e| (e.id(), e.position))
            .collect();
        if originals.is_empty() || !editor.begin_gesture() {
            return true;
        }
        log::debug!("Gesture: dragging {} element(s)", originals.len());
        self.gesture = Gesture::Dragging(DragState::new(position, originals));
        true
    }

    fn start_handle_gesture(&mut self, editor: &mut Editor, id: ElementId, handle: HandleKind, position: Point) -> bool {
        let Some(element) = editor.current_page().and_then(|p| p.element(id)).cloned() else {
            return false;
        };
        if element.locked || !editor.begin_gesture() {
            return false;
        }
        self.gesture = match handle {
            HandleKind::Corner(corner) => {
                log::debug!("Gesture: resizing from {}", corner.as_str());
                Gesture::Resizing(ResizeState::new(&element, corner, position))
            }
            HandleKind::Rotate => {
                log::debug!("Gesture: rotating");
                Gesture::Rotating(RotateState::new(&element))
            }
        };
        true
    }

    /// Record the latest pointer position. It is applied on the next
    /// [`InteractionController::animation_frame`] or pointer up.
    pub fn pointer_move(&mut self, position: Point, modifiers: Modifiers) {
        if !self.is_idle() {
            self.pending_move = Some((position, modifiers));
        }
    }

    /// Apply the pending pointer move, if any. Returns true if it was applied.
    pub fn animation_frame(&mut self, editor: &mut Editor) -> bool {
        match self.pending_move.take() {
            Some((position, modifiers)) => {
                self.apply_move(editor, position, modifiers);
                true
            }
            None => false,
        }
    }

    /// Apply the final position and end the gesture.
    /// Returns true if the document changed.
    pub fn pointer_up(&mut self, editor: &mut Editor, position: Point, modifiers: Modifiers) -> bool {
        if self.is_idle() {
            return false;
        }
        self.pending_move = None;
        self.apply_move(editor, position, modifiers);
        self.finish(editor)
    }

    /// End the active gesture, keeping whatever it has done so far.
    pub fn cancel(&mut self, editor: &mut Editor) -> bool {
        if self.is_idle() {
            return false;
        }
        self.finish(editor)
    }

    fn finish(&mut self, editor: &mut Editor) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        self.pending_move = None;
        let committed = editor.end_gesture();
        log::debug!("Gesture: {} ended (committed: {})", gesture.name(), committed);
        committed
    }

    fn apply_move(&mut self, editor: &mut Editor, position: Point, modifiers: Modifiers) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging(state) => {
                state.current_pointer = position;
                let targets = state.positions(&editor.viewport, editor.grid());
                if let Some(page) = editor.gesture_page_mut() {
                    for (id, target) in targets {
                        if let Some(element) = page.element_mut(id) {
                            element.position = target;
                        }
                    }
                }
            }
            Gesture::Resizing(state) => {
                state.current_pointer = position;
                let (target_position, target_size) = state.geometry(&editor.viewport, editor.config().min_element_size);
                if let Some(element) = editor.gesture_page_mut().and_then(|p| p.element_mut(state.element_id)) {
                    element.position = target_position;
                    element.size = target_size;
                }
            }
            Gesture::Rotating(state) => {
                let snap = modifiers.shift.then_some(editor.config().rotation_snap_degrees);
                let rotation = state.rotation(position, &editor.viewport, snap);
                if let Some(element) = editor.gesture_page_mut().and_then(|p| p.element_mut(state.element_id)) {
                    element.transform.rotation = rotation;
                }
            }
            Gesture::Panning { last } => {
                editor.viewport.pan(position - *last);
                *last = position;
            }
        }
    }

    /// Wheel input: pans, or zooms around the pointer with the command key held.
    pub fn scroll(&mut self, editor: &mut Editor, position: Point, delta: Vec2, modifiers: Modifiers) -> bool {
        if modifiers.command() {
            if delta.y < 0.0 {
                editor.zoom_in(position);
            } else if delta.y > 0.0 {
                editor.zoom_out(position);
            }
        } else {
            editor.viewport.pan(-delta);
        }
        true
    }

    /// Handle a key press. Returns true if it triggered a command.
    pub fn key_down(&mut self, editor: &mut Editor, key: Key, modifiers: Modifiers) -> bool {
        if self.text_input_focused {
            log::debug!("Ignoring {:?}: text input has focus", key);
            return false;
        }
        let Some(action) = resolve(key, modifiers) else {
            return false;
        };

        if !self.is_idle() {
            if action == ShortcutAction::Escape {
                self.finish(editor);
                return true;
            }
            log::debug!("Ignoring {:?} while {}", action, self.gesture.name());
            return false;
        }

        match action {
            ShortcutAction::DeleteSelected => editor.delete_selected() > 0,
            ShortcutAction::Copy => editor.copy() > 0,
            ShortcutAction::Cut => editor.cut() > 0,
            ShortcutAction::Paste => !editor.paste().is_empty(),
            ShortcutAction::Undo => editor.undo(),
            ShortcutAction::Redo => editor.redo(),
            ShortcutAction::SelectAll => {
                editor.select_all();
                true
            }
            ShortcutAction::Duplicate => !editor.duplicate_selected().is_empty(),
            ShortcutAction::Escape => {
                editor.deselect_all();
                true
            }
            ShortcutAction::Nudge { direction, large } => {
                let step = editor.config().nudge_step * if large { 10.0 } else { 1.0 };
                editor.move_selected_by(direction.unit() * step)
            }
        }
    }
}
