//! Keyboard shortcut registry and documentation.

use crate::input::{Key, Modifiers};
use kurbo::Vec2;

/// Direction of an arrow-key nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in document space (y grows downwards).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Editor command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelected,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    SelectAll,
    Duplicate,
    /// End the active gesture, or clear the selection when idle.
    Escape,
    /// Move the selection; `large` multiplies the step by 10.
    Nudge { direction: Direction, large: bool },
}

/// Map a key press to an editor command.
pub fn resolve(key: Key, modifiers: Modifiers) -> Option<ShortcutAction> {
    if modifiers.command() {
        return match key.letter()? {
            'c' => Some(ShortcutAction::Copy),
            'x' => Some(ShortcutAction::Cut),
            'v' => Some(ShortcutAction::Paste),
            'z' if modifiers.shift => Some(ShortcutAction::Redo),
            'z' => Some(ShortcutAction::Undo),
            'y' => Some(ShortcutAction::Redo),
            'a' => Some(ShortcutAction::SelectAll),
            'd' => Some(ShortcutAction::Duplicate),
            _ => None,
        };
    }

    let nudge = |direction| {
        Some(ShortcutAction::Nudge {
            direction,
            large: modifiers.shift,
        })
    };
    match key {
        Key::Delete | Key::Backspace => Some(ShortcutAction::DeleteSelected),
        Key::Escape => Some(ShortcutAction::Escape),
        Key::ArrowUp => nudge(Direction::Up),
        Key::ArrowDown => nudge(Direction::Down),
        Key::ArrowLeft => nudge(Direction::Left),
        Key::ArrowRight => nudge(Direction::Right),
        Key::Char(_) => None,
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+C").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("A", true, false, "Select all elements on the page"),
            Shortcut::new("C", true, false, "Copy elements"),
            Shortcut::new("X", true, false, "Cut elements"),
            Shortcut::new("V", true, false, "Paste elements"),
            Shortcut::new("D", true, false, "Duplicate selected elements"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("Delete", false, false, "Delete selected elements"),
            Shortcut::new("Backspace", false, false, "Delete selected elements"),
            Shortcut::new("Escape", false, false, "Finish current action / clear selection"),
            Shortcut::new("Arrows", false, false, "Nudge selection"),
            Shortcut::new("Arrows", false, true, "Nudge selection 10x"),
            Shortcut::new("Rotate drag", false, true, "Snap rotation to 15 degrees"),
        ]
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_command_shortcuts() {
        assert_eq!(resolve(Key::Char('c'), Modifiers::CTRL), Some(ShortcutAction::Copy));
        assert_eq!(resolve(Key::Char('z'), Modifiers::CTRL), Some(ShortcutAction::Undo));
        let ctrl_shift = Modifiers { shift: true, ..Modifiers::CTRL };
        assert_eq!(resolve(Key::Char('Z'), ctrl_shift), Some(ShortcutAction::Redo));
        assert_eq!(resolve(Key::Char('y'), Modifiers::CTRL), Some(ShortcutAction::Redo));
        assert_eq!(resolve(Key::Char('q'), Modifiers::CTRL), None);
        assert_eq!(resolve(Key::Escape, Modifiers::CTRL), None);
    }

    #[test]
    fn test_plain_letters_do_nothing() {
        assert_eq!(resolve(Key::Char('c'), Modifiers::NONE), None);
    }

    #[test]
    fn test_resolve_keys() {
        assert_eq!(resolve(Key::Backspace, Modifiers::NONE), Some(ShortcutAction::DeleteSelected));
        assert_eq!(resolve(Key::Escape, Modifiers::NONE), Some(ShortcutAction::Escape));
        assert_eq!(
            resolve(Key::ArrowLeft, Modifiers::SHIFT),
            Some(ShortcutAction::Nudge { direction: Direction::Left, large: true })
        );
    }

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("Z", true, true, "Redo");
        assert_eq!(shortcut.format(), "Ctrl+Shift+Z");
        assert!(ShortcutRegistry::all().iter().all(|s| !s.description.is_empty()));
    }

    #[test]
    fn test_modifiers_come_from_flags() {
        let all = ShortcutRegistry::all();
        assert!(all.iter().all(|s| !s.key.contains('+')));
        let snap = all.iter().find(|s| s.description.starts_with("Snap rotation")).unwrap();
        assert_eq!(snap.format(), "Shift+Rotate drag");
    }
}
