//! Scrapkit Core Library
//!
//! Platform-agnostic document model and editing engine for the Scrapkit
//! scrapbook editor.

pub mod clipboard;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod error;
pub mod history;
pub mod input;
pub mod interaction;
pub mod page;
pub mod render;
pub mod selection;
pub mod shortcuts;
pub mod snap;
pub mod tools;
pub mod transform;
pub mod viewport;
mod zorder;

pub use clipboard::Clipboard;
pub use config::EditorConfig;
pub use document::{PageSize, Scrapbook};
pub use editor::{Editor, EditorSnapshot};
pub use elements::{Element, ElementId, ElementKind, SerializableColor, ShapeType};
pub use error::{EditorError, EditorResult};
pub use history::History;
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Gesture, InteractionController};
pub use page::{Background, Page, PageId};
pub use render::{RenderItem, paint_list};
pub use selection::{Corner, Handle, HandleKind, Selection};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use snap::{GRID_SIZE, SnapResult, snap_to_grid};
pub use tools::ToolKind;
pub use viewport::Viewport;
