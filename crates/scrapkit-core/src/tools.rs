//! Canvas tools.

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Select, move, resize and rotate elements.
    #[default]
    Select,
    /// Drag to pan the viewport.
    Pan,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[ToolKind::Select, ToolKind::Pan]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Pan => "Pan",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool() {
        assert_eq!(ToolKind::default(), ToolKind::Select);
        assert_eq!(ToolKind::all().len(), 2);
        assert_eq!(ToolKind::Pan.display_name(), "Pan");
    }
}
