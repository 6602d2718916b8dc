//! Editor decoration flags.

use bitflags::bitflags;

bitflags! {
    /// Independent visual states of an editor node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EditorFlags: u8 {
        /// Part of the current selection; enables part selection and decoration.
        const SELECTED = 1 << 0;
        /// Hovered or otherwise emphasized.
        const HIGHLIGHTED = 1 << 1;
        /// Receives keyboard input.
        const FOCUSED = 1 << 2;
        /// Shows detailed decoration (part annotations).
        const DETAIL = 1 << 3;
        /// Shows the preview outline of a staged transform.
        const OUTLINE = 1 << 4;
    }
}

impl EditorFlags {
    /// Check if the node draws any decoration and so has a bounding box.
    pub fn is_decorated(self) -> bool {
        self.intersects(Self::SELECTED | Self::HIGHLIGHTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorated() {
        assert!(!EditorFlags::empty().is_decorated());
        assert!(!(EditorFlags::FOCUSED | EditorFlags::OUTLINE).is_decorated());
        assert!(EditorFlags::SELECTED.is_decorated());
        assert!(EditorFlags::HIGHLIGHTED.is_decorated());
    }
}
