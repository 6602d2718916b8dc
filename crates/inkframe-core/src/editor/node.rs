//! Editor node: per-element editing state.

use super::behavior::ElementEditor;
use super::flags::EditorFlags;
use super::part::PartId;
use super::EditorId;
use crate::scene::ElementId;
use kurbo::Affine;

/// The editor attached to one scene element.
///
/// Structure (`parent`, `children`) is only changed by [`super::EditorTree`].
#[derive(Debug)]
pub struct EditorNode {
    element: ElementId,
    pub(crate) preview_element: Option<ElementId>,
    pub(crate) flags: EditorFlags,
    pub(crate) preview_transform: Option<Affine>,
    pub(crate) parent: Option<EditorId>,
    pub(crate) children: Vec<EditorId>,
    /// Never empty when present.
    pub(crate) part_selection: Option<Vec<PartId>>,
    pub(crate) editor: Box<dyn ElementEditor>,
}

impl EditorNode {
    pub(crate) fn new(element: ElementId, editor: Box<dyn ElementEditor>) -> Self {
        Self {
            element,
            preview_element: None,
            flags: EditorFlags::empty(),
            preview_transform: None,
            parent: None,
            children: Vec::new(),
            part_selection: None,
            editor,
        }
    }

    /// The element this node edits.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Alternate element rendered while a preview is active.
    pub fn preview_element(&self) -> Option<ElementId> {
        self.preview_element
    }

    /// The element used for geometry queries: the preview element if set.
    pub fn geometry_element(&self) -> ElementId {
        self.preview_element.unwrap_or(self.element)
    }

    pub fn flags(&self) -> EditorFlags {
        self.flags
    }

    pub fn has_flag(&self, flag: EditorFlags) -> bool {
        self.flags.contains(flag)
    }

    /// The staged transform of an in-progress gesture.
    pub fn preview_transform(&self) -> Option<Affine> {
        self.preview_transform
    }

    pub fn parent(&self) -> Option<EditorId> {
        self.parent
    }

    /// Child editors in document order.
    pub fn children(&self) -> &[EditorId] {
        &self.children
    }

    /// Selected parts, empty when nothing is selected.
    pub fn part_selection(&self) -> &[PartId] {
        self.part_selection.as_deref().unwrap_or(&[])
    }

    /// Check part membership using the editor's part equality.
    pub fn is_part_selected(&self, part: &PartId) -> bool {
        self.part_selection()
            .iter()
            .any(|p| self.editor.parts_equal(p, part))
    }

    pub fn editor(&self) -> &dyn ElementEditor {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> &mut dyn ElementEditor {
        self.editor.as_mut()
    }
}
