use crate::editor::ElementEditor;

/// Editor for pages and groups. Exposes the element as a single part.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerEditor;

impl ElementEditor for ContainerEditor {}
