//! Error types for scene and editor tree operations.

use crate::editor::EditorId;
use crate::scene::ElementId;
use thiserror::Error;

/// Scene graph mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),
    #[error("Element {0} already has a parent")]
    AlreadyParented(ElementId),
    #[error("Element {anchor} is not a child of {parent}")]
    UnknownSibling { parent: ElementId, anchor: ElementId },
    #[error("Inserting {child} under {parent} would create a cycle")]
    Cycle { parent: ElementId, child: ElementId },
    #[error("Element {0} cannot hold children")]
    NotAContainer(ElementId),
    #[error("Element {0} is a page and cannot be nested")]
    NestedPage(ElementId),
}

/// Editor tree errors.
///
/// These are precondition violations: the failing call aborts before it
/// mutates the tree or the scene.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Element {0} is not part of the live scene")]
    DetachedElement(ElementId),
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),
    #[error("Unknown editor: {0:?}")]
    UnknownEditor(EditorId),
    #[error("Editor {0:?} already has a parent")]
    AlreadyParented(EditorId),
    #[error("Inserting {node:?} under {parent:?} would create a cycle")]
    Cycle { parent: EditorId, node: EditorId },
    #[error("Editor {reference:?} is not a child of {parent:?}")]
    UnknownReference { parent: EditorId, reference: EditorId },
    #[error("Editor {child:?} is not a child of {parent:?}")]
    NotAChild { parent: EditorId, child: EditorId },
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Result type for editor tree operations.
pub type EditorResult<T> = Result<T, EditorError>;
