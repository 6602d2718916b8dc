//! Editor tree: interactive editing state layered over the scene graph.
//!
//! Every edited scene element gets an [`EditorNode`]. Nodes form a tree that
//! mirrors the scene, skipping elements without an editor:
//! - [`EditorRegistry`] decides which kinds are editable
//! - [`EditorTree`] opens, closes, paints and hit-tests nodes
//! - nodes stage transforms and track part selections until committed
//!
//! Elements remain plain data. Editors wrap them with interaction state.

mod behavior;
mod flags;
mod node;
mod part;
mod registry;
mod selection;
mod staging;
mod tree;

pub use behavior::{EditorContext, ElementEditor, outline_bbox, paint_decoration, union_bbox};
pub use flags::EditorFlags;
pub use node::EditorNode;
pub use part::{Corner, Edge, HandleKind, PartData, PartHit, PartId};
pub use registry::{EditorFactory, EditorRegistry, SharedRegistry};
pub use selection::{merge_part_selection, same_part_selection};
pub use staging::SELECTION_MARGIN;
pub use tree::{EditorTree, Invalidation};

slotmap::new_key_type! {
    /// Handle of an editor node inside an [`EditorTree`].
    pub struct EditorId;
}
