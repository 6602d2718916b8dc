//! InkFrame Core Library
//!
//! Scene graph and the editor tree that layers interactive editing state
//! (selection, highlighting, transform previews, part selection) over it.

pub mod annotation;
pub mod editor;
pub mod editors;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod scene;
pub mod settings;

pub use annotation::{AnnotationKind, annotation_bbox, clear_annotation_templates, paint_annotation};
pub use editor::{
    Corner, Edge, EditorContext, EditorFlags, EditorId, EditorNode, EditorRegistry, EditorTree, ElementEditor,
    HandleKind, Invalidation, PartData, PartHit, PartId,
};
pub use editors::{ContainerEditor, PolygonEditor, ShapeEditor};
pub use error::{EditorError, EditorResult, SceneError, SceneResult};
pub use geometry::Geometry;
pub use paint::{DisplayList, PaintCommand, PaintContext};
pub use scene::{Element, ElementId, ElementKind, SceneGraph};
pub use settings::{EditorSettings, SerializableColor};
