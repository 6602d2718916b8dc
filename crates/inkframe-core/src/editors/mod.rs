//! Built-in editors for the scene's element kinds.

mod container;
mod polygon;
mod shape;

pub use container::ContainerEditor;
pub use polygon::PolygonEditor;
pub use shape::ShapeEditor;
