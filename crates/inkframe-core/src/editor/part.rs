//! Editable parts of an element: the sub-selectable features an editor exposes.

use super::EditorId;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions on a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Position of this corner on a rectangle.
    pub fn of(self, rect: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(rect.x0, rect.y0),
            Corner::TopRight => Point::new(rect.x1, rect.y0),
            Corner::BottomLeft => Point::new(rect.x0, rect.y1),
            Corner::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }
}

/// Edge midpoints on a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Midpoint of this edge on a rectangle.
    pub fn of(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            Edge::Top => Point::new(center.x, rect.y0),
            Edge::Right => Point::new(rect.x1, center.y),
            Edge::Bottom => Point::new(center.x, rect.y1),
            Edge::Left => Point::new(rect.x0, center.y),
        }
    }
}

/// Manipulation handles shared by box-like editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

impl HandleKind {
    /// Every box handle, corners first.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Right),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
    ];

    /// Position of this handle on a rectangle.
    pub fn of(self, rect: Rect) -> Point {
        match self {
            HandleKind::Corner(corner) => corner.of(rect),
            HandleKind::Edge(edge) => edge.of(rect),
        }
    }
}

/// Identifier of an editable part.
///
/// The meaning of each id is private to the editor that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartId {
    /// The element as a whole.
    Whole,
    /// An indexed part, e.g. a polygon vertex.
    Index(usize),
    /// A box handle.
    Handle(HandleKind),
}

/// Gesture payload that accompanies a part during a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartData {
    /// Drag offset in element coordinates.
    Offset(Vec2),
}

/// Result of a hit test: the editor that was hit and the part under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct PartHit {
    pub editor: EditorId,
    pub part: PartId,
}
