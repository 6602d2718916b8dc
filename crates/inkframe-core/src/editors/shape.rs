use crate::annotation::{AnnotationKind, annotation_bbox, paint_annotation};
use crate::editor::{
    Corner, Edge, EditorContext, EditorFlags, ElementEditor, HandleKind, PartData, PartId, outline_bbox,
    paint_decoration, union_bbox,
};
use crate::paint::PaintContext;
use crate::scene::Element;
use kurbo::{Affine, Point, Rect, Vec2};

/// Editor for rectangles, ellipses and paths.
///
/// While selected, the corners and edge midpoints of the bounding box are
/// handle parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeEditor;

impl ShapeEditor {
    /// Handles of the staged bounding box in view coordinates, with their
    /// selection state. Empty unless the node is selected.
    fn handles(cx: &EditorContext<'_>, view: Affine) -> Vec<(PartId, Point, bool)> {
        if !cx.node.has_flag(EditorFlags::SELECTED) {
            return Vec::new();
        }
        let Some(bounds) = cx.scene.bounds(cx.node.geometry_element()) else {
            return Vec::new();
        };
        let rect = cx.staged_transform(view).transform_rect_bbox(bounds);
        HandleKind::ALL
            .into_iter()
            .map(|handle| {
                let part = PartId::Handle(handle);
                let selected = cx.node.is_part_selected(&part);
                (part, handle.of(rect), selected)
            })
            .collect()
    }
}

impl ElementEditor for ShapeEditor {
    fn paint(&self, cx: &EditorContext<'_>, painter: &mut dyn PaintContext, view: Affine) {
        paint_decoration(cx, painter, view);
        let size = cx.settings.annotation_size(false);
        for (_, at, selected) in Self::handles(cx, view) {
            paint_annotation(painter, Affine::IDENTITY, at, AnnotationKind::Square, selected, size);
        }
    }

    fn bbox(&self, cx: &EditorContext<'_>, view: Affine) -> Option<Rect> {
        let size = cx.settings.annotation_size(false);
        let handles = Self::handles(cx, view)
            .into_iter()
            .map(|(_, at, selected)| annotation_bbox(Affine::IDENTITY, at, selected, size));
        union_bbox(outline_bbox(cx, view), handles)
    }

    fn part_at(&self, cx: &EditorContext<'_>, location: Point, view: Affine) -> Option<PartId> {
        let size = cx.settings.annotation_size(false);
        for (part, at, selected) in Self::handles(cx, view) {
            if annotation_bbox(Affine::IDENTITY, at, selected, size).contains(location) {
                return Some(part);
            }
        }
        Some(PartId::Whole)
    }

    /// A handle drag with an offset resizes the box, keeping the opposite
    /// side fixed.
    fn stage_transform(
        &mut self,
        element: &Element,
        transform: Affine,
        part: Option<&PartId>,
        data: Option<&PartData>,
    ) -> Affine {
        match (part, data, element.geometry.bounds()) {
            (Some(PartId::Handle(handle)), Some(PartData::Offset(delta)), Some(bounds)) => {
                handle_resize(bounds, *handle, *delta)
            }
            _ => transform,
        }
    }
}

/// Transform mapping `bounds` onto the box obtained by dragging `handle`.
fn handle_resize(bounds: Rect, handle: HandleKind, delta: Vec2) -> Affine {
    let Rect { x0, y0, x1, y1 } = bounds;
    let (x0, y0, x1, y1) = match handle {
        HandleKind::Corner(Corner::TopLeft) => (x0 + delta.x, y0 + delta.y, x1, y1),
        HandleKind::Corner(Corner::TopRight) => (x0, y0 + delta.y, x1 + delta.x, y1),
        HandleKind::Corner(Corner::BottomLeft) => (x0 + delta.x, y0, x1, y1 + delta.y),
        HandleKind::Corner(Corner::BottomRight) => (x0, y0, x1 + delta.x, y1 + delta.y),
        HandleKind::Edge(Edge::Top) => (x0, y0 + delta.y, x1, y1),
        HandleKind::Edge(Edge::Right) => (x0, y0, x1 + delta.x, y1),
        HandleKind::Edge(Edge::Bottom) => (x0, y0, x1, y1 + delta.y),
        HandleKind::Edge(Edge::Left) => (x0 + delta.x, y0, x1, y1),
    };
    let target = Rect::new(x0, y0, x1, y1).abs();
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Affine::translate(target.origin() - bounds.origin());
    }

    let sx = target.width().max(1.0) / bounds.width();
    let sy = target.height().max(1.0) / bounds.height();
    Affine::translate(target.origin().to_vec2())
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(-bounds.origin().to_vec2())
}
