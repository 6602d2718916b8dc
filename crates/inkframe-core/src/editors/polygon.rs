use crate::annotation::{AnnotationKind, annotation_bbox, paint_annotation};
use crate::editor::{
    EditorContext, EditorFlags, ElementEditor, PartId, SELECTION_MARGIN, outline_bbox, paint_decoration, union_bbox,
};
use crate::geometry::Geometry;
use crate::paint::PaintContext;
use crate::scene::Element;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use std::collections::HashMap;

/// Editor for polygons. Each vertex is a part, addressed by index.
///
/// Vertex drags are staged as offsets until applied or reset.
#[derive(Debug, Clone, Default)]
pub struct PolygonEditor {
    offsets: HashMap<usize, Vec2>,
}

impl PolygonEditor {
    /// Staged offset of a vertex.
    pub fn offset(&self, index: usize) -> Option<Vec2> {
        self.offsets.get(&index).copied()
    }

    pub fn has_pending_move(&self) -> bool {
        !self.offsets.is_empty()
    }

    /// Vertices with staged offsets applied.
    fn moved_vertices(&self, vertices: &[Point]) -> Vec<Point> {
        vertices
            .iter()
            .enumerate()
            .map(|(i, &p)| p + self.offsets.get(&i).copied().unwrap_or(Vec2::ZERO))
            .collect()
    }

    /// Vertices in view coordinates, offsets included.
    fn view_vertices(&self, cx: &EditorContext<'_>, view: Affine) -> Vec<Point> {
        let Some(element) = cx.element() else {
            return Vec::new();
        };
        let staged = cx.staged_transform(view);
        self.moved_vertices(element.geometry.vertices())
            .into_iter()
            .map(|p| staged * p)
            .collect()
    }

    /// Vertex glyph size: selected vertices use the regular size.
    fn vertex_size(cx: &EditorContext<'_>, selected: bool) -> f64 {
        cx.settings.annotation_size(!selected)
    }
}

impl ElementEditor for PolygonEditor {
    fn paint(&self, cx: &EditorContext<'_>, painter: &mut dyn PaintContext, view: Affine) {
        paint_decoration(cx, painter, view);
        let vertices = self.view_vertices(cx, view);

        if self.has_pending_move() && cx.node.flags().is_decorated() {
            if let Some((first, rest)) = vertices.split_first() {
                let mut outline = BezPath::new();
                outline.move_to(*first);
                for p in rest {
                    outline.line_to(*p);
                }
                outline.close_path();
                painter.stroke_path(
                    &outline,
                    Affine::IDENTITY,
                    cx.settings.preview_color.into(),
                    cx.settings.outline_width,
                );
            }
        }

        if !cx.node.has_flag(EditorFlags::SELECTED) {
            return;
        }
        for (i, at) in vertices.into_iter().enumerate() {
            let selected = cx.node.is_part_selected(&PartId::Index(i));
            let size = Self::vertex_size(cx, selected);
            paint_annotation(painter, Affine::IDENTITY, at, AnnotationKind::Diamond, selected, size);
        }
    }

    /// Covers moved vertices and their glyphs as well as the outline.
    fn bbox(&self, cx: &EditorContext<'_>, view: Affine) -> Option<Rect> {
        let vertices = self.view_vertices(cx, view);
        let mut extent = outline_bbox(cx, view);
        if self.has_pending_move() {
            let moved = vertices
                .iter()
                .map(|&p| Rect::from_points(p, p).inflate(SELECTION_MARGIN, SELECTION_MARGIN));
            extent = union_bbox(extent, moved);
        }
        if cx.node.has_flag(EditorFlags::SELECTED) {
            let glyphs = vertices.iter().enumerate().map(|(i, &at)| {
                let selected = cx.node.is_part_selected(&PartId::Index(i));
                annotation_bbox(Affine::IDENTITY, at, selected, Self::vertex_size(cx, selected))
            });
            extent = union_bbox(extent, glyphs);
        }
        extent
    }

    fn part_at(&self, cx: &EditorContext<'_>, location: Point, view: Affine) -> Option<PartId> {
        if cx.node.has_flag(EditorFlags::SELECTED) {
            // Later vertices are drawn on top.
            let vertices = self.view_vertices(cx, view);
            for (i, at) in vertices.into_iter().enumerate().rev() {
                let part = PartId::Index(i);
                let selected = cx.node.is_part_selected(&part);
                let size = Self::vertex_size(cx, selected);
                if annotation_bbox(Affine::IDENTITY, at, selected, size).contains(location) {
                    return Some(part);
                }
            }
        }
        Some(PartId::Whole)
    }

    fn move_part(&mut self, element: &Element, part: &PartId, delta: Vec2) -> bool {
        let PartId::Index(index) = *part else {
            return false;
        };
        if index >= element.geometry.vertices().len() || delta == Vec2::ZERO {
            return false;
        }
        *self.offsets.entry(index).or_insert(Vec2::ZERO) += delta;
        true
    }

    fn reset_part_move(&mut self) -> bool {
        let pending = self.has_pending_move();
        self.offsets.clear();
        pending
    }

    fn apply_part_move(&mut self, target: &mut Element) {
        if let Geometry::Polygon(points) = &mut target.geometry {
            for (&i, &offset) in &self.offsets {
                if let Some(p) = points.get_mut(i) {
                    *p += offset;
                }
            }
        } else if self.has_pending_move() {
            log::warn!("Dropping vertex move on non-polygon element {}", target.id());
        }
        self.offsets.clear();
    }
}
