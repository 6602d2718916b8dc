//! The capability interface every element editor implements.

use super::flags::EditorFlags;
use super::node::EditorNode;
use super::part::{PartData, PartId};
use super::staging::SELECTION_MARGIN;
use super::EditorId;
use crate::paint::PaintContext;
use crate::scene::{Element, SceneGraph};
use crate::settings::EditorSettings;
use kurbo::{Affine, Point, Rect, Shape as KurboShape, Vec2};
use std::fmt;

/// Read-only view of a node handed to editor callbacks.
pub struct EditorContext<'a> {
    pub id: EditorId,
    pub node: &'a EditorNode,
    pub scene: &'a SceneGraph,
    pub settings: &'a EditorSettings,
}

impl EditorContext<'_> {
    /// The element geometry queries should use.
    pub fn element(&self) -> Option<&Element> {
        self.scene.element(self.node.geometry_element())
    }

    /// View transform composed with the staged preview transform.
    pub fn staged_transform(&self, view: Affine) -> Affine {
        view * self.node.preview_transform().unwrap_or(Affine::IDENTITY)
    }
}

/// Kind-specific editing behavior.
///
/// All methods have defaults, so a plain editor only needs `#[derive(Debug)]`
/// and an empty impl.
pub trait ElementEditor: fmt::Debug {
    /// Called once the node is linked into the tree.
    fn attach(&mut self, _element: &Element) {}

    /// Called after the node and all of its children are unlinked.
    fn detach(&mut self) {}

    /// Paint this node's decoration. Children are painted by the tree.
    fn paint(&self, cx: &EditorContext<'_>, painter: &mut dyn PaintContext, view: Affine) {
        paint_decoration(cx, painter, view);
    }

    /// Everything this node paints, in view coordinates. Only asked while
    /// the node is selected or highlighted.
    fn bbox(&self, cx: &EditorContext<'_>, view: Affine) -> Option<Rect> {
        outline_bbox(cx, view)
    }

    /// Find the part under `location` (view coordinates). Only called when
    /// the location is inside the node's bounding box.
    fn part_at(&self, _cx: &EditorContext<'_>, _location: Point, _view: Affine) -> Option<PartId> {
        Some(PartId::Whole)
    }

    /// Part id equality used by selection membership.
    fn parts_equal(&self, a: &PartId, b: &PartId) -> bool {
        a == b
    }

    /// Turn a gesture transform into the transform to stage.
    fn stage_transform(
        &mut self,
        _element: &Element,
        transform: Affine,
        _part: Option<&PartId>,
        _data: Option<&PartData>,
    ) -> Affine {
        transform
    }

    /// Drag a single part. Returns true if the visual state changed.
    fn move_part(&mut self, _element: &Element, _part: &PartId, _delta: Vec2) -> bool {
        false
    }

    /// Drop any pending part drag. Returns true if the visual state changed.
    fn reset_part_move(&mut self) -> bool {
        false
    }

    /// Write the pending part drag into `target`.
    fn apply_part_move(&mut self, _target: &mut Element) {}
}

/// The staged element bounds plus the stroke margin.
pub fn outline_bbox(cx: &EditorContext<'_>, view: Affine) -> Option<Rect> {
    let bounds = cx.scene.bounds(cx.node.geometry_element())?;
    Some(
        cx.staged_transform(view)
            .transform_rect_bbox(bounds)
            .inflate(SELECTION_MARGIN, SELECTION_MARGIN),
    )
}

/// Union of optional boxes.
pub fn union_bbox(a: Option<Rect>, b: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    b.into_iter().fold(a, |acc, r| Some(acc.map_or(r, |acc| acc.union(r))))
}

/// Selection outline and transform preview shared by all editors.
pub fn paint_decoration(cx: &EditorContext<'_>, painter: &mut dyn PaintContext, view: Affine) {
    let node = cx.node;
    let geometry = node.geometry_element();
    let Some(bounds) = cx.scene.bounds(geometry) else {
        return;
    };
    let staged = cx.staged_transform(view);
    let width = cx.settings.outline_width;

    if node.flags().is_decorated() {
        let color = if node.has_flag(EditorFlags::SELECTED) {
            painter.selection_outline_color()
        } else {
            cx.settings.highlight_color.into()
        };
        let outline = staged.transform_rect_bbox(bounds).to_path(0.1);
        painter.stroke_path(&outline, Affine::IDENTITY, color, width);
    }

    if node.has_flag(EditorFlags::OUTLINE) && node.preview_transform().is_some() {
        let preview = staged * cx.scene.outline(geometry);
        painter.stroke_path(&preview, Affine::IDENTITY, cx.settings.preview_color.into(), width);
    }
}
