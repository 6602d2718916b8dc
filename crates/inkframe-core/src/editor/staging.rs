//! Flag changes, bounding boxes and the transform preview lifecycle.

use super::flags::EditorFlags;
use super::part::{PartData, PartId};
use super::tree::EditorTree;
use super::EditorId;
use crate::error::{EditorError, EditorResult};
use crate::scene::{ElementId, SceneGraph};
use kurbo::{Affine, Rect, Vec2};

/// Margin around the selection decoration, covering stroke bleed.
pub const SELECTION_MARGIN: f64 = 1.0;

impl EditorTree {
    /// Set a flag, bracketing the change with two invalidations.
    pub fn set_flag(&mut self, scene: &SceneGraph, id: EditorId, flag: EditorFlags) -> EditorResult<()> {
        if self.get(id)?.flags.contains(flag) {
            return Ok(());
        }
        self.invalidate(scene, id);
        self.get_mut(id)?.flags.insert(flag);
        self.invalidate(scene, id);
        Ok(())
    }

    /// Clear a flag, bracketing the change with two invalidations.
    pub fn remove_flag(&mut self, scene: &SceneGraph, id: EditorId, flag: EditorFlags) -> EditorResult<()> {
        if !self.get(id)?.flags.intersects(flag) {
            return Ok(());
        }
        self.invalidate(scene, id);
        self.get_mut(id)?.flags.remove(flag);
        self.invalidate(scene, id);
        Ok(())
    }

    /// The node's own decoration box in view coordinates.
    ///
    /// `None` unless the node is selected or highlighted. Covers what the
    /// node's editor paints, not its descendants.
    pub fn bbox(&self, scene: &SceneGraph, id: EditorId, view: Affine) -> Option<Rect> {
        let node = self.node(id)?;
        if !node.flags.is_decorated() {
            return None;
        }
        let cx = self.context(scene, id, node);
        node.editor.bbox(&cx, view)
    }

    /// Stage a transform for preview.
    ///
    /// The node's editor may reinterpret the transform for a specific part.
    pub fn transform(
        &mut self,
        scene: &SceneGraph,
        id: EditorId,
        transform: Affine,
        part: Option<&PartId>,
        data: Option<&PartData>,
    ) -> EditorResult<()> {
        let node = self.get_mut(id)?;
        let element = scene
            .element(node.element())
            .ok_or(EditorError::UnknownElement(node.element()))?;
        let transform = node.editor.stage_transform(element, transform, part, data);
        if node.preview_transform.unwrap_or(Affine::IDENTITY) == transform {
            return Ok(());
        }

        if node.flags.contains(EditorFlags::OUTLINE) {
            self.invalidate(scene, id);
        } else {
            self.set_flag(scene, id, EditorFlags::OUTLINE)?;
        }
        self.get_mut(id)?.preview_transform = Some(transform);
        self.invalidate(scene, id);
        Ok(())
    }

    /// Drop the staged transform and the preview outline.
    pub fn reset_transform(&mut self, scene: &SceneGraph, id: EditorId) -> EditorResult<()> {
        let staged = self.get(id)?.preview_transform;
        if staged.is_some_and(|t| t != Affine::IDENTITY) {
            self.invalidate(scene, id);
        }
        self.get_mut(id)?.preview_transform = None;
        self.remove_flag(scene, id, EditorFlags::OUTLINE)
    }

    /// Commit the staged transform onto `target` (the node's element or a
    /// clone of it), then reset.
    pub fn apply_transform(&mut self, scene: &mut SceneGraph, id: EditorId, target: ElementId) -> EditorResult<()> {
        let staged = self.get(id)?.preview_transform;
        if !scene.contains(target) {
            return Err(EditorError::UnknownElement(target));
        }
        if let Some(transform) = staged.filter(|t| *t != Affine::IDENTITY) {
            scene.apply_transform(target, transform)?;
            log::debug!("Committed transform of {:?} onto {}", id, target);
        }
        self.reset_transform(scene, id)
    }

    /// Swap the element used for rendering and geometry queries.
    pub fn set_preview_element(
        &mut self,
        scene: &SceneGraph,
        id: EditorId,
        preview: Option<ElementId>,
    ) -> EditorResult<()> {
        if self.get(id)?.preview_element == preview {
            return Ok(());
        }
        if let Some(preview) = preview.filter(|p| !scene.contains(*p)) {
            return Err(EditorError::UnknownElement(preview));
        }
        self.invalidate(scene, id);
        self.get_mut(id)?.preview_element = preview;
        self.invalidate(scene, id);
        Ok(())
    }

    /// Drag one part of the node's element.
    ///
    /// A visible change is bracketed by the extents before and after.
    pub fn move_part(&mut self, scene: &SceneGraph, id: EditorId, part: &PartId, delta: Vec2) -> EditorResult<()> {
        let before = self.bbox(scene, id, self.view_transform());
        let node = self.get_mut(id)?;
        let element = scene
            .element(node.element())
            .ok_or(EditorError::UnknownElement(node.element()))?;
        if node.editor.move_part(element, part, delta) {
            self.push_invalidation(id, before);
            self.invalidate(scene, id);
        }
        Ok(())
    }

    /// Discard a pending part drag.
    pub fn reset_part_move(&mut self, scene: &SceneGraph, id: EditorId) -> EditorResult<()> {
        let before = self.bbox(scene, id, self.view_transform());
        if self.get_mut(id)?.editor.reset_part_move() {
            self.push_invalidation(id, before);
            self.invalidate(scene, id);
        }
        Ok(())
    }

    /// Commit a pending part drag onto `target`.
    pub fn apply_part_move(&mut self, scene: &mut SceneGraph, id: EditorId, target: ElementId) -> EditorResult<()> {
        let before = self.bbox(scene, id, self.view_transform());
        let node = self.get_mut(id)?;
        let element = scene
            .element_mut(target)
            .ok_or(EditorError::UnknownElement(target))?;
        node.editor.apply_part_move(element);
        self.push_invalidation(id, before);
        self.invalidate(scene, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::registry::EditorRegistry;
    use crate::geometry::Geometry;
    use crate::scene::ElementKind;
    use kurbo::Point;

    fn setup() -> (SceneGraph, EditorTree, ElementId, EditorId) {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let rect = scene.create(
            ElementKind::Rectangle,
            Geometry::Rect(Rect::new(10.0, 10.0, 30.0, 20.0)),
        );
        scene.append_child(page, rect).unwrap();
        let mut tree = EditorTree::with_registry(EditorRegistry::with_defaults().shared());
        let id = tree.open(&mut scene, rect).unwrap().unwrap();
        tree.take_invalidations();
        (scene, tree, rect, id)
    }

    #[test]
    fn test_flag_bracketing() {
        let (scene, mut tree, _, id) = setup();
        tree.set_flag(&scene, id, EditorFlags::SELECTED).unwrap();
        let calls = tree.take_invalidations();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].extent, None);
        // Outline margin plus the reach of the corner handles.
        assert_eq!(calls[1].extent, Some(Rect::new(6.0, 6.0, 34.0, 24.0)));

        tree.remove_flag(&scene, id, EditorFlags::SELECTED).unwrap();
        let calls = tree.take_invalidations();
        assert_eq!(calls[0].extent, Some(Rect::new(6.0, 6.0, 34.0, 24.0)));
        assert_eq!(calls[1].extent, None);
    }

    #[test]
    fn test_flag_idempotent() {
        let (scene, mut tree, _, id) = setup();
        tree.remove_flag(&scene, id, EditorFlags::SELECTED).unwrap();
        assert!(tree.take_invalidations().is_empty());

        tree.set_flag(&scene, id, EditorFlags::HIGHLIGHTED).unwrap();
        tree.take_invalidations();
        tree.set_flag(&scene, id, EditorFlags::HIGHLIGHTED).unwrap();
        assert!(tree.take_invalidations().is_empty());
    }

    #[test]
    fn test_bbox_requires_decoration() {
        let (scene, mut tree, _, id) = setup();
        assert!(tree.bbox(&scene, id, Affine::IDENTITY).is_none());
        tree.set_flag(&scene, id, EditorFlags::FOCUSED).unwrap();
        assert!(tree.bbox(&scene, id, Affine::IDENTITY).is_none());
        tree.set_flag(&scene, id, EditorFlags::HIGHLIGHTED).unwrap();
        assert!(tree.bbox(&scene, id, Affine::IDENTITY).is_some());
    }

    #[test]
    fn test_bbox_composes_preview_and_view() {
        let (scene, mut tree, _, id) = setup();
        tree.set_flag(&scene, id, EditorFlags::HIGHLIGHTED).unwrap();
        tree.transform(&scene, id, Affine::translate((5.0, 0.0)), None, None)
            .unwrap();
        let bbox = tree.bbox(&scene, id, Affine::scale(2.0)).unwrap();
        assert_eq!(bbox, Rect::new(29.0, 19.0, 71.0, 41.0));
    }

    #[test]
    fn test_transform_invalidation_sequence() {
        let (scene, mut tree, _, id) = setup();
        tree.transform(&scene, id, Affine::translate((1.0, 0.0)), None, None)
            .unwrap();
        // Outline flag edge (2) + new extent (1).
        assert_eq!(tree.take_invalidations().len(), 3);
        assert!(tree.node(id).unwrap().has_flag(EditorFlags::OUTLINE));

        tree.transform(&scene, id, Affine::translate((2.0, 0.0)), None, None)
            .unwrap();
        assert_eq!(tree.take_invalidations().len(), 2);

        tree.transform(&scene, id, Affine::translate((2.0, 0.0)), None, None)
            .unwrap();
        assert!(tree.take_invalidations().is_empty());
    }

    #[test]
    fn test_identity_transform_is_noop() {
        let (scene, mut tree, _, id) = setup();
        tree.transform(&scene, id, Affine::IDENTITY, None, None).unwrap();
        assert!(tree.take_invalidations().is_empty());
        assert!(tree.node(id).unwrap().preview_transform().is_none());
    }

    #[test]
    fn test_apply_transform_commits_once() {
        let (mut scene, mut tree, rect, id) = setup();
        let t = Affine::translate((10.0, 5.0));
        tree.transform(&scene, id, t, None, None).unwrap();
        tree.apply_transform(&mut scene, id, rect).unwrap();

        assert_eq!(
            scene.element(rect).unwrap().geometry,
            Geometry::Rect(Rect::new(20.0, 15.0, 40.0, 25.0))
        );
        let node = tree.node(id).unwrap();
        assert!(node.preview_transform().is_none());
        assert!(!node.has_flag(EditorFlags::OUTLINE));

        // Nothing staged any more: a second commit changes nothing.
        tree.apply_transform(&mut scene, id, rect).unwrap();
        assert_eq!(
            scene.element(rect).unwrap().geometry,
            Geometry::Rect(Rect::new(20.0, 15.0, 40.0, 25.0))
        );
    }

    #[test]
    fn test_apply_transform_onto_clone() {
        let (mut scene, mut tree, rect, id) = setup();
        let copy = scene.clone_element(rect).unwrap();
        tree.transform(&scene, id, Affine::translate((0.0, 10.0)), None, None)
            .unwrap();
        tree.apply_transform(&mut scene, id, copy).unwrap();

        assert_eq!(scene.bounds(rect), Some(Rect::new(10.0, 10.0, 30.0, 20.0)));
        assert_eq!(scene.bounds(copy), Some(Rect::new(10.0, 20.0, 30.0, 30.0)));
    }

    #[test]
    fn test_apply_transform_unknown_target() {
        let (mut scene, mut tree, _, id) = setup();
        let missing = uuid::Uuid::new_v4();
        assert_eq!(
            tree.apply_transform(&mut scene, id, missing),
            Err(EditorError::UnknownElement(missing))
        );
    }

    #[test]
    fn test_reset_transform() {
        let (scene, mut tree, _, id) = setup();
        tree.transform(&scene, id, Affine::rotate(0.5), None, None).unwrap();
        tree.take_invalidations();
        tree.reset_transform(&scene, id).unwrap();
        // Invalidate old extent, then the outline flag edge.
        assert_eq!(tree.take_invalidations().len(), 3);
        assert!(tree.node(id).unwrap().preview_transform().is_none());
        assert!(!tree.node(id).unwrap().has_flag(EditorFlags::OUTLINE));
    }

    #[test]
    fn test_preview_element_drives_bbox() {
        let (mut scene, mut tree, _, id) = setup();
        let preview = scene.create(
            ElementKind::Rectangle,
            Geometry::Rect(Rect::from_points(Point::ZERO, Point::new(4.0, 4.0))),
        );
        tree.set_flag(&scene, id, EditorFlags::HIGHLIGHTED).unwrap();
        tree.set_preview_element(&scene, id, Some(preview)).unwrap();
        assert_eq!(
            tree.bbox(&scene, id, Affine::IDENTITY),
            Some(Rect::new(-1.0, -1.0, 5.0, 5.0))
        );
        tree.set_preview_element(&scene, id, None).unwrap();
        assert_eq!(
            tree.bbox(&scene, id, Affine::IDENTITY),
            Some(Rect::new(9.0, 9.0, 31.0, 21.0))
        );
    }
}
