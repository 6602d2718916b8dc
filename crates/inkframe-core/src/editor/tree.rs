//! Editor tree: keeps editor nodes structurally in sync with the scene.

use super::behavior::EditorContext;
use super::node::EditorNode;
use super::part::PartHit;
use super::registry::{EditorRegistry, SharedRegistry};
use super::EditorId;
use crate::error::{EditorError, EditorResult};
use crate::paint::PaintContext;
use crate::scene::{ElementId, SceneGraph};
use crate::settings::EditorSettings;
use kurbo::{Affine, Point, Rect};
use slotmap::SlotMap;
use std::ops::ControlFlow;

/// A repaint request issued by an editor node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invalidation {
    /// The node asking for the repaint.
    pub editor: EditorId,
    /// View transform in effect when the request was made.
    pub transform: Affine,
    /// The node's own bounding box at request time, `None` if it draws nothing.
    pub extent: Option<Rect>,
}

/// Owns every editor node and the links between them.
///
/// Each node edits one scene element. A node's children are the editors of
/// the nearest edited descendants of its element, in document order.
#[derive(Debug)]
pub struct EditorTree {
    nodes: SlotMap<EditorId, EditorNode>,
    /// Parentless nodes in document order.
    roots: Vec<EditorId>,
    registry: SharedRegistry,
    settings: EditorSettings,
    view_transform: Affine,
    invalidations: Vec<Invalidation>,
}

impl Default for EditorTree {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorTree {
    /// Create a tree backed by the global registry.
    pub fn new() -> Self {
        Self::with_registry(EditorRegistry::global())
    }

    /// Create a tree backed by a specific registry.
    pub fn with_registry(registry: SharedRegistry) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            registry,
            settings: EditorSettings::default(),
            view_transform: Affine::IDENTITY,
            invalidations: Vec::new(),
        }
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Set the view transform used for invalidation extents.
    pub fn set_view_transform(&mut self, transform: Affine) {
        self.view_transform = transform;
    }

    pub fn view_transform(&self) -> Affine {
        self.view_transform
    }

    pub fn node(&self, id: EditorId) -> Option<&EditorNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: EditorId) -> Option<&mut EditorNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: EditorId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Parentless nodes in document order.
    pub fn roots(&self) -> &[EditorId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drain the pending repaint requests.
    pub fn take_invalidations(&mut self) -> Vec<Invalidation> {
        std::mem::take(&mut self.invalidations)
    }

    /// Open (or return the existing) editor for a live element.
    ///
    /// Missing ancestor editors are opened first. Returns `Ok(None)` when the
    /// element's kind has no registered editor.
    pub fn open(&mut self, scene: &mut SceneGraph, element: ElementId) -> EditorResult<Option<EditorId>> {
        if !scene.contains(element) {
            return Err(EditorError::UnknownElement(element));
        }
        if !scene.is_live(element) {
            return Err(EditorError::DetachedElement(element));
        }
        if let Some(existing) = scene.editor_of(element) {
            return Ok(Some(existing));
        }

        let created = scene
            .element(element)
            .and_then(|el| self.registry.read().create(el));
        let Some(editor) = created else {
            return Ok(None);
        };

        let mut parent = None;
        let mut ancestor = scene.parent(element);
        while let Some(candidate) = ancestor {
            if let Some(found) = self.open(scene, candidate)? {
                parent = Some(found);
                break;
            }
            ancestor = scene.parent(candidate);
        }

        let before = self.next_sibling_editor(scene, element, parent);
        let id = self.nodes.insert(EditorNode::new(element, editor));
        let linked = match parent {
            Some(parent) => self.insert_child(parent, id, before),
            None => {
                self.insert_root(id, before);
                Ok(())
            }
        };
        if let Err(err) = linked {
            self.nodes.remove(id);
            return Err(err);
        }

        if let (Some(node), Some(el)) = (self.nodes.get_mut(id), scene.element(element)) {
            node.editor.attach(el);
        }
        scene.set_editor(element, Some(id))?;
        log::debug!("Opened editor {:?} for element {} under {:?}", id, element, parent);
        Ok(Some(id))
    }

    /// Close the editor of an element and all of its descendants.
    ///
    /// Returns false when there was nothing to close, or when the attached
    /// editor's kind is no longer registered (it belongs to someone else).
    /// Such foreign child editors are moved to the end of [`Self::roots`]
    /// so their owner can still reach them.
    pub fn close(&mut self, scene: &mut SceneGraph, element: ElementId) -> bool {
        let Some(id) = scene.editor_of(element) else {
            return false;
        };
        let registered = scene
            .element(element)
            .is_some_and(|el| self.registry.read().is_registered(el.kind()));
        if !registered {
            log::debug!("Leaving foreign editor {:?} on element {}", id, element);
            return false;
        }
        let Some(node) = self.nodes.get(id) else {
            return false;
        };

        let children = node.children.clone();
        for child in children {
            let closed = match self.nodes.get(child) {
                Some(child_node) => {
                    let child_element = child_node.element();
                    self.close(scene, child_element)
                }
                None => false,
            };
            if !closed && self.nodes.contains_key(child) {
                log::warn!("Orphaning foreign editor {:?} while closing {:?}", child, id);
                self.unlink(child);
                self.roots.push(child);
            }
        }

        self.unlink(id);
        if let Some(mut node) = self.nodes.remove(id) {
            node.editor.detach();
        }
        if let Err(err) = scene.set_editor(element, None) {
            log::warn!("Could not clear editor slot: {}", err);
        }
        log::debug!("Closed editor {:?} for element {}", id, element);
        true
    }

    /// Link `node` under `parent`, before `before` or at the end.
    pub fn insert_child(
        &mut self,
        parent: EditorId,
        node: EditorId,
        before: Option<EditorId>,
    ) -> EditorResult<()> {
        let parent_node = self.nodes.get(parent).ok_or(EditorError::UnknownEditor(parent))?;
        let child_node = self.nodes.get(node).ok_or(EditorError::UnknownEditor(node))?;
        if child_node.parent.is_some() {
            return Err(EditorError::AlreadyParented(node));
        }
        if node == parent || self.is_ancestor(node, parent) {
            return Err(EditorError::Cycle { parent, node });
        }
        let index = match before {
            Some(reference) => parent_node
                .children
                .iter()
                .position(|&c| c == reference)
                .ok_or(EditorError::UnknownReference { parent, reference })?,
            None => parent_node.children.len(),
        };

        self.roots.retain(|&r| r != node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.insert(index, node);
        }
        if let Some(child_node) = self.nodes.get_mut(node) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// Unlink `node` from `parent`. The node becomes a root until it is
    /// inserted elsewhere.
    pub fn remove_child(&mut self, parent: EditorId, node: EditorId) -> EditorResult<()> {
        let parent_node = self.nodes.get(parent).ok_or(EditorError::UnknownEditor(parent))?;
        if !parent_node.children.contains(&node) {
            return Err(EditorError::NotAChild { parent, child: node });
        }
        self.unlink(node);
        self.roots.push(node);
        Ok(())
    }

    /// Pre-order traversal from `root`. Stops everything as soon as the
    /// visitor breaks.
    pub fn visit<F>(&self, root: EditorId, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(EditorId, &EditorNode) -> ControlFlow<()>,
    {
        self.visit_node(root, &mut visitor)
    }

    fn visit_node<F>(&self, id: EditorId, visitor: &mut F) -> ControlFlow<()>
    where
        F: FnMut(EditorId, &EditorNode) -> ControlFlow<()>,
    {
        let Some(node) = self.nodes.get(id) else {
            return ControlFlow::Continue(());
        };
        visitor(id, node)?;
        for &child in &node.children {
            self.visit_node(child, visitor)?;
        }
        ControlFlow::Continue(())
    }

    /// Find the topmost part under `location` (view coordinates) in the
    /// subtree of `root`.
    ///
    /// Children are tested last to first, then the node itself. A node the
    /// acceptor rejects is skipped, but its ancestors keep probing.
    pub fn hit_test(
        &self,
        scene: &SceneGraph,
        root: EditorId,
        location: Point,
        view: Affine,
        acceptor: Option<&dyn Fn(EditorId, &EditorNode) -> bool>,
    ) -> Option<PartHit> {
        let node = self.nodes.get(root)?;
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_test(scene, child, location, view, acceptor) {
                return Some(hit);
            }
        }

        if acceptor.is_some_and(|accept| !accept(root, node)) {
            return None;
        }
        let bbox = self.bbox(scene, root, view)?;
        if bbox.is_zero_area() || !bbox.contains(location) {
            return None;
        }
        let cx = self.context(scene, root, node);
        let part = node.editor.part_at(&cx, location, view)?;
        log::trace!("Hit {:?} part {:?} at {:?}", root, part, location);
        Some(PartHit { editor: root, part })
    }

    /// Hit test every root, topmost first.
    pub fn hit_test_all(
        &self,
        scene: &SceneGraph,
        location: Point,
        view: Affine,
        acceptor: Option<&dyn Fn(EditorId, &EditorNode) -> bool>,
    ) -> Option<PartHit> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit_test(scene, root, location, view, acceptor))
    }

    /// Paint every root subtree in document order.
    pub fn paint(&self, scene: &SceneGraph, painter: &mut dyn PaintContext, view: Affine) {
        for &root in &self.roots {
            self.paint_subtree(scene, root, painter, view);
        }
    }

    /// Paint a node, then its children first to last.
    pub fn paint_subtree(&self, scene: &SceneGraph, root: EditorId, painter: &mut dyn PaintContext, view: Affine) {
        let Some(node) = self.nodes.get(root) else {
            return;
        };
        let cx = self.context(scene, root, node);
        node.editor.paint(&cx, painter, view);
        for &child in &node.children {
            self.paint_subtree(scene, child, painter, view);
        }
    }

    pub(crate) fn context<'a>(
        &'a self,
        scene: &'a SceneGraph,
        id: EditorId,
        node: &'a EditorNode,
    ) -> EditorContext<'a> {
        EditorContext {
            id,
            node,
            scene,
            settings: &self.settings,
        }
    }

    pub(crate) fn get(&self, id: EditorId) -> EditorResult<&EditorNode> {
        self.nodes.get(id).ok_or(EditorError::UnknownEditor(id))
    }

    pub(crate) fn get_mut(&mut self, id: EditorId) -> EditorResult<&mut EditorNode> {
        self.nodes.get_mut(id).ok_or(EditorError::UnknownEditor(id))
    }

    /// Record a repaint request for a node's current extent.
    pub(crate) fn invalidate(&mut self, scene: &SceneGraph, id: EditorId) {
        let extent = self.bbox(scene, id, self.view_transform);
        self.push_invalidation(id, extent);
    }

    /// Record a repaint request for an extent captured earlier.
    pub(crate) fn push_invalidation(&mut self, id: EditorId, extent: Option<Rect>) {
        log::trace!("Invalidate {:?} extent {:?}", id, extent);
        self.invalidations.push(Invalidation {
            editor: id,
            transform: self.view_transform,
            extent,
        });
    }

    /// The editor of the first later sibling that already has one and shares
    /// the same parent editor.
    ///
    /// Only the element's own siblings are scanned. When the element sits
    /// under an ancestor without an editor, editors opened under that
    /// ancestor's later siblings are not found, and the new node is
    /// appended after them.
    fn next_sibling_editor(
        &self,
        scene: &SceneGraph,
        element: ElementId,
        parent: Option<EditorId>,
    ) -> Option<EditorId> {
        let mut sibling = scene.next_sibling(element);
        while let Some(current) = sibling {
            if let Some(editor) = scene.editor_of(current) {
                let same_parent = self
                    .nodes
                    .get(editor)
                    .is_some_and(|n| n.parent == parent);
                if same_parent && (parent.is_some() || self.roots.contains(&editor)) {
                    return Some(editor);
                }
            }
            sibling = scene.next_sibling(current);
        }
        None
    }

    fn insert_root(&mut self, id: EditorId, before: Option<EditorId>) {
        let index = before
            .and_then(|b| self.roots.iter().position(|&r| r == b))
            .unwrap_or(self.roots.len());
        self.roots.insert(index, id);
    }

    /// Detach a node from its parent (or the root list) without failing.
    fn unlink(&mut self, id: EditorId) {
        let parent = self.nodes.get_mut(id).and_then(|n| n.parent.take());
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
    }

    /// Check if `ancestor` is above `id` in the tree.
    fn is_ancestor(&self, ancestor: EditorId, id: EditorId) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes.get(p).and_then(|n| n.parent);
        }
        false
    }
}
