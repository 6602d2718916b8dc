//! Scene graph: the persistent document tree editors are attached to.

use crate::editor::EditorId;
use crate::error::{SceneError, SceneResult};
use crate::geometry::Geometry;
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for scene elements.
pub type ElementId = Uuid;

/// The kind of a scene element. Editor factories are registered per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Page,
    Group,
    Rectangle,
    Ellipse,
    Polygon,
    Path,
}

impl ElementKind {
    /// Check if elements of this kind hold children.
    pub fn is_container(self) -> bool {
        matches!(self, ElementKind::Page | ElementKind::Group)
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    /// Own geometry (containers have none).
    pub geometry: Geometry,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Attachment slot for the editor currently editing this element.
    editor: Option<EditorId>,
}

impl Element {
    fn new(kind: ElementKind, geometry: Geometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            geometry,
            parent: None,
            children: Vec::new(),
            editor: None,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// The editor attached to this element, if any.
    pub fn editor(&self) -> Option<EditorId> {
        self.editor
    }
}

/// The document tree: pages at the top, groups and shapes below.
///
/// Elements that are created but not inserted, or that were detached, stay
/// in the graph but are not live.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    elements: HashMap<ElementId, Element>,
    /// Page roots in document order.
    pages: Vec<ElementId>,
}

impl SceneGraph {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new page at the end of the document.
    pub fn add_page(&mut self) -> ElementId {
        let page = Element::new(ElementKind::Page, Geometry::None);
        let id = page.id;
        self.elements.insert(id, page);
        self.pages.push(id);
        id
    }

    /// Create a detached element.
    pub fn create(&mut self, kind: ElementKind, geometry: Geometry) -> ElementId {
        let element = Element::new(kind, geometry);
        let id = element.id;
        self.elements.insert(id, element);
        id
    }

    /// Page roots in document order.
    pub fn pages(&self) -> &[ElementId] {
        &self.pages
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Number of elements, live or not.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> SceneResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent`, before `before` or at the end.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        before: Option<ElementId>,
    ) -> SceneResult<()> {
        let child_el = self.get(child)?;
        if child_el.kind == ElementKind::Page {
            return Err(SceneError::NestedPage(child));
        }
        if child_el.parent.is_some() {
            return Err(SceneError::AlreadyParented(child));
        }
        if !self.get(parent)?.kind.is_container() {
            return Err(SceneError::NotAContainer(parent));
        }
        if self.ancestors(parent).any(|a| a == child) || parent == child {
            return Err(SceneError::Cycle { parent, child });
        }

        let siblings = &self.get(parent)?.children;
        let index = match before {
            Some(anchor) => siblings
                .iter()
                .position(|&id| id == anchor)
                .ok_or(SceneError::UnknownSibling { parent, anchor })?,
            None => siblings.len(),
        };

        self.get_mut(parent)?.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink an element (and its subtree) from its parent, or a page from the document.
    pub fn detach(&mut self, id: ElementId) -> SceneResult<()> {
        match self.get(id)?.parent {
            Some(parent) => {
                self.get_mut(parent)?.children.retain(|&c| c != id);
                self.get_mut(id)?.parent = None;
            }
            None => self.pages.retain(|&p| p != id),
        }
        Ok(())
    }

    /// Deep-copy an element into a new detached subtree with fresh ids.
    ///
    /// Clones never carry editors.
    pub fn clone_element(&mut self, id: ElementId) -> SceneResult<ElementId> {
        let source = self.get(id)?;
        let (kind, geometry) = (source.kind, source.geometry.clone());
        let children = source.children.clone();

        let copy = self.create(kind, geometry);
        for child in children {
            let child_copy = self.clone_element(child)?;
            self.get_mut(copy)?.children.push(child_copy);
            self.get_mut(child_copy)?.parent = Some(copy);
        }
        Ok(copy)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(&id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// The element following `id` among its siblings (pages count as siblings).
    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.siblings(id)?;
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings.get(pos + 1).copied()
    }

    /// The element preceding `id` among its siblings.
    pub fn previous_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.siblings(id)?;
        let pos = siblings.iter().position(|&s| s == id)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    /// Check if an element is reachable from a page root.
    pub fn is_live(&self, id: ElementId) -> bool {
        let Some(element) = self.elements.get(&id) else {
            return false;
        };
        let top = self.ancestors(id).last().unwrap_or(element.id);
        self.pages.contains(&top)
    }

    /// Iterate over the ancestors of an element, nearest first.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.parent(id), move |&a| self.parent(a))
    }

    /// Bounding box of an element, including its descendants.
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        let element = self.elements.get(&id)?;
        let own = element.geometry.bounds();
        element
            .children
            .iter()
            .filter_map(|&c| self.bounds(c))
            .fold(own, |acc, b| Some(acc.map_or(b, |r| r.union(b))))
    }

    /// Combined outline of an element and its descendants.
    pub fn outline(&self, id: ElementId) -> BezPath {
        let Some(element) = self.elements.get(&id) else {
            return BezPath::new();
        };
        let mut path = element.geometry.to_path();
        for &child in &element.children {
            path.extend(self.outline(child));
        }
        path
    }

    /// Apply a transform to an element and all of its descendants.
    pub fn apply_transform(&mut self, id: ElementId, affine: Affine) -> SceneResult<()> {
        let element = self.get_mut(id)?;
        element.geometry.transform(affine);
        let children = element.children.clone();
        for child in children {
            self.apply_transform(child, affine)?;
        }
        log::trace!("Applied transform {:?} to element {}", affine.as_coeffs(), id);
        Ok(())
    }

    /// The editor attached to an element, if any.
    pub fn editor_of(&self, id: ElementId) -> Option<EditorId> {
        self.elements.get(&id).and_then(|e| e.editor)
    }

    /// Fill or clear the attachment slot. Only the editor tree does this.
    pub(crate) fn set_editor(&mut self, id: ElementId, editor: Option<EditorId>) -> SceneResult<()> {
        self.get_mut(id)?.editor = editor;
        Ok(())
    }

    fn siblings(&self, id: ElementId) -> Option<&[ElementId]> {
        let element = self.elements.get(&id)?;
        match element.parent {
            Some(parent) => self.elements.get(&parent).map(|p| p.children.as_slice()),
            None if self.pages.contains(&id) => Some(&self.pages),
            None => None,
        }
    }

    fn get(&self, id: ElementId) -> SceneResult<&Element> {
        self.elements.get(&id).ok_or(SceneError::UnknownElement(id))
    }

    fn get_mut(&mut self, id: ElementId) -> SceneResult<&mut Element> {
        self.elements.get_mut(&id).ok_or(SceneError::UnknownElement(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Geometry {
        Geometry::Rect(Rect::new(x, y, x + w, y + h))
    }

    #[test]
    fn test_append_and_navigate() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let a = scene.create(ElementKind::Rectangle, rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.create(ElementKind::Rectangle, rect(20.0, 0.0, 10.0, 10.0));
        scene.append_child(page, a).unwrap();
        scene.append_child(page, b).unwrap();

        assert_eq!(scene.children(page), &[a, b]);
        assert_eq!(scene.parent(a), Some(page));
        assert_eq!(scene.next_sibling(a), Some(b));
        assert_eq!(scene.next_sibling(b), None);
        assert_eq!(scene.previous_sibling(b), Some(a));
        assert_eq!(scene.previous_sibling(a), None);
    }

    #[test]
    fn test_insert_before() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let a = scene.create(ElementKind::Rectangle, Geometry::None);
        let b = scene.create(ElementKind::Rectangle, Geometry::None);
        scene.append_child(page, b).unwrap();
        scene.insert_before(page, a, Some(b)).unwrap();
        assert_eq!(scene.children(page), &[a, b]);
    }

    #[test]
    fn test_insert_errors() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let group = scene.create(ElementKind::Group, Geometry::None);
        let a = scene.create(ElementKind::Rectangle, Geometry::None);
        let stray = scene.create(ElementKind::Rectangle, Geometry::None);
        scene.append_child(page, group).unwrap();
        scene.append_child(group, a).unwrap();

        assert_eq!(scene.append_child(page, a), Err(SceneError::AlreadyParented(a)));
        assert_eq!(
            scene.insert_before(page, stray, Some(a)),
            Err(SceneError::UnknownSibling { parent: page, anchor: a })
        );
        assert_eq!(
            scene.append_child(a, stray),
            Err(SceneError::NotAContainer(a))
        );
        let inner = scene.create(ElementKind::Group, Geometry::None);
        scene.append_child(group, inner).unwrap();
        scene.detach(group).unwrap();
        assert_eq!(
            scene.append_child(inner, group),
            Err(SceneError::Cycle { parent: inner, child: group })
        );
        let other_page = scene.add_page();
        assert_eq!(
            scene.append_child(page, other_page),
            Err(SceneError::NestedPage(other_page))
        );
    }

    #[test]
    fn test_liveness() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let group = scene.create(ElementKind::Group, Geometry::None);
        let a = scene.create(ElementKind::Rectangle, Geometry::None);
        assert!(scene.is_live(page));
        assert!(!scene.is_live(a));

        scene.append_child(page, group).unwrap();
        scene.append_child(group, a).unwrap();
        assert!(scene.is_live(a));

        scene.detach(group).unwrap();
        assert!(!scene.is_live(a));
        assert!(!scene.is_live(group));

        scene.detach(page).unwrap();
        assert!(!scene.is_live(page));
    }

    #[test]
    fn test_container_bounds() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let group = scene.create(ElementKind::Group, Geometry::None);
        let a = scene.create(ElementKind::Rectangle, rect(0.0, 0.0, 100.0, 50.0));
        let b = scene.create(ElementKind::Rectangle, rect(200.0, 200.0, 50.0, 100.0));
        scene.append_child(page, group).unwrap();
        scene.append_child(group, a).unwrap();
        scene.append_child(group, b).unwrap();

        let bounds = scene.bounds(group).unwrap();
        assert!((bounds.x1 - 250.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 300.0).abs() < f64::EPSILON);
        let empty_page = scene.add_page();
        assert!(scene.bounds(empty_page).is_none());
    }

    #[test]
    fn test_outline_includes_children() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let a = scene.create(ElementKind::Rectangle, rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.create(ElementKind::Polygon, Geometry::polygon([Point::ZERO, Point::new(5.0, 5.0)]));
        scene.append_child(page, a).unwrap();
        scene.append_child(page, b).unwrap();

        let own = scene.outline(a).elements().len() + scene.outline(b).elements().len();
        assert_eq!(scene.outline(page).elements().len(), own);
    }

    #[test]
    fn test_clone_element() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let group = scene.create(ElementKind::Group, Geometry::None);
        let a = scene.create(ElementKind::Polygon, Geometry::polygon([Point::ZERO, Point::new(1.0, 1.0)]));
        scene.append_child(page, group).unwrap();
        scene.append_child(group, a).unwrap();

        let copy = scene.clone_element(group).unwrap();
        assert_ne!(copy, group);
        assert!(!scene.is_live(copy));
        let copied_children = scene.children(copy).to_vec();
        assert_eq!(copied_children.len(), 1);
        assert_ne!(copied_children[0], a);
        assert_eq!(
            scene.element(copied_children[0]).unwrap().geometry,
            scene.element(a).unwrap().geometry
        );
    }

    #[test]
    fn test_apply_transform_recurses() {
        let mut scene = SceneGraph::new();
        let page = scene.add_page();
        let group = scene.create(ElementKind::Group, Geometry::None);
        let a = scene.create(ElementKind::Rectangle, rect(0.0, 0.0, 10.0, 10.0));
        scene.append_child(page, group).unwrap();
        scene.append_child(group, a).unwrap();

        scene.apply_transform(group, Affine::translate((10.0, 0.0))).unwrap();
        assert_eq!(scene.bounds(a), Some(Rect::new(10.0, 0.0, 20.0, 10.0)));
    }
}
