//! Registry mapping element kinds to editor factories.

use super::behavior::ElementEditor;
use crate::editors::{ContainerEditor, PolygonEditor, ShapeEditor};
use crate::scene::{Element, ElementKind};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Builds the editor for an element.
pub type EditorFactory = Arc<dyn Fn(&Element) -> Box<dyn ElementEditor> + Send + Sync>;

/// A registry shared between trees and the host.
pub type SharedRegistry = Arc<RwLock<EditorRegistry>>;

static GLOBAL_REGISTRY: OnceLock<SharedRegistry> = OnceLock::new();

/// Maps element kinds to the factory producing their editor.
///
/// Kinds without a factory are not editable.
#[derive(Clone, Default)]
pub struct EditorRegistry {
    factories: HashMap<ElementKind, EditorFactory>,
}

impl EditorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in editors for every element kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ElementKind::Page, |_| Box::new(ContainerEditor));
        registry.register(ElementKind::Group, |_| Box::new(ContainerEditor));
        registry.register(ElementKind::Rectangle, |_| Box::new(ShapeEditor));
        registry.register(ElementKind::Ellipse, |_| Box::new(ShapeEditor));
        registry.register(ElementKind::Path, |_| Box::new(ShapeEditor));
        registry.register(ElementKind::Polygon, |_| Box::new(PolygonEditor::default()));
        registry
    }

    /// The process-wide registry, built with the defaults on first use.
    pub fn global() -> SharedRegistry {
        GLOBAL_REGISTRY
            .get_or_init(|| Arc::new(RwLock::new(Self::with_defaults())))
            .clone()
    }

    /// Wrap this registry for sharing.
    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Register the factory for a kind, replacing any previous one.
    pub fn register<F>(&mut self, kind: ElementKind, factory: F)
    where
        F: Fn(&Element) -> Box<dyn ElementEditor> + Send + Sync + 'static,
    {
        if self.factories.insert(kind, Arc::new(factory)).is_some() {
            log::debug!("Replaced editor factory for {:?}", kind);
        }
    }

    /// Remove the factory for a kind. Returns true if one was registered.
    pub fn unregister(&mut self, kind: ElementKind) -> bool {
        self.factories.remove(&kind).is_some()
    }

    /// Remove every factory.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    pub fn is_registered(&self, kind: ElementKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Create the editor for an element, or `None` if its kind is not registered.
    pub fn create(&self, element: &Element) -> Option<Box<dyn ElementEditor>> {
        self.factories.get(&element.kind()).map(|factory| factory(element))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for EditorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
