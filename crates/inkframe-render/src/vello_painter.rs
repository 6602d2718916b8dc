//! Vello-backed paint context.

use inkframe_core::{EditorSettings, EditorTree, PaintContext, SceneGraph};
use kurbo::{Affine, BezPath, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Records editor decoration into a Vello scene.
pub struct VelloPainter {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
    /// Interior of selected annotations.
    annotation_fill: Color,
}

impl Default for VelloPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloPainter {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            annotation_fill: Color::WHITE,
        }
    }

    /// Create a painter using the colors from the settings.
    pub fn with_settings(settings: &EditorSettings) -> Self {
        Self {
            scene: Scene::new(),
            selection_color: settings.selection_color.into(),
            annotation_fill: settings.annotation_fill.into(),
        }
    }

    pub fn set_selection_color(&mut self, color: Color) {
        self.selection_color = color;
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Clear the scene and paint every editor of `tree` into it.
    pub fn render_tree(&mut self, tree: &EditorTree, scene: &SceneGraph, view: Affine) {
        self.scene.reset();
        tree.paint(scene, self, view);
        log::trace!("Painted {} editor roots", tree.roots().len());
    }
}

impl PaintContext for VelloPainter {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.scene.fill(Fill::NonZero, transform, color, None, path);
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64) {
        self.scene.stroke(&Stroke::new(width), transform, color, None, path);
    }

    fn selection_outline_color(&self) -> Color {
        self.selection_color
    }

    fn annotation_fill_color(&self) -> Color {
        self.annotation_fill
    }
}
