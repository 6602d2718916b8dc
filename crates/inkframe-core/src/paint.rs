//! Paint context contract and a recording implementation.

use kurbo::{Affine, BezPath};
use peniko::Color;

/// Drawing surface the editor tree paints its decoration into.
pub trait PaintContext {
    /// Fill a path with the non-zero rule.
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color);

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64);

    /// Color of selection outlines and unselected annotations.
    fn selection_outline_color(&self) -> Color;

    /// Interior of selected annotations.
    fn annotation_fill_color(&self) -> Color {
        Color::WHITE
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Fill {
        path: BezPath,
        transform: Affine,
        color: Color,
    },
    Stroke {
        path: BezPath,
        transform: Affine,
        color: Color,
        width: f64,
    },
}

impl PaintCommand {
    pub fn path(&self) -> &BezPath {
        match self {
            PaintCommand::Fill { path, .. } | PaintCommand::Stroke { path, .. } => path,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PaintCommand::Fill { color, .. } | PaintCommand::Stroke { color, .. } => *color,
        }
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self, PaintCommand::Stroke { .. })
    }
}

/// Records draw calls in order, for headless hosts and tests.
#[derive(Debug, Clone)]
pub struct DisplayList {
    commands: Vec<PaintCommand>,
    selection_color: Color,
    annotation_fill: Color,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new(Color::from_rgba8(59, 130, 246, 255))
    }
}

impl DisplayList {
    pub fn new(selection_color: Color) -> Self {
        Self {
            commands: Vec::new(),
            selection_color,
            annotation_fill: Color::WHITE,
        }
    }

    /// Create a recorder using the colors from the settings.
    pub fn from_settings(settings: &crate::settings::EditorSettings) -> Self {
        Self {
            commands: Vec::new(),
            selection_color: settings.selection_color.into(),
            annotation_fill: settings.annotation_fill.into(),
        }
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl PaintContext for DisplayList {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.commands.push(PaintCommand::Fill {
            path: path.clone(),
            transform,
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64) {
        self.commands.push(PaintCommand::Stroke {
            path: path.clone(),
            transform,
            color,
            width,
        });
    }

    fn selection_outline_color(&self) -> Color {
        self.selection_color
    }

    fn annotation_fill_color(&self) -> Color {
        self.annotation_fill
    }
}
