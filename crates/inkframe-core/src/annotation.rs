//! Annotation glyphs: small handles marking part locations.
//!
//! Unit outlines are built once per kind and shared by every paint call.

use crate::paint::PaintContext;
use kurbo::{Affine, BezPath, Point, Rect};
use parking_lot::{Mutex, const_mutex};
use std::f64::consts::FRAC_1_SQRT_2;
use std::sync::Arc;

/// Cubic control distance approximating a quarter circle.
const KAPPA: f64 = 0.552_284_749_8;

/// Stroke margin around an annotation.
const ANNOTATION_MARGIN: f64 = 1.0;

/// Glyph shape of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Square,
    Circle,
    Diamond,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 3] = [
        AnnotationKind::Square,
        AnnotationKind::Circle,
        AnnotationKind::Diamond,
    ];

    fn slot(self) -> &'static Mutex<Option<Arc<AnnotationTemplate>>> {
        match self {
            AnnotationKind::Square => &SQUARE,
            AnnotationKind::Circle => &CIRCLE,
            AnnotationKind::Diamond => &DIAMOND,
        }
    }
}

/// Unit-space outline of an annotation kind.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTemplate {
    /// Closed outline centered on the origin.
    pub outline: BezPath,
    /// Divides the scale so every kind looks the same size.
    pub scale_correction: f64,
}

impl AnnotationTemplate {
    fn build(kind: AnnotationKind) -> Self {
        let mut outline = BezPath::new();
        let scale_correction = match kind {
            AnnotationKind::Square => {
                outline.move_to((-1.0, -1.0));
                outline.line_to((1.0, -1.0));
                outline.line_to((1.0, 1.0));
                outline.line_to((-1.0, 1.0));
                1.0
            }
            AnnotationKind::Circle => {
                outline.move_to((1.0, 0.0));
                outline.curve_to((1.0, KAPPA), (KAPPA, 1.0), (0.0, 1.0));
                outline.curve_to((-KAPPA, 1.0), (-1.0, KAPPA), (-1.0, 0.0));
                outline.curve_to((-1.0, -KAPPA), (-KAPPA, -1.0), (0.0, -1.0));
                outline.curve_to((KAPPA, -1.0), (1.0, -KAPPA), (1.0, 0.0));
                1.0
            }
            AnnotationKind::Diamond => {
                let c = FRAC_1_SQRT_2;
                outline.move_to((0.0, -c));
                outline.line_to((c, 0.0));
                outline.line_to((0.0, c));
                outline.line_to((-c, 0.0));
                c
            }
        };
        outline.close_path();
        Self {
            outline,
            scale_correction,
        }
    }
}

static SQUARE: Mutex<Option<Arc<AnnotationTemplate>>> = const_mutex(None);
static CIRCLE: Mutex<Option<Arc<AnnotationTemplate>>> = const_mutex(None);
static DIAMOND: Mutex<Option<Arc<AnnotationTemplate>>> = const_mutex(None);

/// The shared template for a kind, built on first use.
pub fn template(kind: AnnotationKind) -> Arc<AnnotationTemplate> {
    let mut slot = kind.slot().lock();
    slot.get_or_insert_with(|| {
        log::trace!("Building annotation template {:?}", kind);
        Arc::new(AnnotationTemplate::build(kind))
    })
    .clone()
}

/// Drop every cached template. The next use rebuilds them.
pub fn clear_annotation_templates() {
    for kind in AnnotationKind::ALL {
        kind.slot().lock().take();
    }
}

/// Map `center` to view space and snap it to the pixel grid.
///
/// Selected glyphs are stroked, so they sit on pixel centers.
pub fn snap_center(view: Affine, center: Point, selected: bool) -> Point {
    let p = view * center;
    let offset = if selected { 0.5 } else { 0.0 };
    Point::new(p.x.round() + offset, p.y.round() + offset)
}

/// Draw an annotation glyph of `size` pixels centered on `center`.
///
/// Unselected glyphs are filled with the selection color. Selected glyphs
/// are filled with the annotation fill and stroked with the selection color.
pub fn paint_annotation(
    painter: &mut dyn PaintContext,
    view: Affine,
    center: Point,
    kind: AnnotationKind,
    selected: bool,
    size: f64,
) {
    let template = template(kind);
    let at = snap_center(view, center, selected);
    let scale = size / 2.0 / template.scale_correction;
    let glyph = Affine::translate(at.to_vec2()) * Affine::scale(scale) * template.outline.clone();

    let selection = painter.selection_outline_color();
    if selected {
        let fill = painter.annotation_fill_color();
        painter.fill_path(&glyph, Affine::IDENTITY, fill);
        painter.stroke_path(&glyph, Affine::IDENTITY, selection, 1.0);
    } else {
        painter.fill_path(&glyph, Affine::IDENTITY, selection);
    }
}

/// View-space box covered by an annotation, stroke margin included.
pub fn annotation_bbox(view: Affine, center: Point, selected: bool, size: f64) -> Rect {
    let at = snap_center(view, center, selected);
    let half = size / 2.0 + ANNOTATION_MARGIN;
    Rect::new(at.x - half, at.y - half, at.x + half, at.y + half)
}
