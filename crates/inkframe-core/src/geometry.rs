//! Element geometry.

use kurbo::{Affine, BezPath, Ellipse, Point, Rect, Shape as KurboShape};

/// Tolerance used when flattening curves into paths.
const PATH_TOLERANCE: f64 = 0.1;

/// The geometric content of a scene element.
///
/// Containers (pages and groups) carry no geometry of their own; their
/// bounds come from their children.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Geometry {
    #[default]
    None,
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Axis-aligned ellipse inscribed in the given rectangle.
    Ellipse(Rect),
    /// Closed polygon.
    Polygon(Vec<Point>),
    /// Arbitrary path.
    Path(BezPath),
}

impl Geometry {
    /// Create a polygon from its vertices.
    pub fn polygon(points: impl IntoIterator<Item = Point>) -> Self {
        Self::Polygon(points.into_iter().collect())
    }

    /// Bounding box in element coordinates, `None` when there is nothing to bound.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Geometry::None => None,
            Geometry::Rect(r) | Geometry::Ellipse(r) => Some(*r),
            Geometry::Polygon(points) => {
                let (first, rest) = points.split_first()?;
                Some(
                    rest.iter()
                        .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p)),
                )
            }
            Geometry::Path(path) => {
                if path.elements().is_empty() {
                    None
                } else {
                    Some(path.bounding_box())
                }
            }
        }
    }

    /// Outline path for rendering.
    pub fn to_path(&self) -> BezPath {
        match self {
            Geometry::None => BezPath::new(),
            Geometry::Rect(r) => r.to_path(PATH_TOLERANCE),
            Geometry::Ellipse(r) => Ellipse::from_rect(*r).to_path(PATH_TOLERANCE),
            Geometry::Polygon(points) => {
                let mut path = BezPath::new();
                if let Some((first, rest)) = points.split_first() {
                    path.move_to(*first);
                    for p in rest {
                        path.line_to(*p);
                    }
                    path.close_path();
                }
                path
            }
            Geometry::Path(path) => path.clone(),
        }
    }

    /// Apply an affine transform.
    ///
    /// Rectangles and ellipses stay in their compact form under
    /// axis-aligned transforms and become polygons/paths otherwise.
    pub fn transform(&mut self, affine: Affine) {
        match self {
            Geometry::None => {}
            Geometry::Rect(r) => {
                if is_axis_aligned(affine) {
                    *r = affine.transform_rect_bbox(*r);
                } else {
                    let corners = [
                        Point::new(r.x0, r.y0),
                        Point::new(r.x1, r.y0),
                        Point::new(r.x1, r.y1),
                        Point::new(r.x0, r.y1),
                    ];
                    *self = Geometry::polygon(corners.map(|p| affine * p));
                }
            }
            Geometry::Ellipse(r) => {
                if is_axis_aligned(affine) {
                    *r = affine.transform_rect_bbox(*r);
                } else {
                    let path = Ellipse::from_rect(*r).to_path(PATH_TOLERANCE);
                    *self = Geometry::Path(affine * path);
                }
            }
            Geometry::Polygon(points) => {
                for p in points.iter_mut() {
                    *p = affine * *p;
                }
            }
            Geometry::Path(path) => path.apply_affine(affine),
        }
    }

    /// Vertices of a polygon, empty for other geometry.
    pub fn vertices(&self) -> &[Point] {
        match self {
            Geometry::Polygon(points) => points,
            _ => &[],
        }
    }
}

/// True if the transform maps axis-aligned rectangles to axis-aligned rectangles.
///
/// Holds for scales and translations, and for quarter turns (which swap axes).
pub fn is_axis_aligned(affine: Affine) -> bool {
    let [a, b, c, d, _, _] = affine.as_coeffs();
    let near_zero = |v: f64| v.abs() < f64::EPSILON;
    (near_zero(b) && near_zero(c)) || (near_zero(a) && near_zero(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds() {
        let geometry = Geometry::Rect(Rect::new(10.0, 20.0, 110.0, 70.0));
        let bounds = geometry.bounds().unwrap();
        assert!((bounds.width() - 100.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        assert!(Geometry::None.bounds().is_none());
        assert!(Geometry::Polygon(Vec::new()).bounds().is_none());
        assert!(Geometry::Path(BezPath::new()).bounds().is_none());
    }

    #[test]
    fn test_polygon_bounds() {
        let geometry = Geometry::polygon([
            Point::new(0.0, 0.0),
            Point::new(40.0, 10.0),
            Point::new(20.0, 30.0),
        ]);
        assert_eq!(geometry.bounds(), Some(Rect::new(0.0, 0.0, 40.0, 30.0)));
    }

    #[test]
    fn test_translate_rect() {
        let mut geometry = Geometry::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        geometry.transform(Affine::translate((5.0, 5.0)));
        assert_eq!(geometry, Geometry::Rect(Rect::new(5.0, 5.0, 15.0, 15.0)));
    }

    #[test]
    fn test_rotated_rect_becomes_polygon() {
        let mut geometry = Geometry::Rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        geometry.transform(Affine::rotate(std::f64::consts::FRAC_PI_4));
        assert_eq!(geometry.vertices().len(), 4);
    }

    #[test]
    fn test_quarter_turn_keeps_rect() {
        let mut geometry = Geometry::Rect(Rect::new(0.0, 0.0, 20.0, 10.0));
        geometry.transform(Affine::rotate(std::f64::consts::FRAC_PI_2));
        let Geometry::Rect(r) = geometry else {
            panic!("expected a rect, got {geometry:?}");
        };
        assert!((r.x0 + 10.0).abs() < 1e-9 && r.x1.abs() < 1e-9);
        assert!(r.y0.abs() < 1e-9 && (r.y1 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_aligned() {
        assert!(is_axis_aligned(Affine::scale(2.0)));
        assert!(is_axis_aligned(Affine::translate((3.0, 4.0))));
        assert!(!is_axis_aligned(Affine::rotate(0.3)));
        assert!(is_axis_aligned(Affine::new([0.0, 1.0, -1.0, 0.0, 5.0, 0.0])));
    }
}
