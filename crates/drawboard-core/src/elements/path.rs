//! Freehand pen strokes.

use super::{ElementId, ElementTrait, SerializableColor, default_opacity, remap_point};
use crate::geometry::{bounding_box, point_to_segment_dist, polyline_intersects_rect, rect_contains};
use crate::stroke::{MIN_RADIUS, StrokePoint, is_pressure_tagged};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed slack (world units) added around a stroke's half-width when hit-testing.
pub const PATH_HIT_TOLERANCE: f64 = 4.0;

fn default_stroke_width() -> f64 {
    2.0
}

/// Cached extrema of a path's samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PathBounds {
    fn of(points: &[StrokePoint]) -> Self {
        bounding_box(points.iter().map(StrokePoint::position))
            .map(Self::from)
            .unwrap_or_default()
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<Rect> for PathBounds {
    fn from(rect: Rect) -> Self {
        Self {
            min_x: rect.x0,
            min_y: rect.y0,
            max_x: rect.x1,
            max_y: rect.y1,
        }
    }
}

/// Wire form; bounds are always recomputed on the way in.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathRepr {
    #[serde(default = "Uuid::new_v4")]
    id: ElementId,
    points: Vec<StrokePoint>,
    #[serde(default)]
    bounds: PathBounds,
    #[serde(default = "SerializableColor::black")]
    stroke_color: SerializableColor,
    #[serde(default = "default_stroke_width")]
    stroke_width: f64,
    #[serde(default = "default_opacity")]
    opacity: f64,
}

/// A freehand stroke. Samples are private so the cached bounds can never go stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PathRepr", into = "PathRepr")]
pub struct PathElement {
    pub(crate) id: ElementId,
    points: Vec<StrokePoint>,
    bounds: PathBounds,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl From<PathRepr> for PathElement {
    fn from(repr: PathRepr) -> Self {
        Self {
            id: repr.id,
            bounds: PathBounds::of(&repr.points),
            points: repr.points,
            stroke_color: repr.stroke_color,
            stroke_width: repr.stroke_width,
            opacity: repr.opacity,
        }
    }
}

impl From<PathElement> for PathRepr {
    fn from(path: PathElement) -> Self {
        Self {
            id: path.id,
            points: path.points,
            bounds: path.bounds,
            stroke_color: path.stroke_color,
            stroke_width: path.stroke_width,
            opacity: path.opacity,
        }
    }
}

impl PathElement {
    pub fn new(points: Vec<StrokePoint>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bounds: PathBounds::of(&points),
            points,
            stroke_color: SerializableColor::black(),
            stroke_width: default_stroke_width(),
            opacity: 1.0,
        }
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn cached_bounds(&self) -> PathBounds {
        self.bounds
    }

    pub fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
        self.bounds = PathBounds::of(&self.points);
    }

    /// Replace all samples.
    pub fn set_points(&mut self, points: Vec<StrokePoint>) {
        self.bounds = PathBounds::of(&points);
        self.points = points;
    }

    pub fn has_pressure(&self) -> bool {
        is_pressure_tagged(&self.points)
    }

    /// Effective half-width of the segment `a -> b`.
    fn half_width(&self, a: &StrokePoint, b: &StrokePoint) -> f64 {
        match (a.pressure, b.pressure) {
            (None, None) => self.stroke_width / 2.0,
            _ => a.effective_pressure().max(b.effective_pressure()) * self.stroke_width + MIN_RADIUS,
        }
    }

    fn positions(&self) -> Vec<Point> {
        self.points.iter().map(StrokePoint::position).collect()
    }
}

impl ElementTrait for PathElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn bounds(&self) -> Rect {
        self.bounds.to_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = |half_width: f64| half_width + tolerance;
        match self.points.as_slice() {
            [] => false,
            [only] => {
                point.distance(only.position()) <= reach(self.half_width(only, only))
            }
            points => {
                // Cheap reject against the cached box first.
                let slack = reach(self.stroke_width + MIN_RADIUS);
                if !rect_contains(self.bounds().inflate(slack, slack), point) {
                    return false;
                }
                points.windows(2).any(|w| {
                    point_to_segment_dist(point, w[0].position(), w[1].position())
                        <= reach(self.half_width(&w[0], &w[1]))
                })
            }
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p = p.translated(delta);
        }
        self.bounds = PathBounds::of(&self.points);
    }

    fn fit_to(&mut self, bounds: Rect) {
        let from = self.bounds();
        for p in &mut self.points {
            let mapped = remap_point(p.position(), from, bounds);
            p.x = mapped.x;
            p.y = mapped.y;
        }
        self.bounds = PathBounds::of(&self.points);
    }

    fn representative_points(&self) -> Vec<Point> {
        self.positions()
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        polyline_intersects_rect(&self.positions(), rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(points: &[(f64, f64)]) -> PathElement {
        PathElement::new(points.iter().map(|&(x, y)| StrokePoint::new(x, y)).collect())
    }

    #[test]
    fn test_bounds_track_every_mutation() {
        let mut path = plain(&[(0.0, 0.0), (10.0, 5.0)]);
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 10.0, 5.0));

        path.push(StrokePoint::new(-3.0, 20.0));
        assert_eq!(path.bounds(), Rect::new(-3.0, 0.0, 10.0, 20.0));

        path.translate(Vec2::new(3.0, 0.0));
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 13.0, 20.0));

        path.fit_to(Rect::new(0.0, 0.0, 26.0, 10.0));
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 26.0, 10.0));

        path.set_points(vec![StrokePoint::new(1.0, 1.0)]);
        assert_eq!(path.bounds(), Rect::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_deserialize_recomputes_stale_bounds() {
        let json = r#"{
            "points": [{"x": 0, "y": 0}, {"x": 4, "y": 8, "pressure": 0.5}],
            "bounds": {"minX": 100, "minY": 100, "maxX": 200, "maxY": 200}
        }"#;
        let path: PathElement = serde_json::from_str(json).unwrap();
        assert_eq!(path.cached_bounds(), PathBounds { min_x: 0.0, min_y: 0.0, max_x: 4.0, max_y: 8.0 });
        let value = serde_json::to_value(&path).unwrap();
        assert_eq!(value["bounds"]["maxY"], 8.0);
        assert!(value["points"][0].get("pressure").is_none());
    }

    #[test]
    fn test_hit_on_segment_with_half_width_tolerance() {
        let mut path = plain(&[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
        path.stroke_width = 6.0;
        for t in [0.0, 0.3, 0.77, 1.0] {
            assert!(path.hit_test(Point::new(50.0 * t, 0.0), 3.0));
            assert!(path.hit_test(Point::new(50.0, 50.0 * t), 3.0));
        }
        assert!(!path.hit_test(Point::new(25.0, 25.0), 3.0));
    }

    #[test]
    fn test_pressure_widens_hit_area() {
        let mut path = PathElement::new(vec![
            StrokePoint::with_pressure(0.0, 0.0, 1.0),
            StrokePoint::with_pressure(100.0, 0.0, 1.0),
        ]);
        path.stroke_width = 4.0;
        // Half-width is 1.0 * 4 + 1 = 5.
        assert!(path.hit_test(Point::new(50.0, 5.0), 0.0));
        assert!(path.hit_test(Point::new(50.0, -5.0), 0.0));
        assert!(!path.hit_test(Point::new(50.0, 5.5), 0.0));
        assert!(!path.hit_test(Point::new(50.0, -5.5), 0.0));
    }

    #[test]
    fn test_empty_path_never_hits() {
        let path = plain(&[]);
        assert!(!path.hit_test(Point::ZERO, 100.0));
        assert_eq!(path.bounds(), Rect::ZERO);
    }
}
