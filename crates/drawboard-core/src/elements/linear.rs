//! Straight connectors: `line` and `arrow`.

use super::{ElementId, ElementTrait, SerializableColor, StrokeStyle, default_opacity, remap_point};
use crate::geometry::{point_to_segment_dist, polyline_intersects_rect};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_stroke_width() -> f64 {
    2.0
}

/// A two-point connector. Arrows additionally draw heads at their flagged ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub start: Point,
    pub end: Point,
    #[serde(default = "SerializableColor::black")]
    pub stroke_color: SerializableColor,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    #[serde(default)]
    pub start_arrowhead: bool,
    #[serde(default)]
    pub end_arrowhead: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl LinearElement {
    /// A plain line with no heads.
    pub fn line(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            stroke_color: SerializableColor::black(),
            stroke_width: default_stroke_width(),
            stroke_style: StrokeStyle::default(),
            start_arrowhead: false,
            end_arrowhead: false,
            opacity: 1.0,
        }
    }

    /// An arrow pointing at `end`.
    pub fn arrow(start: Point, end: Point) -> Self {
        Self {
            end_arrowhead: true,
            ..Self::line(start, end)
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Arrowhead wing points at `tip`, coming from `from`.
    pub fn head_points(from: Point, tip: Point, size: f64) -> Option<[Point; 2]> {
        let dir = tip - from;
        let len = dir.hypot();
        if len < f64::EPSILON {
            return None;
        }
        let back = dir / len * -size;
        let (sin, cos) = (std::f64::consts::FRAC_PI_6).sin_cos();
        let rotate = |v: Vec2, s: f64| Vec2::new(v.x * cos - v.y * s, v.x * s + v.y * cos);
        Some([tip + rotate(back, sin), tip + rotate(back, -sin)])
    }
}

impl ElementTrait for LinearElement {
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
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= self.stroke_width / 2.0 + tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn fit_to(&mut self, bounds: Rect) {
        let from = self.bounds();
        self.start = remap_point(self.start, from, bounds);
        self.end = remap_point(self.end, from, bounds);
    }

    fn representative_points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn intersects_rect(&self, rect: Rect) -> bool {
        polyline_intersects_rect(&[self.start, self.end], rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_uses_half_width() {
        let mut line = LinearElement::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        line.stroke_width = 4.0;
        assert!(line.hit_test(Point::new(50.0, 2.0), 0.0));
        assert!(!line.hit_test(Point::new(50.0, 3.0), 0.0));
        assert!(line.hit_test(Point::new(50.0, 3.0), 1.5));
    }

    #[test]
    fn test_fit_to_keeps_direction() {
        let mut arrow = LinearElement::arrow(Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        arrow.fit_to(Rect::new(0.0, 0.0, 20.0, 40.0));
        assert_eq!(arrow.start, Point::new(20.0, 40.0));
        assert_eq!(arrow.end, Point::new(0.0, 0.0));
        assert!(arrow.end_arrowhead && !arrow.start_arrowhead);
    }

    #[test]
    fn test_diagonal_line_rect_intersection_misses_corner() {
        let line = LinearElement::line(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(line.intersects_rect(Rect::new(40.0, 40.0, 60.0, 60.0)));
        // Inside the bounding box but away from the segment.
        assert!(!line.intersects_rect(Rect::new(70.0, 0.0, 90.0, 20.0)));
    }

    #[test]
    fn test_head_points() {
        let heads = LinearElement::head_points(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 5.0).unwrap();
        assert!(heads.iter().all(|p| p.x < 10.0));
        assert!((heads[0].y + heads[1].y).abs() < 1e-9);
        assert!(LinearElement::head_points(Point::ZERO, Point::ZERO, 5.0).is_none());
    }
}
