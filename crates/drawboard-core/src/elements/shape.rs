//! Box-shaped primitives: rectangle, diamond and circle.

use super::{ElementId, ElementTrait, SerializableColor, StrokeStyle, box_rect, default_opacity};
use crate::geometry::{diamond_vertices, point_in_polygon, point_to_polygon_edge_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_stroke_width() -> f64 {
    2.0
}

fn default_fill() -> SerializableColor {
    SerializableColor::transparent()
}

/// Geometry and style shared by `rect`, `diamond` and `circle`.
///
/// The variant tag decides how the box is interpreted: the diamond is inscribed
/// through the edge midpoints and the circle is the inscribed ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "SerializableColor::black")]
    pub stroke_color: SerializableColor,
    /// Transparent means unfilled.
    #[serde(default = "default_fill")]
    pub fill_color: SerializableColor,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ShapeElement {
    /// A default-styled shape covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        let bounds = bounds.abs();
        Self {
            id: Uuid::new_v4(),
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            stroke_color: SerializableColor::black(),
            fill_color: default_fill(),
            stroke_width: default_stroke_width(),
            stroke_style: StrokeStyle::default(),
            opacity: 1.0,
        }
    }

    /// Create from two opposite corners in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(Rect::from_points(p1, p2))
    }

    pub fn as_rect(&self) -> Rect {
        box_rect(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn hit_test_diamond(&self, point: Point, tolerance: f64) -> bool {
        let vertices = diamond_vertices(self.as_rect());
        point_in_polygon(point, &vertices)
            || point_to_polygon_edge_dist(point, &vertices) <= tolerance + self.stroke_width / 2.0
    }

    pub(crate) fn hit_test_ellipse(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        let center = rect.center();
        let slack = tolerance + self.stroke_width / 2.0;
        let rx = rect.width() / 2.0 + slack;
        let ry = rect.height() / 2.0 + slack;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }
}

impl ElementTrait for ShapeElement {
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
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        crate::geometry::rect_contains(self.as_rect().inflate(tolerance, tolerance), point)
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    fn fit_to(&mut self, bounds: Rect) {
        self.x = bounds.x0;
        self.y = bounds.y0;
        self.width = bounds.width();
        self.height = bounds.height();
    }
}
