//! Stroke geometry: pressure samples to fillable outlines or smoothed centrelines.
//!
//! Everything here is pure (samples + size in, vertices out) so renderers of any
//! flavour can consume the result and tests can run headless.

use crate::geometry::rect_contains;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::Range;

/// Pressure used for radius computation when a sample carries none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Number of Chaikin corner-cutting passes applied before offsetting.
pub const CHAIKIN_PASSES: usize = 2;

/// Fan segments used to tessellate each round end cap.
pub const CAP_SEGMENTS: usize = 8;

/// Minimum radius added to every sample so zero pressure still draws.
pub const MIN_RADIUS: f64 = 1.0;

/// A raw input sample, optionally pressure-tagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

impl StrokePoint {
    /// A sample without pressure information.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, pressure: None }
    }

    /// A pressure-tagged sample; pressure is clamped to `[0, 1]`.
    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            x,
            y,
            pressure: Some(pressure.clamp(0.0, 1.0)),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Pressure for radius computation, falling back to [`DEFAULT_PRESSURE`].
    pub fn effective_pressure(&self) -> f64 {
        self.pressure.unwrap_or(DEFAULT_PRESSURE)
    }

    /// Copy of this sample moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            pressure: self.pressure,
        }
    }

    fn lerp(&self, other: &Self, t: f64) -> Self {
        let pressure = match (self.pressure, other.pressure) {
            (None, None) => None,
            (a, b) => {
                let a = a.unwrap_or(DEFAULT_PRESSURE);
                let b = b.unwrap_or(DEFAULT_PRESSURE);
                Some(a + (b - a) * t)
            }
        };
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            pressure,
        }
    }
}

impl From<Point> for StrokePoint {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Whether a sample sequence should take the variable-width outline path.
pub fn is_pressure_tagged(points: &[StrokePoint]) -> bool {
    points.iter().any(|p| p.pressure.is_some())
}

/// One Chaikin corner-cutting pass.
///
/// Every consecutive pair contributes its 1/4 and 3/4 interpolants; the first and
/// last samples are kept so the stroke does not shrink at its ends.
pub fn chaikin_pass(points: &[StrokePoint]) -> Vec<StrokePoint> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len() * 2 + 2);
    out.push(points[0]);
    for w in points.windows(2) {
        out.push(w[0].lerp(&w[1], 0.25));
        out.push(w[0].lerp(&w[1], 0.75));
    }
    out.push(points[points.len() - 1]);
    out
}

/// Apply [`CHAIKIN_PASSES`] smoothing passes.
pub fn smooth(points: &[StrokePoint]) -> Vec<StrokePoint> {
    let mut out = points.to_vec();
    for _ in 0..CHAIKIN_PASSES {
        out = chaikin_pass(&out);
    }
    out
}

/// Unit tangents by central difference (one-sided at the ends).
fn tangents(points: &[StrokePoint]) -> Vec<Vec2> {
    let n = points.len();
    let mut out = Vec::with_capacity(n);
    let mut last = Vec2::new(1.0, 0.0);
    for i in 0..n {
        let (a, b) = match i {
            0 => (points[0], points[1.min(n - 1)]),
            i if i == n - 1 => (points[i - 1], points[i]),
            i => (points[i - 1], points[i + 1]),
        };
        let d = b.position() - a.position();
        let len = d.hypot();
        // Coincident samples reuse the previous direction.
        if len > f64::EPSILON {
            last = d / len;
        }
        out.push(last);
    }
    out
}

fn fan(center: Point, radius: f64, from_angle: f64, sweep: f64) -> impl Iterator<Item = Point> {
    (1..CAP_SEGMENTS).map(move |k| {
        let a = from_angle + sweep * k as f64 / CAP_SEGMENTS as f64;
        Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
    })
}

/// Build the closed outline polygon of a variable-width stroke.
///
/// Radius per smoothed sample is `pressure * size + 1`. The polygon is
/// `start cap ++ left chain ++ end cap ++ reverse(right chain)`.
/// Returns an empty vector when fewer than two samples are given or the
/// outline would have fewer than three vertices; callers skip drawing.
pub fn outline_polygon(points: &[StrokePoint], size: f64) -> Vec<Point> {
    if points.len() < 2 {
        return Vec::new();
    }
    let smoothed = smooth(points);
    let tangents = tangents(&smoothed);

    let mut left = Vec::with_capacity(smoothed.len());
    let mut right = Vec::with_capacity(smoothed.len());
    let mut radii = Vec::with_capacity(smoothed.len());
    for (p, t) in smoothed.iter().zip(&tangents) {
        let r = p.effective_pressure() * size + MIN_RADIUS;
        let normal = Vec2::new(-t.y, t.x);
        left.push(p.position() + normal * r);
        right.push(p.position() - normal * r);
        radii.push(r);
    }

    let first = smoothed[0].position();
    let last_idx = smoothed.len() - 1;
    let last = smoothed[last_idx].position();
    let start_normal = Vec2::new(-tangents[0].y, tangents[0].x).atan2();
    let end_normal = Vec2::new(-tangents[last_idx].y, tangents[last_idx].x).atan2();

    let mut outline = Vec::with_capacity(left.len() * 2 + CAP_SEGMENTS * 2);
    // Right side, around the back, to the left side.
    outline.extend(fan(first, radii[0], start_normal + PI, -PI));
    outline.extend(left.iter().copied());
    // Left side, around the front, to the right side.
    outline.extend(fan(last, radii[last_idx], end_normal, -PI));
    outline.extend(right.iter().rev().copied());

    if outline.len() < 3 {
        return Vec::new();
    }
    outline
}

/// Quadratic-midpoint smoothed centreline for pressure-free strokes.
///
/// Each interior sample becomes a control point with the curve passing through
/// the midpoints of neighbouring samples. Empty for fewer than two samples.
pub fn centerline_path(points: &[StrokePoint]) -> BezPath {
    let mut path = BezPath::new();
    if points.len() < 2 {
        return path;
    }
    path.move_to(points[0].position());
    if points.len() == 2 {
        path.line_to(points[1].position());
        return path;
    }
    for i in 1..points.len() - 1 {
        let control = points[i].position();
        let mid = control.midpoint(points[i + 1].position());
        path.quad_to(control, mid);
    }
    path.line_to(points[points.len() - 1].position());
    path
}

/// Display-time culling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CullSettings {
    /// Point count above which culling kicks in at 100% zoom.
    pub base_threshold: usize,
    /// Lower bound for the zoom-adjusted threshold.
    pub min_threshold: usize,
    /// Upper bound for the zoom-adjusted threshold.
    pub max_threshold: usize,
    /// Viewport padding in screen pixels.
    pub padding_px: f64,
}

impl Default for CullSettings {
    fn default() -> Self {
        Self {
            base_threshold: 1000,
            min_threshold: 200,
            max_threshold: 5000,
            padding_px: 64.0,
        }
    }
}

impl CullSettings {
    /// Zoomed-in views see less of the board, so culling starts earlier.
    pub fn threshold(&self, zoom: f64) -> usize {
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        let scaled = (self.base_threshold as f64 / zoom).round() as usize;
        scaled.clamp(self.min_threshold, self.max_threshold.max(self.min_threshold))
    }
}

/// Index range of samples that fall inside `area`, widened by one sample on each
/// side so segments crossing the boundary are kept. `None` when nothing is inside.
pub fn visible_range(points: &[StrokePoint], area: Rect) -> Option<Range<usize>> {
    let first = points.iter().position(|p| rect_contains(area, p.position()))?;
    let last = points.iter().rposition(|p| rect_contains(area, p.position()))?;
    Some(first.saturating_sub(1)..(last + 2).min(points.len()))
}

/// What a renderer should draw for a path this frame.
#[derive(Debug, Clone)]
pub enum StrokeRender {
    /// Nothing visible or degenerate input.
    Skip,
    /// Fill this closed polygon.
    Outline(Vec<Point>),
    /// Stroke this centreline with a uniform width.
    Centerline { path: BezPath, width: f64 },
}

impl StrokeRender {
    pub fn is_skip(&self) -> bool {
        matches!(self, StrokeRender::Skip)
    }
}

/// Prepare a path for display in a viewport.
///
/// `bounds` is the path's cached bounding box; when it misses the padded
/// viewport the whole path is skipped without touching the samples. Paths longer
/// than the zoom-dependent threshold only process their visible sub-range.
pub fn prepare_render(
    points: &[StrokePoint],
    bounds: Rect,
    width: f64,
    viewport: Rect,
    zoom: f64,
    cull: &CullSettings,
) -> StrokeRender {
    if points.len() < 2 {
        return StrokeRender::Skip;
    }
    let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
    let pad = cull.padding_px / zoom + width + MIN_RADIUS;
    let area = viewport.inflate(pad, pad);
    if !crate::geometry::rects_intersect(bounds.inflate(width, width), area) {
        return StrokeRender::Skip;
    }

    let samples = if points.len() > cull.threshold(zoom) {
        match visible_range(points, area) {
            Some(range) => &points[range],
            None => return StrokeRender::Skip,
        }
    } else {
        points
    };

    if is_pressure_tagged(samples) {
        let outline = outline_polygon(samples, width);
        if outline.is_empty() {
            StrokeRender::Skip
        } else {
            StrokeRender::Outline(outline)
        }
    } else {
        let path = centerline_path(samples);
        if path.elements().is_empty() {
            StrokeRender::Skip
        } else {
            StrokeRender::Centerline { path, width }
        }
    }
}
