//! Selection set, resize handles and area selection.

use crate::elements::ElementId;
use crate::geometry::point_in_polygon;
use crate::store::ElementStore;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 10.0;
/// Smallest width/height a resize can produce, in world units.
pub const MIN_RESIZE_SIZE: f64 = 1.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
}

/// A resize handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a world point hits this handle.
    /// `tolerance` should be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight handles of a bounding box: corners first, then edge midpoints.
pub fn handles(bounds: Rect) -> [Handle; 8] {
    let c = bounds.center();
    [
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(c.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, c.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(c.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, c.y), HandleKind::Edge(Edge::Left)),
    ]
}

/// Find which handle (if any) is hit at the given point.
///
/// Corners win over edges when a tiny box puts them within reach of each other.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles(bounds)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

fn corner_point(bounds: Rect, corner: Corner) -> Point {
    match corner {
        Corner::TopLeft => Point::new(bounds.x0, bounds.y0),
        Corner::TopRight => Point::new(bounds.x1, bounds.y0),
        Corner::BottomLeft => Point::new(bounds.x0, bounds.y1),
        Corner::BottomRight => Point::new(bounds.x1, bounds.y1),
    }
}

fn opposite(corner: Corner) -> Corner {
    match corner {
        Corner::TopLeft => Corner::BottomRight,
        Corner::TopRight => Corner::BottomLeft,
        Corner::BottomLeft => Corner::TopRight,
        Corner::BottomRight => Corner::TopLeft,
    }
}

/// Bounds after dragging `handle` of `original` by `delta`.
///
/// Dragging past the opposite side flips rather than inverting; the result is
/// normalized and never smaller than [`MIN_RESIZE_SIZE`]. With `keep_aspect_ratio`
/// corner drags scale uniformly about the opposite corner.
pub fn apply_resize(original: Rect, handle: HandleKind, delta: Vec2, keep_aspect_ratio: bool) -> Rect {
    let resized = match handle {
        HandleKind::Corner(corner) => {
            let anchor = corner_point(original, opposite(corner));
            let mut moving = corner_point(original, corner) + delta;
            let (ow, oh) = (original.width(), original.height());
            if keep_aspect_ratio && ow > f64::EPSILON && oh > f64::EPSILON {
                let dx = moving.x - anchor.x;
                let dy = moving.y - anchor.y;
                let scale = (dx.abs() / ow).max(dy.abs() / oh);
                let sign = |v: f64| if v < 0.0 { -1.0 } else { 1.0 };
                moving = Point::new(anchor.x + sign(dx) * ow * scale, anchor.y + sign(dy) * oh * scale);
            }
            Rect::from_points(anchor, moving)
        }
        HandleKind::Edge(edge) => {
            let mut r = original;
            match edge {
                Edge::Top => r.y0 += delta.y,
                Edge::Bottom => r.y1 += delta.y,
                Edge::Left => r.x0 += delta.x,
                Edge::Right => r.x1 += delta.x,
            }
            r.abs()
        }
    };
    let mut r = resized;
    if r.width() < MIN_RESIZE_SIZE {
        r.x1 = r.x0 + MIN_RESIZE_SIZE;
    }
    if r.height() < MIN_RESIZE_SIZE {
        r.y1 = r.y0 + MIN_RESIZE_SIZE;
    }
    r
}

/// The set of selected element ids, kept in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Select exactly one element.
    pub fn select(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    pub fn add(&mut self, id: ElementId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|&i| i != id);
    }

    pub fn toggle(&mut self, id: ElementId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.ids.push(id);
        }
    }

    /// Replace the selection, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            self.add(id);
        }
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        for id in ids {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer exist in the store.
    pub fn retain_existing(&mut self, store: &ElementStore) {
        self.ids.retain(|&id| store.contains(id));
    }

    /// Union of the selected elements' bounds.
    pub fn bounds(&self, store: &ElementStore) -> Option<Rect> {
        self.ids
            .iter()
            .filter_map(|&id| store.get(id))
            .map(|e| e.bounds())
            .reduce(|acc, b| acc.union(b))
    }
}

/// Elements touched by a rubber-band rectangle.
pub fn rubber_band_select(store: &ElementStore, rect: Rect) -> Vec<ElementId> {
    store.elements_in_rect(rect.abs())
}

/// Elements whose representative points all lie inside a closed lasso loop.
pub fn lasso_select(store: &ElementStore, lasso: &[Point]) -> Vec<ElementId> {
    if lasso.len() < 3 {
        return Vec::new();
    }
    store
        .iter()
        .filter(|e| {
            let points = e.representative_points();
            !points.is_empty() && points.iter().all(|p| point_in_polygon(*p, lasso))
        })
        .map(|e| e.id())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, LinearElement, PathElement, ShapeElement};
    use crate::stroke::StrokePoint;

    fn square(x: f64, y: f64, size: f64) -> Element {
        Element::Rect(ShapeElement::new(Rect::new(x, y, x + size, y + size)))
    }

    #[test]
    fn test_eight_handles() {
        let hs = handles(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(hs.len(), 8);
        assert_eq!(hs[5].position, Point::new(100.0, 25.0));
        assert_eq!(hs[5].kind, HandleKind::Edge(Edge::Right));
    }

    #[test]
    fn test_handle_hit_respects_tolerance() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            hit_test_handles(bounds, Point::new(102.0, 101.0), 5.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(hit_test_handles(bounds, Point::new(110.0, 110.0), 5.0), None);
        assert_eq!(
            hit_test_handles(bounds, Point::new(50.0, -1.0), 5.0),
            Some(HandleKind::Edge(Edge::Top))
        );
    }

    #[test]
    fn test_corner_resize() {
        let r = apply_resize(
            Rect::new(0.0, 0.0, 100.0, 50.0),
            HandleKind::Corner(Corner::BottomRight),
            Vec2::new(20.0, 10.0),
            false,
        );
        assert_eq!(r, Rect::new(0.0, 0.0, 120.0, 60.0));
    }

    #[test]
    fn test_resize_past_anchor_flips() {
        let r = apply_resize(
            Rect::new(0.0, 0.0, 100.0, 50.0),
            HandleKind::Corner(Corner::TopLeft),
            Vec2::new(150.0, 0.0),
            false,
        );
        assert_eq!(r, Rect::new(100.0, 0.0, 150.0, 50.0));
    }

    #[test]
    fn test_resize_keeps_aspect_ratio() {
        let r = apply_resize(
            Rect::new(0.0, 0.0, 100.0, 50.0),
            HandleKind::Corner(Corner::BottomRight),
            Vec2::new(100.0, 0.0),
            true,
        );
        assert!((r.width() / r.height() - 2.0).abs() < 1e-9);
        assert!((r.width() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_resize_and_min_size() {
        let original = Rect::new(0.0, 0.0, 100.0, 50.0);
        let r = apply_resize(original, HandleKind::Edge(Edge::Left), Vec2::new(30.0, 99.0), false);
        assert_eq!(r, Rect::new(30.0, 0.0, 100.0, 50.0));
        let collapsed = apply_resize(original, HandleKind::Edge(Edge::Bottom), Vec2::new(0.0, -50.0), false);
        assert!((collapsed.height() - MIN_RESIZE_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_selection_set_operations() {
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();
        let mut sel = Selection::new();
        sel.select(a);
        sel.add(a);
        assert_eq!(sel.len(), 1);
        sel.toggle(b);
        assert!(sel.contains(b));
        sel.toggle(a);
        assert_eq!(sel.ids(), &[b]);
        sel.set([a, a, b]);
        assert_eq!(sel.ids(), &[a, b]);
    }

    #[test]
    fn test_retain_existing() {
        let e = square(0.0, 0.0, 10.0);
        let store = ElementStore::from_elements(vec![e.clone()]);
        let mut sel = Selection::new();
        sel.set([e.id(), uuid::Uuid::new_v4()]);
        sel.retain_existing(&store);
        assert_eq!(sel.ids(), &[e.id()]);
        assert_eq!(sel.bounds(&store), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_lasso_requires_all_representative_points() {
        let inside = square(10.0, 10.0, 10.0);
        let outside = square(200.0, 200.0, 10.0);
        let half_line = Element::Line(LinearElement::line(Point::new(20.0, 20.0), Point::new(300.0, 20.0)));
        let path = Element::Path(PathElement::new(vec![
            StrokePoint::new(30.0, 30.0),
            StrokePoint::new(60.0, 60.0),
        ]));
        let store = ElementStore::from_elements(vec![inside.clone(), outside, half_line, path.clone()]);
        let lasso = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        assert_eq!(lasso_select(&store, &lasso), vec![inside.id(), path.id()]);
        assert!(lasso_select(&store, &lasso[..2]).is_empty());
    }

    #[test]
    fn test_rubber_band_accepts_inverted_rect() {
        let e = square(10.0, 10.0, 10.0);
        let store = ElementStore::from_elements(vec![e.clone()]);
        assert_eq!(rubber_band_select(&store, Rect::new(30.0, 30.0, 15.0, 15.0)), vec![e.id()]);
    }
}
