//! The ordered element collection owned by an editing session.

use crate::elements::{Element, ElementId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Elements in paint order (back to front). Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a sequence; later duplicates of an id replace earlier ones.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut store = Self::new();
        store.replace_all(elements);
        store
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.iter()
    }

    /// An independent copy of the full sequence.
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Replace the whole sequence. A repeated id keeps its first slot and the
    /// later element's contents.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        let mut slots: HashMap<ElementId, usize> = HashMap::with_capacity(elements.len());
        let mut deduped = Vec::with_capacity(elements.len());
        for element in elements {
            match slots.entry(element.id()) {
                Entry::Occupied(slot) => deduped[*slot.get()] = element,
                Entry::Vacant(slot) => {
                    slot.insert(deduped.len());
                    deduped.push(element);
                }
            }
        }
        self.elements = deduped;
    }

    /// Append an element on top. An element with an existing id replaces it in place.
    pub fn add(&mut self, element: Element) {
        match self.index_of(element.id()) {
            Some(index) => self.elements[index] = element,
            None => self.elements.push(element),
        }
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Remove every element whose id is in `ids`, returning them in paint order.
    pub fn remove_many(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| ids.contains(&e.id()));
        self.elements = kept;
        removed
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(Element::id).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Move the given elements above everything else, keeping their relative order.
    pub fn bring_to_front(&mut self, ids: &[ElementId]) {
        let (moved, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| ids.contains(&e.id()));
        self.elements = rest;
        self.elements.extend(moved);
    }

    /// Move the given elements below everything else, keeping their relative order.
    pub fn send_to_back(&mut self, ids: &[ElementId]) {
        let (mut moved, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| ids.contains(&e.id()));
        moved.extend(rest);
        self.elements = moved;
    }

    /// Move each given element one layer up. An element never swaps with
    /// another element being moved. Returns whether anything moved.
    pub fn bring_forward(&mut self, ids: &[ElementId]) -> bool {
        let mut moved = false;
        for pos in (0..self.elements.len().saturating_sub(1)).rev() {
            let here = ids.contains(&self.elements[pos].id());
            let above = ids.contains(&self.elements[pos + 1].id());
            if here && !above {
                self.elements.swap(pos, pos + 1);
                moved = true;
            }
        }
        moved
    }

    /// Move each given element one layer down. Returns whether anything moved.
    pub fn send_backward(&mut self, ids: &[ElementId]) -> bool {
        let mut moved = false;
        for pos in 1..self.elements.len() {
            let here = ids.contains(&self.elements[pos].id());
            let below = ids.contains(&self.elements[pos - 1].id());
            if here && !below {
                self.elements.swap(pos, pos - 1);
                moved = true;
            }
        }
        moved
    }

    /// Union of all element bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .iter()
            .map(Element::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Elements hit at a world point, topmost first.
    ///
    /// Paths use `path_tolerance` (a fixed world distance); everything else
    /// uses `tolerance`.
    pub fn elements_at_point(&self, point: Point, tolerance: f64, path_tolerance: f64) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|e| {
                let tol = match e {
                    Element::Path(_) => path_tolerance,
                    _ => tolerance,
                };
                e.hit_test(point, tol)
            })
            .map(Element::id)
            .collect()
    }

    /// Topmost element at a world point.
    pub fn topmost_at(&self, point: Point, tolerance: f64, path_tolerance: f64) -> Option<ElementId> {
        self.elements_at_point(point, tolerance, path_tolerance)
            .into_iter()
            .next()
    }

    /// Elements touching a rectangle, in paint order.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.intersects_rect(rect))
            .map(Element::id)
            .collect()
    }
}

impl From<Vec<Element>> for ElementStore {
    fn from(elements: Vec<Element>) -> Self {
        Self::from_elements(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LinearElement, PathElement, ShapeElement};
    use crate::stroke::StrokePoint;
    use kurbo::Vec2;

    fn rect(x: f64, y: f64, size: f64) -> Element {
        Element::Rect(ShapeElement::new(Rect::new(x, y, x + size, y + size)))
    }

    #[test]
    fn test_add_and_remove() {
        let mut store = ElementStore::new();
        let a = rect(0.0, 0.0, 10.0);
        let id = a.id();
        store.add(a);
        assert!(store.contains(id));
        assert_eq!(store.len(), 1);
        assert!(store.remove(id).is_some());
        assert!(store.is_empty());
        assert!(store.remove(id).is_none());
    }

    #[test]
    fn test_add_existing_id_replaces_in_place() {
        let a = rect(0.0, 0.0, 10.0);
        let b = rect(50.0, 50.0, 10.0);
        let mut store = ElementStore::from_elements(vec![a.clone(), b.clone()]);
        let mut moved = a.clone();
        moved.translate(Vec2::new(5.0, 0.0));
        store.add(moved.clone());
        assert_eq!(store.len(), 2);
        assert_eq!(store.elements()[0], moved);
    }

    #[test]
    fn test_hit_order_is_topmost_first() {
        let bottom = rect(0.0, 0.0, 100.0);
        let top = rect(50.0, 50.0, 100.0);
        let store = ElementStore::from_elements(vec![bottom.clone(), top.clone()]);
        let hits = store.elements_at_point(Point::new(75.0, 75.0), 0.0, 0.0);
        assert_eq!(hits, vec![top.id(), bottom.id()]);
        assert_eq!(store.topmost_at(Point::new(10.0, 10.0), 0.0, 0.0), Some(bottom.id()));
        assert_eq!(store.topmost_at(Point::new(500.0, 500.0), 0.0, 0.0), None);
    }

    #[test]
    fn test_path_uses_its_own_tolerance() {
        let path = Element::Path(PathElement::new(vec![
            StrokePoint::new(0.0, 0.0),
            StrokePoint::new(100.0, 0.0),
        ]));
        let store = ElementStore::from_elements(vec![path.clone()]);
        // Default width 2 -> half-width 1.
        assert!(store.topmost_at(Point::new(50.0, 4.0), 0.0, 3.0).is_some());
        assert!(store.topmost_at(Point::new(50.0, 4.0), 10.0, 0.0).is_none());
    }

    #[test]
    fn test_z_order_moves() {
        let a = rect(0.0, 0.0, 1.0);
        let b = rect(2.0, 0.0, 1.0);
        let c = rect(4.0, 0.0, 1.0);
        let mut store = ElementStore::from_elements(vec![a.clone(), b.clone(), c.clone()]);
        store.bring_to_front(&[a.id()]);
        assert_eq!(store.ids(), vec![b.id(), c.id(), a.id()]);
        store.send_to_back(&[a.id()]);
        assert_eq!(store.ids(), vec![a.id(), b.id(), c.id()]);
        assert!(store.bring_forward(&[a.id()]));
        assert_eq!(store.ids(), vec![b.id(), a.id(), c.id()]);
        assert!(!store.bring_forward(&[c.id()]));
        assert!(!store.send_backward(&[b.id()]));
    }

    #[test]
    fn test_z_order_moves_keep_group_order() {
        let a = rect(0.0, 0.0, 1.0);
        let b = rect(2.0, 0.0, 1.0);
        let c = rect(4.0, 0.0, 1.0);
        let d = rect(6.0, 0.0, 1.0);
        let mut store = ElementStore::from_elements(vec![a.clone(), b.clone(), c.clone(), d.clone()]);

        store.bring_to_front(&[b.id(), a.id()]);
        assert_eq!(store.ids(), vec![c.id(), d.id(), a.id(), b.id()]);

        // b is already on top, so a stays directly beneath it.
        assert!(!store.bring_forward(&[a.id(), b.id()]));
        assert!(store.send_backward(&[a.id(), b.id()]));
        assert_eq!(store.ids(), vec![c.id(), a.id(), b.id(), d.id()]);

        store.send_to_back(&[b.id(), d.id()]);
        assert_eq!(store.ids(), vec![b.id(), d.id(), c.id(), a.id()]);
    }

    #[test]
    fn test_replace_all_dedups_ids() {
        let a = rect(0.0, 0.0, 1.0);
        let b = rect(2.0, 0.0, 1.0);
        let mut newer_a = a.clone();
        newer_a.translate(Vec2::new(10.0, 0.0));

        let mut store = ElementStore::new();
        store.replace_all(vec![a.clone(), b.clone(), newer_a.clone()]);
        assert_eq!(store.elements(), &[newer_a, b][..]);
    }

    #[test]
    fn test_rect_query_and_bounds() {
        let a = rect(0.0, 0.0, 10.0);
        let line = Element::Line(LinearElement::line(Point::new(100.0, 100.0), Point::new(200.0, 200.0)));
        let store = ElementStore::from_elements(vec![a.clone(), line.clone()]);
        assert_eq!(store.elements_in_rect(Rect::new(5.0, 5.0, 20.0, 20.0)), vec![a.id()]);
        assert_eq!(store.elements_in_rect(Rect::new(140.0, 140.0, 160.0, 160.0)), vec![line.id()]);
        assert_eq!(store.bounds(), Some(Rect::new(0.0, 0.0, 200.0, 200.0)));
        assert_eq!(ElementStore::new().bounds(), None);
    }

    #[test]
    fn test_remove_many_preserves_order() {
        let a = rect(0.0, 0.0, 1.0);
        let b = rect(2.0, 0.0, 1.0);
        let c = rect(4.0, 0.0, 1.0);
        let mut store = ElementStore::from_elements(vec![a.clone(), b.clone(), c.clone()]);
        let removed = store.remove_many(&[c.id(), a.id()]);
        assert_eq!(removed, vec![a, c]);
        assert_eq!(store.ids(), vec![b.id()]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let store = ElementStore::from_elements(vec![rect(0.0, 0.0, 1.0)]);
        let value = serde_json::to_value(&store).unwrap();
        assert!(value.is_array());
    }
}
