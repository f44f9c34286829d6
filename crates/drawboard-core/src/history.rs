//! Snapshot-based undo/redo.

use crate::elements::Element;

/// Two stacks of full element-sequence snapshots.
///
/// Every mutating action records the pre-mutation sequence with [`History::record`],
/// which also invalidates the redo stack. Depth is unbounded unless a limit is set,
/// in which case the oldest undo snapshot is dropped first.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Vec<Element>>,
    redo_stack: Vec<Vec<Element>>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` undo snapshots (`None` = unbounded).
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Push the pre-mutation snapshot and clear redo.
    pub fn record(&mut self, before: Vec<Element>) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
        if let Some(limit) = self.limit {
            let excess = self.undo_stack.len().saturating_sub(limit);
            if excess > 0 {
                self.undo_stack.drain(..excess);
            }
        }
        log::debug!("history: recorded snapshot ({} undo)", self.undo_stack.len());
    }

    /// Step back. `current` is the live sequence; returns the sequence to restore,
    /// or `None` (and keeps `current` untouched) when there is nothing to undo.
    pub fn undo(&mut self, current: &[Element]) -> Option<Vec<Element>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current.to_vec());
        log::debug!("history: undo ({} left)", self.undo_stack.len());
        Some(previous)
    }

    /// Step forward; the mirror of [`History::undo`].
    pub fn redo(&mut self, current: &[Element]) -> Option<Vec<Element>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.to_vec());
        log::debug!("history: redo ({} left)", self.redo_stack.len());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget everything, e.g. when switching workspaces.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ShapeElement;
    use kurbo::Rect;

    fn rect(x: f64) -> Element {
        Element::Rect(ShapeElement::new(Rect::new(x, 0.0, x + 1.0, 1.0)))
    }

    /// Apply `n` additions, recording history like the editor does.
    fn run_actions(history: &mut History, state: &mut Vec<Element>, n: usize) {
        for i in 0..n {
            history.record(state.clone());
            state.push(rect(i as f64));
        }
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = History::new();
        let state = vec![rect(0.0)];
        assert!(history.undo(&state).is_none());
        assert!(history.redo(&state).is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_round_trip_n_actions() {
        let mut history = History::new();
        let mut state = Vec::new();
        run_actions(&mut history, &mut state, 5);
        let final_state = state.clone();

        for _ in 0..5 {
            state = history.undo(&state).unwrap();
        }
        assert!(state.is_empty());
        assert!(!history.can_undo());

        for _ in 0..5 {
            state = history.redo(&state).unwrap();
        }
        assert_eq!(state, final_state);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut history = History::new();
        let mut state = Vec::new();
        run_actions(&mut history, &mut state, 2);
        state = history.undo(&state).unwrap();
        assert!(history.can_redo());
        run_actions(&mut history, &mut state, 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut history = History::new();
        let mut state = Vec::new();
        run_actions(&mut history, &mut state, 200);
        assert_eq!(history.undo_len(), 200);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(Some(3));
        let mut state = Vec::new();
        run_actions(&mut history, &mut state, 5);
        assert_eq!(history.undo_len(), 3);
        for _ in 0..3 {
            state = history.undo(&state).unwrap();
        }
        // The two oldest snapshots were discarded.
        assert_eq!(state.len(), 2);
    }
}
