//! Line selection driven by click-drag over the duck margin.

use std::collections::HashSet;

/// Tracks the highlighted line set and the extent of an active drag gesture.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<usize>,
    gesture: Option<(usize, usize)>,
}

impl SelectionState {
    /// Anchors a new drag gesture on `line`, replacing any prior selection.
    pub fn begin_drag(&mut self, line: usize) {
        self.gesture = Some((line, line));
        self.selected = HashSet::from([line]);
    }

    /// Extends the active gesture to cover `line`. The selection becomes the
    /// contiguous range over every line the gesture has visited, so dragging
    /// down and then back past the anchor keeps the full sweep selected.
    pub fn drag_to(&mut self, line: usize) {
        let Some((low, high)) = self.gesture.as_mut() else {
            return;
        };

        *low = (*low).min(line);
        *high = (*high).max(line);
        self.selected = (*low..=*high).collect();
    }

    /// Ends the gesture; the selection itself persists.
    pub fn end_drag(&mut self) {
        self.gesture = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn clear(&mut self) {
        self.gesture = None;
        self.selected.clear();
    }

    pub fn is_selected(&self, line: usize) -> bool {
        self.selected.contains(&line)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected line indices in ascending order.
    pub fn sorted_lines(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.selected.iter().copied().collect();
        lines.sort_unstable();
        lines
    }
}
