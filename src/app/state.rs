//! Application state models and route-local behavior.

mod selection;
mod sync;

pub use self::selection::SelectionState;
pub use self::sync::{MAX_SAVE_ATTEMPTS, SaveRequest, SaveState, SyncController};

use crate::domain::{DEFAULT_SNIPPET, DUCK_PERSONALITIES, DuckPersonality, ReviewOutcome, Route};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// Spinner frames used for active async operations.
pub const SPINNER_FRAMES: [&str; 8] = ["⢎⡰", "⢎⡡", "⢎⡑", "⢎⠱", "⠎⡱", "⢊⡱", "⢌⡱", "⢆⡱"];

/// Top-level mutable application state.
#[derive(Debug)]
pub struct AppState {
    pub route: Route,
    pub should_quit: bool,
    pub error_message: Option<String>,
    pub user_label: String,
    pub editor: EditorScreenState,
    pub review: Option<ReviewScreenState>,
    persona_index: usize,
    operation: Option<OperationState>,
}

impl AppState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            route: Route::Editor,
            should_quit: false,
            error_message: None,
            user_label: "(local session)".to_owned(),
            editor: EditorScreenState::new(DEFAULT_SNIPPET, debounce),
            review: None,
            persona_index: 0,
            operation: None,
        }
    }

    pub fn set_user_label(&mut self, label: impl Into<String>) {
        self.user_label = label.into();
    }

    pub fn persona(&self) -> DuckPersonality {
        DUCK_PERSONALITIES[self.persona_index % DUCK_PERSONALITIES.len()]
    }

    /// Advances to the next duck persona and returns it.
    pub fn next_persona(&mut self) -> DuckPersonality {
        self.persona_index = (self.persona_index + 1) % DUCK_PERSONALITIES.len();
        self.persona()
    }

    pub fn open_review(&mut self, outcome: ReviewOutcome) {
        self.review = Some(ReviewScreenState::new(outcome));
        self.route = Route::Review;
    }

    pub fn back_to_editor(&mut self) {
        self.route = Route::Editor;
    }

    pub fn begin_operation(&mut self, label: impl Into<String>) {
        self.operation = Some(OperationState {
            label: label.into(),
            spinner_index: 0,
        });
    }

    pub fn end_operation(&mut self) {
        self.operation = None;
    }

    pub fn is_busy(&self) -> bool {
        self.operation.is_some()
    }

    pub fn advance_spinner(&mut self) {
        if let Some(operation) = self.operation.as_mut() {
            operation.spinner_index = (operation.spinner_index + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn operation_display(&self) -> Option<String> {
        let operation = self.operation.as_ref()?;
        let frame = SPINNER_FRAMES
            .get(operation.spinner_index)
            .copied()
            .unwrap_or("⢎⡰");
        Some(format!("{frame} {}", operation.label))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[derive(Debug, Clone)]
struct OperationState {
    label: String,
    spinner_index: usize,
}

/// Route-local state for the line editor screen.
///
/// Owns the buffer and its synchronization flags; the view layer only
/// dispatches mutation intents through the methods below.
#[derive(Debug)]
pub struct EditorScreenState {
    lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub selection: SelectionState,
    pub sync: SyncController,
    pub scroll: usize,
    pub last_saved_unix_ms: Option<i64>,
    /// Text viewport of the last rendered frame, for mouse-to-line mapping.
    pub viewport: Option<Rect>,
}

impl EditorScreenState {
    pub fn new(initial_text: &str, debounce: Duration) -> Self {
        Self {
            lines: split_lines(initial_text),
            cursor_line: 0,
            cursor_col: 0,
            selection: SelectionState::default(),
            sync: SyncController::new(initial_text, debounce),
            scroll: 0,
            last_saved_unix_ms: None,
            viewport: None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn char_count(&self) -> usize {
        let newlines = self.lines.len().saturating_sub(1);
        self.lines.iter().map(|line| line.chars().count()).sum::<usize>() + newlines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Inserts a character at the cursor.
    pub fn insert_char(&mut self, ch: char, now: Instant) {
        let line = &mut self.lines[self.cursor_line];
        let at = byte_index(line, self.cursor_col);
        line.insert(at, ch);
        self.cursor_col += 1;
        self.commit_mutation(now);
    }

    /// Deletes the character before the cursor, or removes an empty non-first
    /// line entirely and moves focus to the previous line.
    pub fn backspace(&mut self, now: Instant) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_line];
            let at = byte_index(line, self.cursor_col - 1);
            line.remove(at);
            self.cursor_col -= 1;
            self.commit_mutation(now);
            return;
        }

        let current_is_empty = self.lines[self.cursor_line].is_empty();
        if current_is_empty && self.cursor_line > 0 && self.lines.len() > 1 {
            self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.lines[self.cursor_line].chars().count();
            // Line indices shifted; stale highlights would point at the wrong rows.
            self.selection.clear();
            self.commit_mutation(now);
        }
    }

    /// Inserts a new empty line after the current one and moves focus there.
    pub fn split_line(&mut self, now: Instant) {
        self.lines.insert(self.cursor_line + 1, String::new());
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.selection.clear();
        self.commit_mutation(now);
    }

    /// Restores the default snippet; persisted through the normal debounce cycle.
    pub fn reset(&mut self, now: Instant) {
        self.lines = split_lines(DEFAULT_SNIPPET);
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.selection.clear();
        self.commit_mutation(now);
    }

    /// Adopts the initially fetched record unless local edits already exist.
    pub fn adopt_remote(&mut self, code: &str) -> bool {
        if !self.sync.adopt_remote(code) {
            return false;
        }

        self.lines = split_lines(code);
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll = 0;
        self.selection.clear();
        true
    }

    pub fn save_succeeded(&mut self, now: Instant, saved_at_unix_ms: i64) {
        self.sync.save_succeeded(now);
        self.last_saved_unix_ms = Some(saved_at_unix_ms);
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(1);
        self.clamp_cursor_col();
    }

    pub fn move_cursor_down(&mut self) {
        self.cursor_line = (self.cursor_line + 1).min(self.lines.len() - 1);
        self.clamp_cursor_col();
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let width = self.lines[self.cursor_line].chars().count();
        self.cursor_col = (self.cursor_col + 1).min(width);
    }

    pub fn move_cursor_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_line_end(&mut self) {
        self.cursor_col = self.lines[self.cursor_line].chars().count();
    }

    /// Moves the cursor to the clicked line, clamped to line bounds.
    pub fn place_cursor(&mut self, line: usize) {
        self.cursor_line = line.min(self.lines.len() - 1);
        self.clamp_cursor_col();
    }

    /// Scrolls so the cursor stays inside a viewport of `height` rows.
    pub fn ensure_cursor_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }

        if self.cursor_line < self.scroll {
            self.scroll = self.cursor_line;
        } else if self.cursor_line >= self.scroll + height {
            self.scroll = self.cursor_line + 1 - height;
        }
    }

    /// Maps a terminal cell to a buffer line using the last rendered viewport.
    pub fn line_at(&self, column: u16, row: u16) -> Option<usize> {
        let viewport = self.viewport?;
        if !viewport.contains(ratatui::layout::Position { x: column, y: row }) {
            return None;
        }

        let line = self.scroll + usize::from(row - viewport.y);
        (line < self.lines.len()).then_some(line)
    }

    fn clamp_cursor_col(&mut self) {
        let width = self.lines[self.cursor_line].chars().count();
        self.cursor_col = self.cursor_col.min(width);
    }

    fn commit_mutation(&mut self, now: Instant) {
        let text = self.text();
        self.sync.record_mutation(text, now);
    }
}

/// Route-local state for the review result screen.
#[derive(Debug, Clone)]
pub struct ReviewScreenState {
    pub outcome: ReviewOutcome,
    pub selected_issue: usize,
    pub scroll: u16,
}

impl ReviewScreenState {
    pub fn new(outcome: ReviewOutcome) -> Self {
        Self {
            outcome,
            selected_issue: 0,
            scroll: 0,
        }
    }

    pub fn issue_count(&self) -> usize {
        match &self.outcome {
            ReviewOutcome::Report(report) => report.issues.len(),
            ReviewOutcome::Raw(_) => 0,
        }
    }

    pub fn selected_issue(&self) -> Option<&crate::domain::ReviewIssue> {
        match &self.outcome {
            ReviewOutcome::Report(report) => report.issues.get(self.selected_issue),
            ReviewOutcome::Raw(_) => None,
        }
    }

    pub fn move_down(&mut self) {
        let count = self.issue_count();
        if count == 0 {
            self.scroll = self.scroll.saturating_add(1);
            return;
        }

        self.selected_issue = (self.selected_issue + 1).min(count - 1);
        self.scroll = 0;
    }

    pub fn move_up(&mut self) {
        if self.issue_count() == 0 {
            self.scroll = self.scroll.saturating_sub(1);
            return;
        }

        self.selected_issue = self.selected_issue.saturating_sub(1);
        self.scroll = 0;
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_owned).collect()
}

fn byte_index(line: &str, char_index: usize) -> usize {
    line.char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::{AppState, EditorScreenState, SaveState};
    use crate::domain::{DEFAULT_SNIPPET, DUCK_PERSONALITIES};
    use std::time::{Duration, Instant};

    fn editor(text: &str) -> (EditorScreenState, Instant) {
        (
            EditorScreenState::new(text, Duration::from_millis(1000)),
            Instant::now(),
        )
    }

    #[test]
    fn typing_replaces_line_text_and_marks_buffer_dirty() {
        let (mut editor, now) = editor("ab\ncd");
        editor.cursor_line = 1;
        editor.cursor_col = 2;

        editor.insert_char('!', now);

        assert_eq!(editor.text(), "ab\ncd!");
        assert!(editor.sync.is_dirty());
        assert_eq!(editor.sync.save_state(), SaveState::PendingDebounce);
    }

    #[test]
    fn split_inserts_empty_line_after_current_and_moves_focus() {
        let (mut editor, now) = editor("first\nsecond");
        editor.cursor_line = 0;
        editor.cursor_col = 3;

        editor.split_line(now);

        assert_eq!(editor.lines(), ["first", "", "second"]);
        assert_eq!(editor.cursor_line, 1);
        assert_eq!(editor.cursor_col, 0);
    }

    #[test]
    fn backspace_on_empty_non_first_line_merges_upward() {
        let (mut editor, now) = editor("first\n\nthird");
        editor.cursor_line = 1;
        editor.cursor_col = 0;

        editor.backspace(now);

        assert_eq!(editor.lines(), ["first", "third"]);
        assert_eq!(editor.cursor_line, 0);
        assert_eq!(editor.cursor_col, 5);
    }

    #[test]
    fn backspace_never_removes_the_first_line() {
        let (mut editor, now) = editor("\nsecond");
        editor.cursor_line = 0;
        editor.cursor_col = 0;

        editor.backspace(now);

        assert_eq!(editor.lines(), ["", "second"]);
        assert!(!editor.sync.is_dirty());
    }

    #[test]
    fn structural_edits_clear_the_selection() {
        let (mut editor, now) = editor("a\nb\nc");
        editor.selection.begin_drag(0);
        editor.selection.drag_to(2);
        editor.selection.end_drag();
        assert_eq!(editor.selection.len(), 3);

        editor.split_line(now);

        assert!(editor.selection.is_empty());
    }

    #[test]
    fn character_edits_keep_the_selection() {
        let (mut editor, now) = editor("a\nb\nc");
        editor.selection.begin_drag(1);
        editor.selection.end_drag();

        editor.insert_char('x', now);

        assert_eq!(editor.selection.sorted_lines(), vec![1]);
    }

    #[test]
    fn stats_count_lines_and_characters() {
        let (editor, _) = editor("ab\ncd");

        assert_eq!(editor.line_count(), 2);
        assert_eq!(editor.char_count(), 5);
    }

    #[test]
    fn reset_restores_default_snippet_as_a_mutation() {
        let (mut editor, now) = editor("something else");

        editor.reset(now);

        assert_eq!(editor.text(), DEFAULT_SNIPPET);
        assert!(editor.sync.is_dirty());
    }

    #[test]
    fn adopt_remote_rebuilds_lines() {
        let (mut editor, _) = editor(DEFAULT_SNIPPET);

        assert!(editor.adopt_remote("one\ntwo"));
        assert_eq!(editor.lines(), ["one", "two"]);
        assert_eq!(editor.cursor_line, 0);
    }

    #[test]
    fn adopt_remote_is_discarded_after_typing() {
        let (mut editor, now) = editor(DEFAULT_SNIPPET);
        editor.insert_char('x', now);
        let typed = editor.text();

        assert!(!editor.adopt_remote("one\ntwo"));
        assert_eq!(editor.text(), typed);
    }

    #[test]
    fn ensure_cursor_visible_scrolls_both_ways() {
        let (mut editor, _) = editor("a\nb\nc\nd\ne\nf");

        editor.cursor_line = 5;
        editor.ensure_cursor_visible(3);
        assert_eq!(editor.scroll, 3);

        editor.cursor_line = 0;
        editor.ensure_cursor_visible(3);
        assert_eq!(editor.scroll, 0);
    }

    #[test]
    fn persona_cycles_through_the_roster() {
        let mut state = AppState::default();
        let first = state.persona();

        for _ in 0..DUCK_PERSONALITIES.len() {
            state.next_persona();
        }

        assert_eq!(state.persona(), first);
    }
}
