//! Visual harness for deterministic rendering snapshots.

use crate::app::state::AppState;
use crate::fixtures;
use crate::ui;
use anyhow::Context;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

/// Renders demo editor and review screens into plain text.
pub fn render_demo_dump(width: u16, height: u16) -> anyhow::Result<String> {
    let editor = render_demo_editor(width, height)?;
    let review = render_demo_review(width, height)?;

    Ok(format!(
        "=== EDITOR SCREEN ===\n{editor}\n\n=== REVIEW SCREEN ===\n{review}\n"
    ))
}

fn render_demo_editor(width: u16, height: u16) -> anyhow::Result<String> {
    let mut state = demo_editor_state();

    // A small margin-drag selection so the duck gutter shows up in the dump.
    state.editor.selection.begin_drag(4);
    state.editor.selection.drag_to(6);
    state.editor.selection.end_drag();

    render_state_to_string(&mut state, width, height)
}

fn render_demo_review(width: u16, height: u16) -> anyhow::Result<String> {
    let mut state = demo_editor_state();
    state.open_review(fixtures::demo_review_outcome());
    render_state_to_string(&mut state, width, height)
}

fn demo_editor_state() -> AppState {
    let record = fixtures::demo_code_record();
    let mut state = AppState::default();

    state.set_user_label("demo");
    state.editor.adopt_remote(&record.code);
    state.editor.last_saved_unix_ms = Some(record.updated_at_unix_ms);
    state
}

fn render_state_to_string(state: &mut AppState, width: u16, height: u16) -> anyhow::Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).context("failed to create test terminal")?;

    terminal
        .draw(|frame| ui::render(frame, state))
        .context("failed to render frame")?;

    let buffer = terminal.backend().buffer().clone();

    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            out.push_str(buffer[(x, y)].symbol());
        }
        while out.ends_with(' ') {
            out.pop();
        }
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::render_demo_dump;

    #[test]
    fn demo_dump_contains_both_screens() {
        let dump = render_demo_dump(120, 36).expect("render should succeed");
        assert!(dump.contains("=== EDITOR SCREEN ==="));
        assert!(dump.contains("=== REVIEW SCREEN ==="));
        assert!(dump.contains("quack"));
        assert!(dump.contains("Code Pad"));
        assert!(dump.contains("Issues (2)"));
    }

    #[test]
    fn demo_editor_shows_the_selection_stats() {
        let dump = render_demo_dump(120, 36).expect("render should succeed");
        assert!(dump.contains("selected: 5,6,7"));
    }
}
