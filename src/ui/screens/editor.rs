//! Line editor screen renderer.

use crate::app::state::EditorScreenState;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const LINE_NUMBER_WIDTH: u16 = 4;
const DUCK_MARGIN_WIDTH: u16 = 2;

/// Gutter columns (line number + duck margin) to the left of the text.
const TEXT_START: u16 = LINE_NUMBER_WIDTH + DUCK_MARGIN_WIDTH;

pub fn render(frame: &mut Frame<'_>, area: Rect, editor: &mut EditorScreenState) {
    let rows = Layout::vertical([Constraint::Min(4), Constraint::Length(1)]).split(area);

    render_buffer(frame, rows[0], editor);
    render_stats(frame, rows[1], editor);
}

/// True when a terminal column falls on the duck-margin columns of the last
/// rendered frame, where a click anchors a line-selection drag. Clicks on the
/// line-number column only place the cursor.
pub fn in_duck_margin(viewport: Option<Rect>, column: u16) -> bool {
    viewport.is_some_and(|viewport| {
        column >= viewport.x.saturating_add(LINE_NUMBER_WIDTH)
            && column < viewport.x.saturating_add(TEXT_START)
    })
}

fn render_buffer(frame: &mut Frame<'_>, area: Rect, editor: &mut EditorScreenState) {
    let block = Block::default()
        .title(Span::styled(" Code Pad ", theme::title()))
        .borders(Borders::ALL)
        .border_style(theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    editor.viewport = Some(inner);
    editor.ensure_cursor_visible(usize::from(inner.height));

    let visible_end = (editor.scroll + usize::from(inner.height)).min(editor.line_count());
    let lines: Vec<Line<'_>> = (editor.scroll..visible_end)
        .map(|index| {
            let selected = editor.selection.is_selected(index);
            let margin = if selected { "🦆" } else { "  " };
            let text_style = if selected {
                theme::selected()
            } else {
                theme::text()
            };

            Line::from(vec![
                Span::styled(format!("{:>3} ", index + 1), theme::line_number()),
                Span::styled(margin, theme::duck()),
                Span::styled(editor.lines()[index].as_str(), text_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);

    if editor.cursor_line >= editor.scroll && editor.cursor_line < visible_end {
        let x = inner
            .x
            .saturating_add(TEXT_START)
            .saturating_add(editor.cursor_col as u16)
            .min(inner.right().saturating_sub(1));
        let y = inner.y + (editor.cursor_line - editor.scroll) as u16;
        frame.set_cursor_position(Position { x, y });
    }
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, editor: &EditorScreenState) {
    let mut spans = vec![Span::styled(
        format!(
            " {} lines  {} chars",
            editor.line_count(),
            editor.char_count()
        ),
        theme::dim(),
    )];

    if !editor.selection.is_empty() {
        spans.push(Span::styled(
            format!("  selected: {}", selected_lines_label(editor)),
            theme::info(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Sorted 1-based list of selected lines, e.g. "2,3,4".
fn selected_lines_label(editor: &EditorScreenState) -> String {
    editor
        .selection
        .sorted_lines()
        .into_iter()
        .map(|line| (line + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::{LINE_NUMBER_WIDTH, TEXT_START, in_duck_margin, selected_lines_label};
    use crate::app::state::EditorScreenState;
    use ratatui::layout::Rect;
    use std::time::Duration;

    #[test]
    fn duck_margin_excludes_the_line_number_column() {
        let viewport = Some(Rect::new(10, 2, 60, 20));

        assert!(in_duck_margin(viewport, 10 + LINE_NUMBER_WIDTH));
        assert!(in_duck_margin(viewport, 10 + TEXT_START - 1));
        assert!(!in_duck_margin(viewport, 10));
        assert!(!in_duck_margin(viewport, 10 + LINE_NUMBER_WIDTH - 1));
        assert!(!in_duck_margin(viewport, 10 + TEXT_START));
        assert!(!in_duck_margin(None, 10 + LINE_NUMBER_WIDTH));
    }

    #[test]
    fn selected_lines_label_is_one_based_and_sorted() {
        let mut editor = EditorScreenState::new("a\nb\nc\nd", Duration::from_millis(1000));
        editor.selection.begin_drag(3);
        editor.selection.drag_to(1);
        editor.selection.end_drag();

        assert_eq!(selected_lines_label(&editor), "2,3,4");
    }
}
