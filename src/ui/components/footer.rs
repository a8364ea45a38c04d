//! Footer component used for keybinding hints.

use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Returns the footer height required to render all hint tokens at `screen_width`.
pub fn required_height(screen_width: u16, hints: &str) -> u16 {
    wrap_hints(hints, usize::from(screen_width.max(1)))
        .len()
        .max(1) as u16
}

/// Renders keybinding hints in a plain bottom bar.
pub fn render(frame: &mut Frame<'_>, area: Rect, hints: &str) {
    let rows = wrap_hints(hints, usize::from(area.width.max(1)));
    let text: Vec<Line<'static>> = if rows.is_empty() {
        vec![Line::from(" ")]
    } else {
        rows.iter().map(|row| styled_row(row)).collect()
    };

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

/// One `[key] description` hint pair.
#[derive(Debug, Clone)]
struct Hint {
    key: String,
    desc: String,
}

impl Hint {
    fn parse(token: &str) -> Self {
        if token.starts_with('[')
            && let Some(end) = token.find(']')
        {
            return Self {
                key: token[..=end].to_owned(),
                desc: token[end + 1..].trim().to_owned(),
            };
        }

        Self {
            key: String::new(),
            desc: token.to_owned(),
        }
    }

    fn width(&self) -> usize {
        let key = self.key.chars().count();
        let desc = self.desc.chars().count();
        match (key, desc) {
            (0, d) => d,
            (k, 0) => k,
            (k, d) => k + 1 + d,
        }
    }
}

/// Greedily packs hint tokens into rows no wider than `width`.
fn wrap_hints(hints: &str, width: usize) -> Vec<Vec<Hint>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<Hint>> = Vec::new();
    let mut row: Vec<Hint> = Vec::new();
    let mut row_width = 0usize;

    for token in hints.split("  ").map(str::trim).filter(|t| !t.is_empty()) {
        let hint = Hint::parse(token);

        if !row.is_empty() && row_width + 2 + hint.width() > width {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }

        if !row.is_empty() {
            row_width += 2;
        }
        row_width += hint.width().min(width);
        row.push(hint);
    }

    if !row.is_empty() {
        rows.push(row);
    }

    rows
}

fn styled_row(hints: &[Hint]) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    for (index, hint) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  ", theme::dim()));
        }
        if !hint.key.is_empty() {
            spans.push(Span::styled(hint.key.clone(), theme::unsaved()));
        }
        if !hint.desc.is_empty() {
            if !hint.key.is_empty() {
                spans.push(Span::styled(" ", theme::dim()));
            }
            spans.push(Span::styled(hint.desc.clone(), theme::dim()));
        }
    }
    if spans.is_empty() {
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::{required_height, wrap_hints};

    #[test]
    fn narrow_terminals_wrap_hints_onto_extra_rows() {
        let hints = "[enter] new line  [backspace] delete  [esc] clear selection";
        assert_eq!(required_height(200, hints), 1);
        assert!(required_height(20, hints) > 1);
    }

    #[test]
    fn tokens_keep_their_key_and_description() {
        let rows = wrap_hints("[C-r] review  quit", 80);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].key, "[C-r]");
        assert_eq!(rows[0][0].desc, "review");
        assert_eq!(rows[0][1].key, "");
        assert_eq!(rows[0][1].desc, "quit");
    }
}
