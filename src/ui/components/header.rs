//! Header component shared by the editor and review screens.

use crate::ui::theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Header payload consumed by the renderer.
#[derive(Debug, Clone)]
pub struct HeaderModel {
    pub app_label: String,
    pub context_label: String,
    pub persona_label: String,
    pub save_status: SaveStatusModel,
    pub operation: Option<String>,
    pub error: Option<String>,
}

/// Tri-state save indicator displayed at the right edge of the header.
#[derive(Debug, Clone)]
pub enum SaveStatusModel {
    Saved { age: Option<String> },
    Saving,
    Unsaved,
    Failed,
}

/// Renders the screen header with title, persona, operation/error state, and
/// the save indicator.
pub fn render(frame: &mut Frame<'_>, area: Rect, model: &HeaderModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut left_spans = vec![
        Span::styled(format!(" {}", model.app_label), theme::title()),
        Span::styled(format!(" {}", model.context_label), theme::dim()),
        Span::styled(format!("  {}", model.persona_label), theme::duck()),
    ];
    if let Some(error) = &model.error {
        left_spans.push(Span::styled(format!("  error: {error}"), theme::error()));
    } else if let Some(operation) = &model.operation {
        left_spans.push(Span::styled(format!("  {operation}"), theme::info()));
    }

    let status = save_status_span(&model.save_status);
    let status_width = (status.content.chars().count() as u16 + 1).min(inner.width);
    let columns =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(status_width)]).split(inner);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), columns[0]);
    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Right),
        columns[1],
    );
}

fn save_status_span(status: &SaveStatusModel) -> Span<'static> {
    match status {
        SaveStatusModel::Saved { age } => {
            let text = match age {
                Some(age) => format!("● saved {age} "),
                None => "● saved ".to_owned(),
            };
            Span::styled(text, theme::saved())
        }
        SaveStatusModel::Saving => Span::styled("◌ saving… ".to_owned(), theme::saving()),
        SaveStatusModel::Unsaved => Span::styled("○ unsaved ".to_owned(), theme::unsaved()),
        SaveStatusModel::Failed => Span::styled("✗ save failed ".to_owned(), theme::error()),
    }
}

#[cfg(test)]
mod tests {
    use super::{SaveStatusModel, save_status_span};

    #[test]
    fn saved_status_carries_the_record_age() {
        let span = save_status_span(&SaveStatusModel::Saved {
            age: Some("3s ago".to_owned()),
        });
        assert_eq!(span.content.as_ref(), "● saved 3s ago ");
    }

    #[test]
    fn failed_status_reads_as_a_failure() {
        let span = save_status_span(&SaveStatusModel::Failed);
        assert!(span.content.contains("save failed"));
    }
}
