//! Review result screen renderer.

use crate::app::state::ReviewScreenState;
use crate::domain::{ReviewIssue, ReviewOutcome, ReviewReport};
use crate::ui::components::shared::short_preview;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

pub fn render(frame: &mut Frame<'_>, area: Rect, review: &ReviewScreenState) {
    match &review.outcome {
        ReviewOutcome::Report(report) => render_report(frame, area, review, report),
        ReviewOutcome::Raw(text) => render_raw(frame, area, review, text),
    }
}

fn render_report(
    frame: &mut Frame<'_>,
    area: Rect,
    review: &ReviewScreenState,
    report: &ReviewReport,
) {
    let panes =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(area);

    render_issue_list(frame, panes[0], review, report);
    render_detail(frame, panes[1], review, report);
}

fn render_issue_list(
    frame: &mut Frame<'_>,
    area: Rect,
    review: &ReviewScreenState,
    report: &ReviewReport,
) {
    let block = Block::default()
        .title(Span::styled(
            format!(" Issues ({}) ", report.issues.len()),
            theme::title(),
        ))
        .borders(Borders::ALL)
        .border_style(theme::border());

    let items: Vec<ListItem<'static>> = if report.issues.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No issues reported.",
            theme::dim(),
        )))]
    } else {
        report.issues.iter().map(issue_list_item).collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected())
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !report.issues.is_empty() {
        list_state.select(Some(review.selected_issue));
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn issue_list_item(issue: &ReviewIssue) -> ListItem<'static> {
    let location = match issue.line {
        Some(line) => format!("L{line} "),
        None => String::new(),
    };
    let preview = if issue.excerpt.trim().is_empty() {
        short_preview(&issue.explanation, 48)
    } else {
        short_preview(&issue.excerpt, 48)
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("[{}] ", issue.kind), theme::issue()),
        Span::styled(location, theme::line_number()),
        Span::raw(preview),
    ]))
}

fn render_detail(
    frame: &mut Frame<'_>,
    area: Rect,
    review: &ReviewScreenState,
    report: &ReviewReport,
) {
    let block = Block::default()
        .title(Span::styled(" Detail ", theme::title()))
        .borders(Borders::ALL)
        .border_style(theme::border());

    let mut lines = vec![
        Line::from(Span::styled("Summary", theme::section_title())),
        Line::from(Span::styled(summary_text(report), theme::text())),
    ];

    if let Some(issue) = review.selected_issue() {
        lines.push(Line::from(""));
        lines.extend(issue_detail_lines(issue));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((review.scroll, 0)),
        area,
    );
}

fn issue_detail_lines(issue: &ReviewIssue) -> Vec<Line<'static>> {
    let heading = match issue.line {
        Some(line) => format!("{} issue, line {line}", issue.kind),
        None => format!("{} issue", issue.kind),
    };

    let mut lines = vec![Line::from(Span::styled(heading, theme::issue()))];

    if !issue.excerpt.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {} ", issue.excerpt),
            theme::inline_code(),
        )));
    }
    if !issue.explanation.trim().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Explanation",
            theme::section_title(),
        )));
        lines.push(Line::from(Span::styled(
            issue.explanation.clone(),
            theme::text(),
        )));
    }
    if !issue.suggestion.trim().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Suggestion",
            theme::section_title(),
        )));
        lines.push(Line::from(Span::styled(
            issue.suggestion.clone(),
            theme::text(),
        )));
    }

    lines
}

fn summary_text(report: &ReviewReport) -> String {
    if report.summary.trim().is_empty() {
        "The reviewer returned no summary.".to_owned()
    } else {
        report.summary.clone()
    }
}

fn render_raw(frame: &mut Frame<'_>, area: Rect, review: &ReviewScreenState, text: &str) {
    let block = Block::default()
        .title(Span::styled(" Review (raw model output) ", theme::title()))
        .borders(Borders::ALL)
        .border_style(theme::border());

    frame.render_widget(
        Paragraph::new(text.to_owned())
            .style(theme::text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((review.scroll, 0)),
        area,
    );
}
