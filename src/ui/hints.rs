//! Footer hint composition for each route.

use crate::app::state::AppState;
use crate::domain::{ReviewOutcome, Route};

pub fn build(state: &AppState) -> String {
    match state.route {
        Route::Editor => editor_hints(state),
        Route::Review => review_hints(state),
    }
}

fn editor_hints(state: &AppState) -> String {
    let mut parts = vec![
        "[type/enter/backspace] edit".to_owned(),
        "[drag margin] select lines".to_owned(),
    ];

    if !state.editor.selection.is_empty() {
        parts.push("[esc] clear selection".to_owned());
    }

    parts.push("[C-r] review".to_owned());
    parts.push("[C-p] next duck".to_owned());
    parts.push("[C-n] reset".to_owned());
    parts.push("[C-q] quit".to_owned());
    parts.join("  ")
}

fn review_hints(state: &AppState) -> String {
    let navigate = match state.review.as_ref().map(|review| &review.outcome) {
        Some(ReviewOutcome::Report(report)) if !report.issues.is_empty() => {
            "[j/k/up/down] select issue"
        }
        _ => "[j/k/up/down] scroll",
    };

    format!("{navigate}  [b/esc] back to editor  [q] quit")
}

#[cfg(test)]
mod tests {
    use super::build;
    use crate::app::state::AppState;
    use crate::domain::{ReviewOutcome, Route};

    #[test]
    fn editor_hints_mention_the_selection_only_when_one_exists() {
        let mut state = AppState::default();
        assert!(!build(&state).contains("clear selection"));

        state.editor.selection.begin_drag(0);
        state.editor.selection.end_drag();
        assert!(build(&state).contains("[esc] clear selection"));
    }

    #[test]
    fn review_hints_offer_the_way_back() {
        let mut state = AppState::default();
        state.open_review(ReviewOutcome::Raw("plain text".to_owned()));

        assert_eq!(state.route, Route::Review);
        assert!(build(&state).contains("[b/esc] back to editor"));
    }
}
