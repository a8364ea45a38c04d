//! Top-level UI composition.

use crate::app::state::{AppState, SaveState};
use crate::domain::Route;
use crate::ui::components::{
    footer,
    header::{self, HeaderModel, SaveStatusModel},
    shared::short_timestamp,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

pub mod components;
mod hints;
pub mod screens;
pub mod theme;

/// Draws the active screen.
pub fn render(frame: &mut Frame<'_>, state: &mut AppState) {
    let hints = hints::build(state);

    let root = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(footer::required_height(frame.area().width, &hints)),
    ])
    .split(frame.area());

    header::render(
        frame,
        root[0],
        &HeaderModel {
            app_label: "🦆 quack".to_owned(),
            context_label: state.user_label.clone(),
            persona_label: state.persona().to_string(),
            save_status: save_status_model(state),
            operation: state.operation_display(),
            error: state.error_message.clone(),
        },
    );

    match state.route {
        Route::Editor => screens::editor::render(frame, root[1], &mut state.editor),
        Route::Review => {
            if let Some(review) = state.review.as_ref() {
                screens::review::render(frame, root[1], review);
            } else {
                screens::editor::render(frame, root[1], &mut state.editor);
            }
        }
    }

    footer::render(frame, root[2], &hints);
}

fn save_status_model(state: &AppState) -> SaveStatusModel {
    match state.editor.sync.save_state() {
        SaveState::Clean => SaveStatusModel::Saved {
            age: state.editor.last_saved_unix_ms.map(short_timestamp),
        },
        SaveState::PendingDebounce => SaveStatusModel::Unsaved,
        SaveState::Saving => SaveStatusModel::Saving,
        SaveState::Error => SaveStatusModel::Failed,
    }
}
