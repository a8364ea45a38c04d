//! Application runtime, event loop, and input handling.

pub mod editor;
pub mod events;
pub mod state;

use crate::app::events::{
    WorkerMessage, spawn_load_code_record, spawn_request_review, spawn_save_code_record,
};
use crate::app::state::AppState;
use crate::bridge::AgentBridge;
use crate::config::ReviewSettings;
use crate::domain::Route;
#[cfg(feature = "harness")]
use crate::fixtures;
use crate::review::requester::ReviewClient;
use crate::store::client::{StoreClient, create_client};
use crate::ui;
use anyhow::Context;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Runtime configuration assembled from CLI flags and the config file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_id: Option<String>,
    pub store_url: Option<String>,
    pub debounce: Duration,
    pub review: ReviewSettings,
    pub agent_endpoint: Option<String>,
    #[cfg(feature = "harness")]
    pub demo: bool,
}

enum DataMode {
    #[cfg(feature = "harness")]
    Demo,
    Live {
        store: StoreClient,
        user_id: String,
    },
}

/// Runs the interactive TUI application.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WorkerMessage>();

    let mut state = AppState::new(config.debounce);
    let mode = {
        #[cfg(feature = "harness")]
        {
            if config.demo {
                initialize_demo_state(&mut state);
                DataMode::Demo
            } else {
                create_live_mode(&mut state, &config, &tx)?
            }
        }
        #[cfg(not(feature = "harness"))]
        {
            create_live_mode(&mut state, &config, &tx)?
        }
    };

    let bridge = config.agent_endpoint.clone().map(AgentBridge::connect);

    let mut terminal = setup_terminal()?;

    let result = run_event_loop(
        &mut terminal,
        &mut state,
        &mode,
        &config.review,
        bridge.as_ref(),
        &tx,
        &mut rx,
    )
    .await;

    restore_terminal(&mut terminal)?;
    result
}

fn create_live_mode(
    state: &mut AppState,
    config: &AppConfig,
    tx: &UnboundedSender<WorkerMessage>,
) -> anyhow::Result<DataMode> {
    let user_id = config
        .user_id
        .clone()
        .context("user id is required; pass --user or set `sync.user_id` in the config")?;

    let store = create_client(config.store_url.as_deref())
        .context("failed to create record store client")?;

    state.set_user_label(user_id.clone());
    state.begin_operation("Loading saved code");
    spawn_load_code_record(tx.clone(), store.clone(), user_id.clone());

    Ok(DataMode::Live { store, user_id })
}

#[cfg(feature = "harness")]
fn initialize_demo_state(state: &mut AppState) {
    let record = fixtures::demo_code_record();

    state.set_user_label("demo");
    state.editor.adopt_remote(&record.code);
    state.editor.last_saved_unix_ms = Some(record.updated_at_unix_ms);
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut AppState,
    mode: &DataMode,
    review_settings: &ReviewSettings,
    bridge: Option<&AgentBridge>,
    tx: &UnboundedSender<WorkerMessage>,
    rx: &mut UnboundedReceiver<WorkerMessage>,
) -> anyhow::Result<()> {
    loop {
        state.advance_spinner();

        while let Ok(message) = rx.try_recv() {
            process_worker_message(state, bridge, message);
        }

        pump_pending_save(state, mode, tx);

        terminal.draw(|frame| ui::render(frame, state))?;

        if state.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(60))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.kind == KeyEventKind::Press {
                        handle_key_event(state, mode, review_settings, bridge, tx, key_event);
                    }
                }
                Event::Mouse(mouse_event) => handle_mouse_event(state, mouse_event),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Issues the debounced upsert once the controller's deadline fires.
fn pump_pending_save(state: &mut AppState, mode: &DataMode, tx: &UnboundedSender<WorkerMessage>) {
    let Some(request) = state.editor.sync.poll(Instant::now()) else {
        return;
    };

    match mode {
        #[cfg(feature = "harness")]
        DataMode::Demo => {
            // No store behind demo mode; acknowledge through the normal channel.
            let _ = tx.send(WorkerMessage::CodeRecordSaved {
                result: Ok(events::unix_ms_now()),
            });
        }
        DataMode::Live { store, user_id } => {
            spawn_save_code_record(tx.clone(), store.clone(), user_id.clone(), request.code);
        }
    }
}

fn process_worker_message(
    state: &mut AppState,
    bridge: Option<&AgentBridge>,
    message: WorkerMessage,
) {
    match message {
        WorkerMessage::CodeRecordLoaded { result } => {
            state.end_operation();

            match result {
                Ok(record) => {
                    state.error_message = None;

                    if state.editor.adopt_remote(&record.code) {
                        if !record.is_default {
                            state.editor.last_saved_unix_ms = Some(record.updated_at_unix_ms);
                        }
                        if let Some(bridge) = bridge {
                            bridge.send_session_start(&state.user_label, &record.code);
                        }
                    } else {
                        tracing::debug!("discarded late record fetch; local edits win");
                    }
                }
                Err(error) => {
                    state.error_message = Some(error);
                }
            }
        }
        WorkerMessage::CodeRecordSaved { result } => match result {
            Ok(saved_at_unix_ms) => {
                state.error_message = None;
                state.editor.save_succeeded(Instant::now(), saved_at_unix_ms);

                if let Some(bridge) = bridge {
                    bridge.send_code_snapshot(&state.editor.text());
                }
            }
            Err(error) => {
                tracing::warn!(%error, "code record upsert failed");
                state.editor.sync.save_failed(Instant::now());
                state.error_message = Some(format!("save failed: {error}"));
            }
        },
        WorkerMessage::ReviewCompleted { result } => {
            state.end_operation();

            match result {
                Ok(outcome) => {
                    state.error_message = None;
                    state.open_review(outcome);
                }
                Err(error) => {
                    state.error_message = Some(error);
                }
            }
        }
    }
}

fn handle_key_event(
    state: &mut AppState,
    mode: &DataMode,
    review_settings: &ReviewSettings,
    bridge: Option<&AgentBridge>,
    tx: &UnboundedSender<WorkerMessage>,
    key: KeyEvent,
) {
    match state.route {
        Route::Editor => handle_editor_key_event(state, mode, review_settings, bridge, tx, key),
        Route::Review => handle_review_key_event(state, key),
    }
}

fn handle_editor_key_event(
    state: &mut AppState,
    mode: &DataMode,
    review_settings: &ReviewSettings,
    bridge: Option<&AgentBridge>,
    tx: &UnboundedSender<WorkerMessage>,
    key: KeyEvent,
) {
    let now = Instant::now();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => state.should_quit = true,
            KeyCode::Char('r') => request_review(state, mode, review_settings, tx),
            KeyCode::Char('p') => {
                let persona = state.next_persona();
                if let Some(bridge) = bridge {
                    bridge.send_persona(&persona);
                }
            }
            KeyCode::Char('n') => state.editor.reset(now),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => state.editor.selection.clear(),
        KeyCode::Enter => state.editor.split_line(now),
        KeyCode::Backspace => state.editor.backspace(now),
        KeyCode::Up => state.editor.move_cursor_up(),
        KeyCode::Down => state.editor.move_cursor_down(),
        KeyCode::Left => state.editor.move_cursor_left(),
        KeyCode::Right => state.editor.move_cursor_right(),
        KeyCode::Home => state.editor.move_cursor_line_start(),
        KeyCode::End => state.editor.move_cursor_line_end(),
        KeyCode::Char(ch) => {
            if !ch.is_control() {
                state.editor.insert_char(ch, now);
            }
        }
        _ => {}
    }
}

fn handle_review_key_event(state: &mut AppState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
        state.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
        }
        KeyCode::Char('b') | KeyCode::Esc => {
            state.back_to_editor();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(review) = state.review.as_mut() {
                review.move_down();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(review) = state.review.as_mut() {
                review.move_up();
            }
        }
        _ => {}
    }
}

fn request_review(
    state: &mut AppState,
    mode: &DataMode,
    review_settings: &ReviewSettings,
    tx: &UnboundedSender<WorkerMessage>,
) {
    if state.is_busy() {
        return;
    }

    let code = state.editor.text();
    if code.trim().is_empty() {
        state.error_message = Some("nothing to review; the buffer is empty".to_owned());
        return;
    }

    match mode {
        #[cfg(feature = "harness")]
        DataMode::Demo => {
            state.error_message = None;
            state.open_review(fixtures::demo_review_outcome());
        }
        DataMode::Live { .. } => match ReviewClient::new(review_settings) {
            Ok(reviewer) => {
                state.error_message = None;
                state.begin_operation("Requesting code review");
                spawn_request_review(tx.clone(), reviewer, code);
            }
            Err(error) => {
                state.error_message = Some(error.to_string());
            }
        },
    }
}

fn handle_mouse_event(state: &mut AppState, mouse: MouseEvent) {
    if state.route != Route::Editor {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(line) = state.editor.line_at(mouse.column, mouse.row) else {
                return;
            };

            state.editor.place_cursor(line);
            if ui::screens::editor::in_duck_margin(state.editor.viewport, mouse.column) {
                state.editor.selection.begin_drag(line);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if state.editor.selection.is_dragging() {
                if let Some(line) = state.editor.line_at(mouse.column, mouse.row) {
                    state.editor.selection.drag_to(line);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => state.editor.selection.end_drag(),
        _ => {}
    }
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;

    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(out);
    let terminal = Terminal::new(backend).context("failed to create ratatui terminal")?;

    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("failed to leave alternate screen")?;

    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}
