//! Shared styles for the TUI.

use ratatui::style::{Color, Modifier, Style};
use std::sync::{OnceLock, RwLock};

/// Runtime theme palette used by the renderer.
#[derive(Debug, Clone)]
pub struct ThemePalette {
    pub border: Color,
    pub title: Color,
    pub dim: Color,
    pub text: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub issue: Color,
    pub error: Color,
    pub info: Color,
    pub duck: Color,
    pub saved: Color,
    pub saving: Color,
    pub unsaved: Color,
    pub line_number: Color,
    pub inline_code_fg: Color,
    pub inline_code_bg: Color,
    pub section_title: Color,
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            border: Color::Rgb(196, 120, 50),
            title: Color::Rgb(235, 170, 90),
            dim: Color::DarkGray,
            text: Color::Rgb(210, 210, 200),
            selected_fg: Color::Black,
            selected_bg: Color::Rgb(226, 180, 92),
            issue: Color::Rgb(231, 178, 88),
            error: Color::Red,
            info: Color::Cyan,
            duck: Color::Rgb(245, 205, 82),
            saved: Color::Green,
            saving: Color::Cyan,
            unsaved: Color::Yellow,
            line_number: Color::DarkGray,
            inline_code_fg: Color::Yellow,
            inline_code_bg: Color::Rgb(40, 40, 40),
            section_title: Color::LightYellow,
        }
    }
}

static ACTIVE_THEME: OnceLock<RwLock<ThemePalette>> = OnceLock::new();

fn store() -> &'static RwLock<ThemePalette> {
    ACTIVE_THEME.get_or_init(|| RwLock::new(ThemePalette::default()))
}

fn with_palette<T>(f: impl FnOnce(&ThemePalette) -> T) -> T {
    let guard = store().read().expect("theme lock poisoned");
    f(&guard)
}

/// Installs the active runtime theme palette.
pub fn apply(palette: ThemePalette) {
    if let Ok(mut guard) = store().write() {
        *guard = palette;
    }
}

pub fn border() -> Style {
    with_palette(|theme| Style::default().fg(theme.border))
}

pub fn title() -> Style {
    with_palette(|theme| {
        Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD)
    })
}

pub fn dim() -> Style {
    with_palette(|theme| Style::default().fg(theme.dim))
}

pub fn text() -> Style {
    with_palette(|theme| Style::default().fg(theme.text))
}

pub fn selected() -> Style {
    with_palette(|theme| Style::default().fg(theme.selected_fg).bg(theme.selected_bg))
}

pub fn issue() -> Style {
    with_palette(|theme| Style::default().fg(theme.issue))
}

pub fn error() -> Style {
    with_palette(|theme| Style::default().fg(theme.error))
}

pub fn info() -> Style {
    with_palette(|theme| Style::default().fg(theme.info))
}

pub fn duck() -> Style {
    with_palette(|theme| Style::default().fg(theme.duck))
}

pub fn saved() -> Style {
    with_palette(|theme| Style::default().fg(theme.saved))
}

pub fn saving() -> Style {
    with_palette(|theme| Style::default().fg(theme.saving))
}

pub fn unsaved() -> Style {
    with_palette(|theme| Style::default().fg(theme.unsaved))
}

pub fn line_number() -> Style {
    with_palette(|theme| Style::default().fg(theme.line_number))
}

pub fn inline_code() -> Style {
    with_palette(|theme| {
        Style::default()
            .fg(theme.inline_code_fg)
            .bg(theme.inline_code_bg)
            .add_modifier(Modifier::BOLD)
    })
}

pub fn section_title() -> Style {
    with_palette(|theme| {
        Style::default()
            .fg(theme.section_title)
            .add_modifier(Modifier::BOLD)
    })
}
