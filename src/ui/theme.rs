//! Viewer palette
//!
//! Colors are named for the role they play in the panes, so one entry can
//! serve several widgets (the focused border and function headers share
//! `accent`, for instance).

use ratatui::style::Color;

pub struct Theme {
    pub text: Color,
    /// Comments, line numbers, separators and unfocused borders
    pub muted: Color,
    /// Focused border and function names
    pub accent: Color,
    /// Keywords, brackets, calls and the position badge
    pub keyword: Color,
    /// Integer, string and keyword constants
    pub literal: Color,
    pub type_name: Color,
    /// Labels and the jumps that target them
    pub jump: Color,
    /// Pushes and the START badge
    pub ok: Color,
    /// Selected line number, pops and the END badge
    pub marker: Color,
    pub error: Color,
    /// Background of the selected line and the status bar
    pub selection_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    text: Color::Rgb(235, 219, 178),
    muted: Color::Rgb(124, 111, 100),
    accent: Color::Rgb(250, 189, 47),
    keyword: Color::Rgb(131, 165, 152),
    literal: Color::Rgb(211, 134, 155),
    type_name: Color::Rgb(142, 192, 124),
    jump: Color::Rgb(254, 128, 25),
    ok: Color::Rgb(184, 187, 38),
    marker: Color::Rgb(215, 153, 33),
    error: Color::Rgb(251, 73, 52),
    selection_bg: Color::Rgb(60, 56, 54),
};
