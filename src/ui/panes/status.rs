//! Status bar rendering with keybindings and position indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// 0-based index of the selected instruction
    pub selected: usize,
    pub total: usize,
    /// Name of the function the selection is in
    pub function: Option<&'a str>,
    /// Compilation failed; the listing is partial
    pub has_error: bool,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let position_text = if data.total == 0 {
        " 0/0 ".to_string()
    } else {
        format!(" {}/{} ", data.selected + 1, data.total)
    };

    let mut left_spans = vec![Span::styled(
        position_text,
        Style::default()
            .bg(if data.has_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.keyword
            })
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(function) = data.function {
        left_spans.push(Span::styled(
            format!(" {} ", function),
            Style::default()
                .bg(DEFAULT_THEME.selection_bg)
                .fg(DEFAULT_THEME.accent),
        ));
    }

    left_spans.push(Span::styled(
        " | ",
        Style::default()
            .bg(DEFAULT_THEME.selection_bg)
            .fg(DEFAULT_THEME.muted),
    ));
    left_spans.push(Span::styled(
        format!(" {} ", data.message),
        Style::default()
            .bg(DEFAULT_THEME.selection_bg)
            .fg(if data.has_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.text
            }),
    ));

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.selection_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.muted).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.selection_bg)
        .fg(DEFAULT_THEME.text);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.selection_bg)
        .fg(DEFAULT_THEME.muted);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" function ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / ⌫ ", key_style),
        Span::styled(" end/start ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let badge = if data.has_error {
        Some((" ERROR ", DEFAULT_THEME.error))
    } else if data.total > 0 && data.selected + 1 >= data.total {
        Some((" END ", DEFAULT_THEME.marker))
    } else if data.selected == 0 {
        Some((" START ", DEFAULT_THEME.ok))
    } else {
        None
    };

    if let Some((text, color)) = badge {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            text,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.selection_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
