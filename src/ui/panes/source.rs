//! Source code pane rendering with syntax highlighting
//!
//! # Features
//!
//! - Syntax highlighting for keywords, types, strings, numbers, and comments
//! - Current line highlighting: the line that produced the selected instruction
//! - Error line marked in red when compilation failed
//! - Line numbering
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character scanner to apply syntax
//! highlighting styles rather than the compiler's lexer, so half-written
//! lines and multi-line comments still render.

use super::ScrollState;
use crate::parser::token::Keyword;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn flush_word(word: &mut String, spans: &mut Vec<Span<'static>>, is_call: bool) {
    if !word.is_empty() {
        let style = word_style(word, is_call);
        spans.push(Span::styled(std::mem::take(word), style));
    }
}

fn highlight_source_code(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comments run to the end of the line; a continuation line of a block
        // comment starts with `*`
        let is_comment = (c == '/' && matches!(chars.get(i + 1), Some('/') | Some('*')))
            || (c == '*' && current_word.is_empty() && chars[..i].iter().all(|c| c.is_whitespace()));
        if is_comment {
            flush_word(&mut current_word, &mut spans, false);
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.muted),
            ));
            break;
        }

        if c == '"' {
            flush_word(&mut current_word, &mut spans, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '"' {
                end += 1;
            }
            if end < chars.len() {
                end += 1;
            }
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.literal),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut current_word, &mut spans, c == '(');

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.keyword),
                _ => Style::default().fg(DEFAULT_THEME.text),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut current_word, &mut spans, false);
    Line::from(spans)
}

fn word_style(word: &str, is_call: bool) -> Style {
    match Keyword::lookup(word) {
        Some(Keyword::Int | Keyword::Char | Keyword::Boolean | Keyword::Void) => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        Some(Keyword::True | Keyword::False | Keyword::Null | Keyword::This) => {
            Style::default().fg(DEFAULT_THEME.literal)
        }
        Some(_) => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        None if word.chars().all(|c| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.literal)
        }
        None if is_call => Style::default().fg(DEFAULT_THEME.accent),
        // Class names are capitalized by convention
        None if word.starts_with(|c: char| c.is_ascii_uppercase()) => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        None => Style::default().fg(DEFAULT_THEME.text),
    }
}

/// Render the source code pane
///
/// `current_line` is 1-based; 0 means no line is selected.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    error_line: Option<usize>,
    is_focused: bool,
    scroll_state: &mut ScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.muted)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if current_line > 0 {
        scroll_state.follow(current_line - 1, lines.len(), visible_height);
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_line == Some(line_num);
            let is_current = line_num == current_line;
            let line_num_str = format!("{:4} ", line_num);

            let mut content_line = highlight_source_code(line);

            let num_style = if is_error {
                for span in &mut content_line.spans {
                    span.style = Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                for span in &mut content_line.spans {
                    span.style = span
                        .style
                        .patch(Style::default().bg(DEFAULT_THEME.selection_bg));
                }
                Style::default()
                    .fg(DEFAULT_THEME.marker)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.muted)
            };

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_splits_words_and_symbols() {
        let line = highlight_source_code("let x = \"a b\"; // done");
        assert_eq!(
            texts(&line),
            vec!["let", " ", "x", " ", "=", " ", "\"a b\"", ";", " ", "// done"]
        );
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(line.spans[6].style.fg, Some(DEFAULT_THEME.literal));
        assert_eq!(line.spans[9].style.fg, Some(DEFAULT_THEME.muted));
    }

    #[test]
    fn test_word_styles() {
        assert_eq!(word_style("int", false).fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(word_style("Array", false).fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(word_style("true", false).fg, Some(DEFAULT_THEME.literal));
        assert_eq!(word_style("42", false).fg, Some(DEFAULT_THEME.literal));
        assert_eq!(word_style("draw", true).fg, Some(DEFAULT_THEME.accent));
        assert_eq!(word_style("size", false).fg, Some(DEFAULT_THEME.text));
    }

    #[test]
    fn test_block_comment_continuation() {
        let line = highlight_source_code("   * Returns the sum.");
        assert_eq!(line.spans.last().map(|s| s.style.fg), Some(Some(DEFAULT_THEME.muted)));
    }
}
