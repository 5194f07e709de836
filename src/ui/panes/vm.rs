//! Generated code pane
//!
//! Lists every emitted instruction with its index. Function headers stand
//! out, labels and jumps share a color, and the selected instruction gets the
//! current-line background.

use super::ScrollState;
use crate::codegen::{Emitted, Instruction};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn instruction_style(instruction: &Instruction) -> Style {
    match instruction {
        Instruction::Function { .. } => Style::default()
            .fg(DEFAULT_THEME.accent)
            .add_modifier(Modifier::BOLD),
        Instruction::Return => Style::default().fg(DEFAULT_THEME.accent),
        Instruction::Call { .. } => Style::default().fg(DEFAULT_THEME.keyword),
        Instruction::Label(_) | Instruction::Goto(_) | Instruction::IfGoto(_) => {
            Style::default().fg(DEFAULT_THEME.jump)
        }
        Instruction::Push(..) => Style::default().fg(DEFAULT_THEME.ok),
        Instruction::Pop(..) => Style::default().fg(DEFAULT_THEME.marker),
        Instruction::Arithmetic(_) => Style::default().fg(DEFAULT_THEME.text),
    }
}

/// Render the instruction listing. `selected` is ignored when `instructions` is empty.
pub fn render_vm_pane(
    frame: &mut Frame,
    area: Rect,
    instructions: &[Emitted],
    selected: usize,
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
        .title(format!(" VM Code ({}) ", instructions.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    scroll_state.follow(selected, instructions.len(), visible_height);

    let visible_lines: Vec<Line> = instructions
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, emitted)| {
            let is_selected = idx == selected;
            let mut index_style = Style::default().fg(DEFAULT_THEME.muted);
            let mut text_style = instruction_style(&emitted.instruction);

            if is_selected {
                index_style = Style::default()
                    .fg(DEFAULT_THEME.marker)
                    .add_modifier(Modifier::BOLD);
                text_style = text_style.bg(DEFAULT_THEME.selection_bg);
            }

            // Function bodies are indented under their header
            let indent = match emitted.instruction {
                Instruction::Function { .. } => "",
                _ => "  ",
            };

            Line::from(vec![
                Span::styled(format!("{:5} ", idx), index_style),
                Span::styled(format!("{}{}", indent, emitted.instruction), text_style),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Command, Segment};

    #[test]
    fn test_instruction_roles() {
        let header = Instruction::Function {
            name: "Main.main".to_string(),
            locals: 0,
        };
        assert_eq!(instruction_style(&header).fg, Some(DEFAULT_THEME.accent));
        assert_eq!(
            instruction_style(&Instruction::Label("WHILE_EXP0".to_string())).fg,
            instruction_style(&Instruction::IfGoto("WHILE_END0".to_string())).fg
        );
        assert_eq!(
            instruction_style(&Instruction::Push(Segment::Constant, 1)).fg,
            Some(DEFAULT_THEME.ok)
        );
        assert_eq!(
            instruction_style(&Instruction::Pop(Segment::Temp, 0)).fg,
            Some(DEFAULT_THEME.marker)
        );
        assert_eq!(
            instruction_style(&Instruction::Arithmetic(Command::Add)).fg,
            Some(DEFAULT_THEME.text)
        );
    }
}
