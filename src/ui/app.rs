//! Main TUI application state and logic

use super::panes::{self, ScrollState, StatusRenderData};
use crate::codegen::{Emitted, Instruction};
use crate::errors::CompileError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Vm,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Vm,
            FocusedPane::Vm => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// The source the instructions were compiled from
    pub source_code: String,

    /// Emitted instructions; partial when `error` is set
    pub instructions: Vec<Emitted>,

    /// The error that stopped compilation, if any
    pub error: Option<CompileError>,

    /// Index of the selected instruction
    pub selected: usize,

    pub focused_pane: FocusedPane,

    pub source_scroll: ScrollState,
    pub vm_scroll: ScrollState,

    pub should_quit: bool,

    pub status_message: String,
}

impl App {
    pub fn new(source_code: String, instructions: Vec<Emitted>, error: Option<CompileError>) -> Self {
        let status_message = match &error {
            Some(err) => err.to_string(),
            None => String::from("Ready!"),
        };

        App {
            source_code,
            instructions,
            error,
            selected: 0,
            focused_pane: FocusedPane::Vm,
            source_scroll: ScrollState::default(),
            vm_scroll: ScrollState::default(),
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// 1-based source line of the selected instruction. With nothing emitted
    /// this falls back to the error location, then to 0 (no line).
    pub fn current_line(&self) -> usize {
        match self.instructions.get(self.selected) {
            Some(emitted) => emitted.location.line,
            None => self.error_line().unwrap_or(0),
        }
    }

    pub fn error_line(&self) -> Option<usize> {
        self.error
            .as_ref()
            .and_then(|err| err.location())
            .map(|loc| loc.line)
    }

    /// Name of the function whose body holds the selection.
    pub fn current_function(&self) -> Option<&str> {
        self.instructions
            .iter()
            .take(self.selected + 1)
            .rev()
            .find_map(|emitted| match &emitted.instruction {
                Instruction::Function { name, .. } => Some(name.as_str()),
                _ => None,
            })
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            self.current_line(),
            self.error_line(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_vm_pane(
            frame,
            columns[1],
            &self.instructions,
            self.selected,
            self.focused_pane == FocusedPane::Vm,
            &mut self.vm_scroll,
        );

        let status = StatusRenderData {
            message: &self.status_message,
            selected: self.selected,
            total: self.instructions.len(),
            function: self.current_function(),
            has_error: self.error.is_some(),
        };
        panes::render_status_bar(frame, main_chunks[1], &status);
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = self.step_forward(n);
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                if self.step_backward(1) == 0 {
                    self.status_message = "Cannot step backward: at first instruction".to_string();
                } else {
                    self.status_message = "Stepped backward".to_string();
                }
            }
            KeyCode::Right => {
                if self.step_forward(1) == 0 {
                    self.status_message = "Cannot step forward: at last instruction".to_string();
                } else {
                    self.status_message = "Stepped forward".to_string();
                }
            }
            KeyCode::PageDown => {
                self.status_message = if self.next_function() {
                    "Next function".to_string()
                } else {
                    "No later function".to_string()
                };
            }
            KeyCode::PageUp => {
                self.status_message = if self.prev_function() {
                    "Previous function".to_string()
                } else {
                    "No earlier function".to_string()
                };
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => self.source_scroll.scroll_up(),
                FocusedPane::Vm => self.vm_scroll.scroll_up(),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => self.source_scroll.scroll_down(),
                FocusedPane::Vm => self.vm_scroll.scroll_down(),
            },
            KeyCode::Enter => {
                self.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.jump_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    /// Move the selection up to `n` instructions forward; returns how far it moved.
    pub fn step_forward(&mut self, n: usize) -> usize {
        let last = self.instructions.len().saturating_sub(1);
        let target = (self.selected + n).min(last);
        let stepped = target - self.selected;
        self.selected = target;
        stepped
    }

    pub fn step_backward(&mut self, n: usize) -> usize {
        let target = self.selected.saturating_sub(n);
        let stepped = self.selected - target;
        self.selected = target;
        stepped
    }

    pub fn jump_to_start(&mut self) {
        self.selected = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.selected = self.instructions.len().saturating_sub(1);
    }

    /// Select the next function header. Returns false if there is none.
    pub fn next_function(&mut self) -> bool {
        let found = self
            .instructions
            .iter()
            .enumerate()
            .skip(self.selected + 1)
            .find(|(_, emitted)| matches!(emitted.instruction, Instruction::Function { .. }))
            .map(|(idx, _)| idx);

        match found {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    /// Select the previous function header. Returns false if there is none.
    pub fn prev_function(&mut self) -> bool {
        let found = self
            .instructions
            .iter()
            .enumerate()
            .take(self.selected)
            .rev()
            .find(|(_, emitted)| matches!(emitted.instruction, Instruction::Function { .. }))
            .map(|(idx, _)| idx);

        match found {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    const SOURCE: &str = "class Main {
    function int one() {
        return 1;
    }
    function int two() {
        return 2;
    }
}";

    fn app() -> App {
        let compiled = crate::compile(SOURCE).unwrap();
        App::new(SOURCE.to_string(), compiled.instructions, None)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_stepping_is_clamped() {
        let mut app = app();
        assert_eq!(app.instructions.len(), 6);

        assert_eq!(app.step_backward(1), 0);
        assert_eq!(app.step_forward(4), 4);
        assert_eq!(app.step_forward(4), 1);
        assert_eq!(app.selected, 5);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected, 5);
    }

    #[test]
    fn test_function_jumps() {
        let mut app = app();
        assert_eq!(app.current_function(), Some("Main.one"));
        assert_eq!(app.current_line(), 2);

        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.selected, 3);
        assert_eq!(app.current_function(), Some("Main.two"));
        assert!(!app.next_function());

        press(&mut app, KeyCode::Right);
        assert_eq!(app.current_line(), 6);

        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.selected, 3);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_partial_output_with_error() {
        let source = "class Main { function void f() { let 5 = 1; } }";
        let mut parser = crate::parser::Parser::new(source).unwrap();
        let err = parser.compile_class().unwrap_err();
        let app = App::new(source.to_string(), parser.output().to_vec(), Some(err));

        assert_eq!(app.instructions.len(), 1);
        assert_eq!(app.error_line(), Some(1));
        assert!(app.status_message.contains("letStatement"));
    }

    #[test]
    fn test_digit_keys_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.selected, 3);
        assert_eq!(app.status_message, "Stepped forward 3 step(s)");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
