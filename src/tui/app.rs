//! TUI application state management.

use crate::catalog::example_code;
use crate::client::{Language, VisualizationKind};
use crate::generate::{GenerationOutcome, Orchestrator};
use crate::output::AssetState;

use super::panes::PaneSplit;

/// Application state for the TUI
#[derive(Debug)]
pub struct App {
    /// Editor buffer, one entry per line
    pub lines: Vec<String>,
    /// Cursor line index
    pub cursor_row: usize,
    /// Cursor column as a character index within the line
    pub cursor_col: usize,
    /// Selected script language
    pub language: Language,
    /// Selected visualization kind
    pub kind: VisualizationKind,
    /// Generation attempt state machine
    pub orchestrator: Orchestrator,
    /// Image asset fetch progress for the current result
    pub asset: AssetState,
    /// Two-pane split engine
    pub split: PaneSplit,
    /// Status message to display
    pub status_message: String,
    /// Whether to show help
    pub show_help: bool,
    /// Service base address, shown in the status bar
    pub backend_url: String,
    /// Draw-loop tick, drives the loading spinner
    pub tick: u64,
    /// True while the buffer still holds an unmodified example script;
    /// selector changes only replace a pristine buffer
    pristine_example: bool,
}

impl App {
    pub fn new(
        language: Language,
        kind: VisualizationKind,
        split_ratio: f32,
        backend_url: String,
        initial_code: Option<String>,
    ) -> Self {
        let (text, pristine) = match initial_code {
            Some(code) => (code, false),
            None => (example_code(language, kind).to_string(), true),
        };

        let mut app = Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            language,
            kind,
            orchestrator: Orchestrator::new(),
            asset: AssetState::Idle,
            split: PaneSplit::new(split_ratio),
            status_message: String::new(),
            show_help: false,
            backend_url,
            tick: 0,
            pristine_example: pristine,
        };
        app.set_code(&text);
        app.update_status_message();
        app
    }

    /// Full editor contents
    pub fn code(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the buffer and park the cursor at the start
    pub fn set_code(&mut self, code: &str) {
        self.lines = code.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    /// Cycle the language selector; a pristine buffer gets the matching example
    pub fn cycle_language(&mut self) {
        self.language = self.language.cycle();
        self.reload_example_if_pristine();
        self.update_status_message();
    }

    /// Cycle the visualization kind selector
    pub fn cycle_kind(&mut self) {
        self.kind = self.kind.cycle();
        self.reload_example_if_pristine();
        self.update_status_message();
    }

    fn reload_example_if_pristine(&mut self) {
        if self.pristine_example || self.code().trim().is_empty() {
            self.set_code(example_code(self.language, self.kind));
            self.pristine_example = true;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Reference of the current successful outcome, if any
    pub fn current_reference(&self) -> Option<&str> {
        match self.orchestrator.outcome() {
            GenerationOutcome::Succeeded { reference, .. } => Some(reference),
            _ => None,
        }
    }

    pub fn update_status_message(&mut self) {
        self.status_message = format!(
            "{} | {} | {} | ctrl+g generate, F1 help",
            self.language.label(),
            self.kind.label(),
            self.backend_url,
        );
    }

    // ----- Editor editing helpers -----

    fn byte_index(line: &str, char_col: usize) -> usize {
        line.char_indices()
            .nth(char_col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn line_char_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = Self::byte_index(&self.lines[self.cursor_row], self.cursor_col);
        self.lines[self.cursor_row].insert(idx, c);
        self.cursor_col += 1;
        self.pristine_example = false;
    }

    pub fn insert_newline(&mut self) {
        let idx = Self::byte_index(&self.lines[self.cursor_row], self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(idx);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.pristine_example = false;
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let idx = Self::byte_index(&self.lines[self.cursor_row], self.cursor_col - 1);
            self.lines[self.cursor_row].remove(idx);
            self.cursor_col -= 1;
            self.pristine_example = false;
        } else if self.cursor_row > 0 {
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.line_char_len(self.cursor_row);
            self.lines[self.cursor_row].push_str(&line);
            self.pristine_example = false;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_col < self.line_char_len(self.cursor_row) {
            let idx = Self::byte_index(&self.lines[self.cursor_row], self.cursor_col);
            self.lines[self.cursor_row].remove(idx);
            self.pristine_example = false;
        } else if self.cursor_row + 1 < self.lines.len() {
            let line = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&line);
            self.pristine_example = false;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_char_len(self.cursor_row);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.line_char_len(self.cursor_row) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.line_char_len(self.cursor_row));
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.line_char_len(self.cursor_row));
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.line_char_len(self.cursor_row);
    }
}
