//! Custom event types for the TUI application.

use crossterm::event::{KeyEvent, MouseEvent};

use crate::client::GenerateError;
use crate::generate::GenerationSuccess;

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Mouse event (divider drag, scrolling)
    Mouse(MouseEvent),
    /// A generation attempt resolved; `seq` identifies the attempt so
    /// superseded results can be dropped
    GenerationResult {
        seq: u64,
        result: Result<GenerationSuccess, GenerateError>,
    },
    /// Background asset fetch finished for the given content reference
    AssetFetched {
        reference: String,
        result: Result<usize, String>,
    },
}
