//! Full-screen editor and output view built on Ratatui.

pub mod app;
pub mod events;
pub mod handler;
pub mod panes;
pub mod ui;

pub use handler::run_tui;
