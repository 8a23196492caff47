//! Async event handler for the TUI session.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::client::{now_millis, GenerateError, Language, VisualizationKind, VizClient};
use crate::config::Config;
use crate::generate::GenerationSuccess;
use crate::output::{classify, AssetState, ContentKind};

use super::{
    app::App,
    events::TuiEvent,
    ui::{content_area, render_ui},
};

/// Run the full-screen editor session
pub async fn run_tui(
    cfg: &Config,
    language: Language,
    kind: VisualizationKind,
    initial_code: Option<String>,
) -> Result<()> {
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "the editor requires a proper terminal environment"
        ));
    }

    // Setup terminal; mouse capture is session-wide so divider drags are
    // tracked anywhere on the screen
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = VizClient::from_config(cfg)?;
    let mut app = App::new(
        language,
        kind,
        cfg.split_ratio(),
        client.base_url().to_string(),
        initial_code,
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel::<TuiEvent>();

    let result = run_app(&mut terminal, &mut app, client, event_tx, event_rx).await;

    // Restore terminal; capture release must happen on every exit path
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: VizClient,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    mut event_rx: mpsc::UnboundedReceiver<TuiEvent>,
) -> Result<()> {
    // Spawn input pump
    let input_tx = event_tx.clone();
    tokio::task::spawn_blocking(move || loop {
        if event::poll(Duration::from_millis(100)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if input_tx.send(TuiEvent::Key(key)).is_err() {
                        break; // Channel closed
                    }
                }
                Ok(Event::Mouse(mouse)) => {
                    if input_tx.send(TuiEvent::Mouse(mouse)).is_err() {
                        break;
                    }
                }
                _ => {}
            }
        }
    });

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;
        app.tick = app.tick.wrapping_add(1);

        if let Ok(tui_event) = event_rx.try_recv() {
            match tui_event {
                TuiEvent::Key(key) => {
                    if handle_key_event(app, key, &client, &event_tx) {
                        break; // Quit requested
                    }
                }
                TuiEvent::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_mouse_event(app, mouse, area);
                }
                TuiEvent::GenerationResult { seq, result } => {
                    handle_generation_result(app, seq, result, &client, &event_tx);
                }
                TuiEvent::AssetFetched { reference, result } => {
                    // Ignore completions for references that are no longer current
                    if app.current_reference() == Some(reference.as_str()) {
                        app.asset = match result {
                            Ok(bytes) => AssetState::Loaded { bytes },
                            Err(message) => AssetState::Failed { message },
                        };
                    }
                }
            }
        }

        // Small delay to prevent busy waiting
        tokio::time::sleep(Duration::from_millis(16)).await; // ~60 FPS
    }

    Ok(())
}

/// Handle keyboard events; returns true when the app should quit
fn handle_key_event(
    app: &mut App,
    key: crossterm::event::KeyEvent,
    client: &VizClient,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) -> bool {
    // Any key closes the help overlay
    if app.show_help {
        app.show_help = false;
        return false;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return true; // Quit
        }
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            submit(app, client, event_tx);
        }
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::F(2) => app.cycle_language(),
        KeyCode::F(3) => app.cycle_kind(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Up => app.move_cursor_up(),
        KeyCode::Down => app.move_cursor_down(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        KeyCode::Enter => app.insert_newline(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Tab => {
            for _ in 0..4 {
                app.insert_char(' ');
            }
        }
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }

    false
}

/// Map mouse input onto the pane divider drag machine
fn handle_mouse_event(app: &mut App, mouse: MouseEvent, area: Rect) {
    let content = content_area(area);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.split.hits_divider(mouse.column, content) {
                app.split.begin_drag();
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.split.update_drag(mouse.column, content.width);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.split.end_drag();
        }
        _ => {}
    }
}

/// Start a generation attempt for the current editor contents
fn submit(app: &mut App, client: &VizClient, event_tx: &mpsc::UnboundedSender<TuiEvent>) {
    // UI-level debounce: one attempt at a time
    if app.orchestrator.in_flight() {
        app.status_message = "Generation already in progress".to_string();
        return;
    }

    let code = app.code();
    match app.orchestrator.begin(&code, app.language, app.kind) {
        Err(err) => {
            // EmptyInput: the outcome already carries the message
            app.status_message = err.to_string();
        }
        Ok(submission) => {
            app.asset = AssetState::Idle;
            app.update_status_message();

            let client = client.clone();
            let tx = event_tx.clone();
            tokio::spawn(async move {
                let result = match client.generate(&submission.request).await {
                    Ok(artifact) => {
                        let millis = now_millis();
                        Ok(GenerationSuccess {
                            reference: client.asset_url(&artifact.output_url, millis),
                            logs: artifact.logs,
                            metadata: artifact.metadata,
                            retrieved_at: millis,
                        })
                    }
                    Err(err) => Err(err),
                };
                let _ = tx.send(TuiEvent::GenerationResult {
                    seq: submission.seq,
                    result,
                });
            });
        }
    }
}

/// Apply a resolved attempt and kick off the asset fetch for raster output
fn handle_generation_result(
    app: &mut App,
    seq: u64,
    result: Result<GenerationSuccess, GenerateError>,
    client: &VizClient,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) {
    if !app.orchestrator.resolve(seq, result) {
        return; // Superseded attempt
    }

    let raster_reference = app
        .current_reference()
        .filter(|r| classify(r) == ContentKind::Image)
        .map(str::to_string);

    if let Some(reference) = raster_reference {
        app.asset = AssetState::Fetching;
        let client = client.clone();
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let result = client
                .fetch_asset(&reference)
                .await
                .map(|bytes| bytes.len())
                .map_err(|e| e.to_string());
            let _ = tx.send(TuiEvent::AssetFetched { reference, result });
        });
    }
}
