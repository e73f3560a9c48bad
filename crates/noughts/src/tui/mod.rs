//! Terminal UI for noughts

mod app;
mod form;
mod input;
mod ui;

pub use app::App;

use crate::config::Config;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use noughts_store::{GameStore, StoreEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Runs the terminal UI until the user quits.
#[instrument(skip_all)]
pub async fn run_tui(config: &Config) -> Result<()> {
    info!("Starting noughts TUI");

    let mut store = GameStore::with_settings(config.store_settings());
    let (store_tx, store_rx) = mpsc::unbounded_channel();
    store.subscribe(move |event: &StoreEvent| {
        // The receiver only goes away during shutdown.
        let _ = store_tx.send(event.clone());
    });
    let app = App::new(store, config.setup());

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let input_rx = spawn_input_reader();
    let res = run_loop(&mut terminal, app, input_rx, store_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Reads terminal events on a blocking thread and forwards them.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        debug!("Input receiver closed, stopping reader");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read terminal event");
                    break;
                }
            }
        }
    });
    rx
}

/// Sleeps until the store's next scheduled move, or forever when none is pending.
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(due) => tokio::time::sleep_until(tokio::time::Instant::from_std(due)).await,
        None => std::future::pending::<()>().await,
    }
}

#[instrument(skip_all)]
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut input_rx: mpsc::UnboundedReceiver<Event>,
    mut store_rx: mpsc::UnboundedReceiver<StoreEvent>,
) -> Result<()> {
    loop {
        while let Ok(event) = store_rx.try_recv() {
            app.on_store_event(&event);
        }

        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        if app.should_quit() {
            info!("Leaving game loop");
            return Ok(());
        }

        let deadline = app.store().next_deadline();
        tokio::select! {
            maybe_event = input_rx.recv() => match maybe_event {
                Some(event) => app.handle_event(event),
                None => {
                    warn!("Terminal input closed");
                    return Ok(());
                }
            },
            () = wait_for(deadline) => {
                if let Some(report) = app.store_mut().poll_scheduled(Instant::now()) {
                    debug!(?report, "Computer moved");
                }
            }
        }
    }
}
