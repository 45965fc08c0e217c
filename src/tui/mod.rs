//! # TUI Adapter
//!
//! Hosts a [`LineConsole`] in a real terminal. crossterm is the capture
//! surface, ratatui the output surface.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Threads
//!
//! ```text
//!  blocking thread                      async task (current thread)
//!  ───────────────                      ───────────────────────────
//!  poll crossterm ──► multiplexer ────► repl: read_line / read_key
//!        │                                  │
//!        └─ resize ──► console.refresh()    └─► console.write ──► TerminalSurface
//! ```
//!
//! The capture loop blocks on `event::poll`, so it runs on tokio's blocking
//! pool. Both sides go through the console's locks; the screen lock is only
//! held while a frame is drawn.

mod event;
pub mod surface;

use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use log::{debug, info, warn};
use tokio::sync::oneshot;

use crate::core::config::ResolvedConfig;
use crate::core::{Keypress, LineConsole, OutputSurface, ReadError};
use crate::tui::event::{TermEvent, poll_event};
use crate::tui::surface::TerminalSurface;

/// How long the capture loop blocks before re-checking the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            SetCursorStyle::SteadyBlock // Non-blinking: every frame resets the blink timer
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, SetCursorStyle::DefaultUserShape);
    }
}

pub async fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let terminal = ratatui::try_init()?;
    let result = run_console(config, TerminalSurface::new(terminal)).await;
    ratatui::restore();
    result
}

async fn run_console<S>(config: ResolvedConfig, surface: S) -> std::io::Result<()>
where
    S: OutputSurface + Send + 'static,
    S::Node: Send,
{
    let _terminal_mode_guard = TerminalModeGuard::new()?;
    let console = LineConsole::new(surface);

    let stop = Arc::new(AtomicBool::new(false));
    let (quit_tx, quit_rx) = oneshot::channel();
    let capture = tokio::task::spawn_blocking({
        let console = console.clone();
        let stop = Arc::clone(&stop);
        move || capture_loop(&console, &stop, quit_tx)
    });

    tokio::select! {
        () = repl(&console, &config) => info!("REPL finished"),
        _ = quit_rx => info!("Quit requested from keyboard"),
    }

    stop.store(true, Ordering::Relaxed);
    if let Err(e) = capture.await {
        warn!("Capture loop ended abnormally: {e}");
    }
    Ok(())
}

/// Forward terminal events to the console until told to stop.
fn capture_loop<S: OutputSurface>(
    console: &LineConsole<S>,
    stop: &AtomicBool,
    quit: oneshot::Sender<()>,
) {
    while !stop.load(Ordering::Relaxed) {
        match poll_event(POLL_INTERVAL) {
            Ok(Some(TermEvent::Capture(event))) => {
                console.input().handle(event);
            }
            Ok(Some(TermEvent::Resize)) => console.refresh(),
            Ok(Some(TermEvent::Quit)) => {
                let _ = quit.send(());
                return;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to read terminal event: {e}");
                let _ = quit.send(());
                return;
            }
        }
    }
}

/// Human-readable description for the `key` command.
fn describe_key(key: &Keypress) -> String {
    match key {
        Keypress::Char(c) => format!("char {c:?} (U+{:04X})", u32::from(*c)),
        Keypress::Named(named) => format!("key {named}"),
    }
}

/// The interactive loop: prompt, read a line, act on it.
pub(crate) async fn repl<S: OutputSurface>(console: &LineConsole<S>, config: &ResolvedConfig) {
    console.write([config.greeting.as_str(), "\n"]);
    loop {
        console.write_str(&config.prompt);
        let line = match console.read_line().await {
            Ok(line) => line,
            Err(ReadError::Superseded) => {
                debug!("Line read superseded, leaving REPL");
                return;
            }
        };

        match line.trim() {
            "" => {}
            "exit" | "quit" => return,
            "clear" => console.clear(),
            "key" => {
                console.write_str("press any key\n");
                match console.read_key().await {
                    Ok(key) => console.write([describe_key(&key), "\n".to_string()]),
                    Err(ReadError::Superseded) => return,
                }
            }
            other => console.write([other, "\n"]),
        }
    }
}
