use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::core::CaptureEvent;

/// Terminal events, already translated for the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    /// Goes straight to the input multiplexer.
    Capture(CaptureEvent),
    Resize,
    Quit,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event(timeout: Duration) -> io::Result<Option<TermEvent>> {
    if event::poll(timeout)? {
        Ok(map_event(event::read()?))
    } else {
        Ok(None)
    }
}

/// Translate a crossterm event. Printable keys and pastes become input
/// events; everything else becomes a key-down with the browser-style name the
/// multiplexer expects.
pub fn map_event(event: Event) -> Option<TermEvent> {
    match event {
        Event::Key(key_event) => {
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            let token = match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c' | 'd')) => return Some(TermEvent::Quit),
                (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(TermEvent::Capture(CaptureEvent::input(c.to_string())));
                }
                (_, KeyCode::Left) => "ArrowLeft".to_string(),
                (_, KeyCode::Right) => "ArrowRight".to_string(),
                (_, KeyCode::Up) => "ArrowUp".to_string(),
                (_, KeyCode::Down) => "ArrowDown".to_string(),
                (_, KeyCode::Backspace) => "Backspace".to_string(),
                (_, KeyCode::Enter) => "Enter".to_string(),
                (_, KeyCode::Delete) => "Delete".to_string(),
                (_, KeyCode::Home) => "Home".to_string(),
                (_, KeyCode::End) => "End".to_string(),
                (_, KeyCode::PageUp) => "PageUp".to_string(),
                (_, KeyCode::PageDown) => "PageDown".to_string(),
                (_, KeyCode::Tab) => "Tab".to_string(),
                (_, KeyCode::BackTab) => "BackTab".to_string(),
                (_, KeyCode::Insert) => "Insert".to_string(),
                (_, KeyCode::Esc) => "Escape".to_string(),
                (_, KeyCode::F(n)) => format!("F{n}"),
                _ => return None,
            };
            Some(TermEvent::Capture(CaptureEvent::KeyDown(token)))
        }
        // Bracketed paste: one burst, split by the multiplexer
        Event::Paste(data) => Some(TermEvent::Capture(CaptureEvent::Input(data))),
        Event::Resize(_, _) => Some(TermEvent::Resize),
        _ => None,
    }
}
