//! # Input Multiplexer
//!
//! Turns the capture surface's raw signals into one ordered stream of
//! [`Keypress`] values with a single consumer.
//!
//! ```text
//!  KeyDown("ArrowLeft") ──────────┐
//!                                 ▼
//!  Input("abc") ──► queue: [a, b, c, ArrowLeft] ──► head ──► pending read (one slot)
//!        ▲
//!  CompositionStart / CompositionEnd(field) (lock)
//! ```
//!
//! Everything goes through the queue, so keys reach the reader in arrival
//! order even when no read is pending at the time they arrive.
//!
//! ## Single reader
//!
//! The pending read is a one-slot register holding the sending half of a
//! `oneshot` channel. Calling [`InputMultiplexer::read_one`] drops whatever
//! sender is in the slot, so the older reader wakes up with
//! [`ReadError::Superseded`] and the newest reader is the only one that can
//! receive the next key. A dropped sender can never fire, so an abandoned read
//! is never fulfilled late.
//!
//! ## Composition
//!
//! While an IME composition is active, input events only update the raw text
//! field. Composition end carries the field's live text, which replaces the
//! mirror and is flushed exactly once. The mirror alone can still hold a
//! pre-edit string when the final input event fires after composition end.
//! Platforms disagree on that order, so a trailing input event that repeats
//! the flushed text is swallowed.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use tokio::sync::oneshot;

use super::keypress::{Keypress, NamedKey};

/// Why a read finished without a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// A newer read took the slot. The caller should stop, not retry.
    Superseded,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Superseded => write!(f, "read superseded by a newer read"),
        }
    }
}

impl std::error::Error for ReadError {}

/// Signals produced by the capture surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Raw key-down carrying the platform's key identifier.
    KeyDown(String),
    CompositionStart,
    /// Composition finished; carries the capture field's text at that moment.
    CompositionEnd(String),
    /// The capture field's text changed; carries everything accumulated since
    /// the field was last cleared.
    Input(String),
}

impl CaptureEvent {
    pub fn key(token: impl Into<String>) -> Self {
        CaptureEvent::KeyDown(token.into())
    }

    pub fn input(text: impl Into<String>) -> Self {
        CaptureEvent::Input(text.into())
    }

    pub fn composition_end(field: impl Into<String>) -> Self {
        CaptureEvent::CompositionEnd(field.into())
    }
}

#[derive(Default)]
struct State {
    queue: VecDeque<Keypress>,
    pending: Option<oneshot::Sender<Keypress>>,
    composing: bool,
    /// Mirror of the capture field.
    raw: String,
    /// Text flushed by the last composition end, until the next key or input.
    flushed: Option<String>,
}

impl State {
    /// Queue every character of `text`, then hand the head to the pending read.
    fn dispatch(&mut self, text: &str) {
        self.queue.extend(text.chars().map(Keypress::Char));
        self.wake();
    }

    fn wake(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let Some(sender) = self.pending.take() else {
            return;
        };
        let Some(key) = self.queue.pop_front() else {
            return;
        };
        if let Err(key) = sender.send(key) {
            // Reader future was dropped; the key stays first in line.
            debug!("Reader gone before delivery, requeueing {key}");
            self.queue.push_front(key);
        }
    }

    fn deliver_named(&mut self, key: NamedKey) {
        if self.pending.is_none() {
            debug!("No pending read, queueing {key}");
        }
        self.queue.push_back(Keypress::Named(key));
        self.wake();
    }
}

enum Slot {
    Ready(Keypress),
    Waiting(oneshot::Receiver<Keypress>),
}

/// Shared handle to the keypress stream. Clones refer to the same queue and
/// the same pending-read slot.
#[derive(Clone, Default)]
pub struct InputMultiplexer {
    state: Arc<Mutex<State>>,
}

impl fmt::Debug for InputMultiplexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("InputMultiplexer")
            .field("queued", &state.queue.len())
            .field("reading", &state.pending.is_some())
            .field("composing", &state.composing)
            .finish()
    }
}

impl InputMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State is only touched between awaits, so it is consistent even if a
        // holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request the next keypress.
    ///
    /// The previous pending read (if any) is abandoned when this is *called*,
    /// not when the returned future is first polled. If a key is already
    /// queued the future is ready immediately.
    pub fn read_one(&self) -> impl Future<Output = Result<Keypress, ReadError>> + Send + 'static {
        let slot = {
            let mut state = self.lock();
            if let Some(previous) = state.pending.take()
                && !previous.is_closed()
            {
                debug!("Superseding pending read");
            }
            match state.queue.pop_front() {
                Some(key) => Slot::Ready(key),
                None => {
                    let (sender, receiver) = oneshot::channel();
                    state.pending = Some(sender);
                    Slot::Waiting(receiver)
                }
            }
        };

        async move {
            match slot {
                Slot::Ready(key) => Ok(key),
                Slot::Waiting(receiver) => receiver.await.map_err(|_| ReadError::Superseded),
            }
        }
    }

    /// Feed one capture-surface event.
    ///
    /// Returns `true` when the event was consumed as a named key, meaning the
    /// platform's default handling should be suppressed.
    pub fn handle(&self, event: CaptureEvent) -> bool {
        let mut state = self.lock();
        match event {
            CaptureEvent::KeyDown(token) => {
                state.flushed = None;
                match NamedKey::from_token(&token) {
                    Some(key) => {
                        state.deliver_named(key);
                        true
                    }
                    None => false,
                }
            }
            CaptureEvent::CompositionStart => {
                state.composing = true;
                state.flushed = None;
                false
            }
            CaptureEvent::CompositionEnd(field) => {
                state.composing = false;
                if state.raw != field {
                    debug!("Field is {field:?} at composition end, mirror was {:?}", state.raw);
                }
                state.raw = field;
                if !state.raw.is_empty() {
                    let text = std::mem::take(&mut state.raw);
                    debug!("Composition ended, flushing {text:?}");
                    state.dispatch(&text);
                    state.flushed = Some(text);
                }
                false
            }
            CaptureEvent::Input(text) => {
                if !state.composing && state.flushed.take().is_some_and(|f| f == text) {
                    debug!("Ignoring repeated input {text:?} after composition end");
                    return false;
                }
                state.raw = text;
                if state.composing || state.raw.is_empty() {
                    return false;
                }
                let text = std::mem::take(&mut state.raw);
                state.dispatch(&text);
                false
            }
        }
    }

    /// Number of keys waiting for a reader.
    pub fn queued_len(&self) -> usize {
        self.lock().queue.len()
    }

    /// True while a read is registered and its future is still alive.
    pub fn is_reading(&self) -> bool {
        self.lock().pending.as_ref().is_some_and(|s| !s.is_closed())
    }
}
