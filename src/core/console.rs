//! # Line Console
//!
//! A cursor-addressable buffer of [`RenderUnit`]s on top of the keypress
//! stream. Every mutation ends with the full buffer being pushed to the
//! [`OutputSurface`].
//!
//! ## Reading a line
//!
//! `read_line` loops over `read_one()` with an explicit [`LineEdit`] record.
//! Each insert or backspace redraws the whole region after the anchor, so the
//! surface always sees the edited line as one unit per character.
//!
//! ```text
//! buffer:  [ '>' ' ' | 'a' 'X' 'c' ]
//!                    ^ anchor (cursor when read_line started)
//! ```
//!
//! ## Sharing
//!
//! `LineConsole` is a handle. Clones share the buffer, the surface and the
//! input, so a second reader started through any clone supersedes the first.
//! The screen lock is never held across an await.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use super::buffer::OutputBuffer;
use super::keypress::Keypress;
use super::line_edit::{EditStep, LineEdit};
use super::multiplexer::{InputMultiplexer, ReadError};
use super::surface::{OutputSurface, RenderUnit};

/// Argument to [`LineConsole::write`]: text to split per character, or a unit
/// to insert as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteItem<N> {
    Str(String),
    Unit(RenderUnit<N>),
}

impl<N> From<&str> for WriteItem<N> {
    fn from(s: &str) -> Self {
        WriteItem::Str(s.to_string())
    }
}

impl<N> From<String> for WriteItem<N> {
    fn from(s: String) -> Self {
        WriteItem::Str(s)
    }
}

impl<N> From<RenderUnit<N>> for WriteItem<N> {
    fn from(unit: RenderUnit<N>) -> Self {
        WriteItem::Unit(unit)
    }
}

struct Screen<S: OutputSurface> {
    buffer: OutputBuffer<S::Node>,
    surface: S,
    /// Edit position shown by the surface while a line is being read.
    caret: Option<usize>,
}

impl<S: OutputSurface> Screen<S> {
    fn push(&mut self) {
        self.surface.replace_content(self.buffer.units());
    }

    fn set_caret(&mut self, caret: Option<usize>) {
        if self.caret != caret {
            self.caret = caret;
            self.surface.move_caret(caret);
        }
    }
}

pub struct LineConsole<S: OutputSurface> {
    input: InputMultiplexer,
    screen: Arc<Mutex<Screen<S>>>,
}

impl<S: OutputSurface> Clone for LineConsole<S> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            screen: Arc::clone(&self.screen),
        }
    }
}

impl<S: OutputSurface> fmt::Debug for LineConsole<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let screen = self.screen();
        f.debug_struct("LineConsole")
            .field("len", &screen.buffer.len())
            .field("cursor", &screen.buffer.cursor())
            .field("input", &self.input)
            .finish()
    }
}

impl<S: OutputSurface> LineConsole<S> {
    /// Console with its own, fresh input.
    pub fn new(surface: S) -> Self {
        Self::with_input(InputMultiplexer::new(), surface)
    }

    /// Console reading from an existing input (typically one already wired to
    /// a capture surface).
    pub fn with_input(input: InputMultiplexer, surface: S) -> Self {
        Self {
            input,
            screen: Arc::new(Mutex::new(Screen {
                buffer: OutputBuffer::new(),
                surface,
                caret: None,
            })),
        }
    }

    fn screen(&self) -> MutexGuard<'_, Screen<S>> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The shared input handle. Feed capture events through it.
    pub fn input(&self) -> &InputMultiplexer {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.screen().buffer.cursor()
    }

    /// Reposition the write cursor, clamped to the buffer length.
    pub fn set_cursor(&self, cursor: usize) {
        self.screen().buffer.set_cursor(cursor);
    }

    pub fn len(&self) -> usize {
        self.screen().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screen().buffer.is_empty()
    }

    /// Snapshot of the buffer.
    pub fn units(&self) -> Vec<RenderUnit<S::Node>> {
        self.screen().buffer.units().to_vec()
    }

    /// Write at the cursor. Strings emit one unit per character, with `\n`
    /// becoming [`RenderUnit::LineBreak`]; units are written as given.
    pub fn write<I, T>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<WriteItem<S::Node>>,
    {
        let mut screen = self.screen();
        for item in items {
            match item.into() {
                WriteItem::Str(s) => {
                    for c in s.chars() {
                        screen.buffer.put(RenderUnit::from_char(c));
                    }
                }
                WriteItem::Unit(unit) => screen.buffer.put(unit),
            }
        }
        screen.push();
        screen.set_caret(None);
    }

    pub fn write_str(&self, s: &str) {
        self.write([s]);
    }

    pub fn clear(&self) {
        let mut screen = self.screen();
        screen.buffer.clear();
        screen.push();
        screen.set_caret(None);
    }

    /// Replace the whole buffer. The cursor ends up after the last unit.
    pub fn set_content(&self, units: Vec<RenderUnit<S::Node>>) {
        let mut screen = self.screen();
        screen.buffer.replace(units);
        screen.push();
        screen.set_caret(None);
    }

    /// Push the unchanged buffer to the surface again.
    pub fn refresh(&self) {
        self.screen().push();
    }

    /// Next keypress, without echo.
    pub fn read_key(&self) -> impl Future<Output = Result<Keypress, ReadError>> + Send + 'static {
        self.input.read_one()
    }

    /// Read one edited line, echoing it at the cursor.
    ///
    /// The returned string has no trailing newline; the buffer gains one
    /// [`RenderUnit::LineBreak`].
    ///
    /// # Errors
    ///
    /// [`ReadError::Superseded`] if another read starts while this one waits.
    /// The partially typed line stays on screen; the text is discarded.
    pub async fn read_line(&self) -> Result<String, ReadError> {
        let mut edit = LineEdit::new(self.cursor());
        loop {
            let key = self.input.read_one().await?;
            match edit.apply(key) {
                EditStep::Unchanged => self.screen().set_caret(Some(edit.caret())),
                EditStep::Changed => self.redraw_line(&edit),
                EditStep::Commit(line) => {
                    let mut screen = self.screen();
                    let end = screen.buffer.len();
                    screen.buffer.set_cursor(end);
                    screen.buffer.put(RenderUnit::LineBreak);
                    screen.push();
                    screen.set_caret(None);
                    debug!("Line committed ({} chars)", line.chars().count());
                    return Ok(line);
                }
            }
        }
    }

    fn redraw_line(&self, edit: &LineEdit) {
        let mut screen = self.screen();
        screen.buffer.truncate(edit.anchor());
        for c in edit.committed().chars() {
            screen.buffer.put(RenderUnit::from_char(c));
        }
        screen.push();
        screen.set_caret(Some(edit.caret()));
    }
}
