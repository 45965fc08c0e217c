//! Cursor-addressable unit buffer backing the console.

use super::surface::RenderUnit;

/// Ordered units plus a write cursor.
///
/// The cursor always stays within `0..=len()`. Writing at the cursor
/// overwrites when it sits inside the buffer and appends when it sits at the
/// end.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBuffer<N> {
    units: Vec<RenderUnit<N>>,
    cursor: usize,
}

impl<N> Default for OutputBuffer<N> {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            cursor: 0,
        }
    }
}

impl<N> OutputBuffer<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[RenderUnit<N>] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the current length.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.units.len());
    }

    /// Write `unit` at `index`, extending the buffer if `index` is at (or past)
    /// the end.
    pub fn put_at(&mut self, index: usize, unit: RenderUnit<N>) {
        match self.units.get_mut(index) {
            Some(slot) => *slot = unit,
            None => self.units.push(unit),
        }
    }

    /// Write at the cursor and advance it by one.
    pub fn put(&mut self, unit: RenderUnit<N>) {
        self.put_at(self.cursor, unit);
        self.set_cursor(self.cursor + 1);
    }

    /// Drop everything from `index` on and park the cursor there.
    pub fn truncate(&mut self, index: usize) {
        self.units.truncate(index);
        self.set_cursor(index);
    }

    /// Replace the whole content; the cursor moves to the end.
    pub fn replace(&mut self, units: Vec<RenderUnit<N>>) {
        self.units = units;
        self.cursor = self.units.len();
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.cursor = 0;
    }
}
