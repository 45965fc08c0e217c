//! # Line Editing
//!
//! The state `read_line` carries across awaits, as a plain record:
//!
//! ```text
//! LineEdit
//! ├── committed: String   // text typed so far
//! ├── edit_cursor: usize  // char offset into `committed`
//! └── anchor: usize       // buffer index where the line starts
//! ```
//!
//! `apply()` is pure: it only says whether the buffer needs redrawing. The
//! console does the drawing.

use super::keypress::{Keypress, NamedKey};

/// What the console should do after a key was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    /// Cursor moved or key ignored; nothing to redraw.
    Unchanged,
    /// `committed` changed; redraw from the anchor.
    Changed,
    /// Enter: the line is done.
    Commit(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    committed: String,
    edit_cursor: usize,
    anchor: usize,
}

impl LineEdit {
    pub fn new(anchor: usize) -> Self {
        Self {
            committed: String::new(),
            edit_cursor: 0,
            anchor,
        }
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn edit_cursor(&self) -> usize {
        self.edit_cursor
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Buffer index of the edit position.
    pub fn caret(&self) -> usize {
        self.anchor + self.edit_cursor
    }

    fn char_len(&self) -> usize {
        self.committed.chars().count()
    }

    /// Byte offset of the `n`th char (or the end).
    fn byte_offset(&self, n: usize) -> usize {
        self.committed
            .char_indices()
            .nth(n)
            .map_or(self.committed.len(), |(i, _)| i)
    }

    pub fn apply(&mut self, key: Keypress) -> EditStep {
        match key {
            Keypress::Named(NamedKey::ArrowLeft) => {
                self.edit_cursor = self.edit_cursor.saturating_sub(1);
                EditStep::Unchanged
            }
            Keypress::Named(NamedKey::ArrowRight) => {
                self.edit_cursor = (self.edit_cursor + 1).min(self.char_len());
                EditStep::Unchanged
            }
            Keypress::Named(NamedKey::Backspace) => {
                if self.edit_cursor == 0 {
                    return EditStep::Unchanged;
                }
                self.edit_cursor -= 1;
                let at = self.byte_offset(self.edit_cursor);
                self.committed.remove(at);
                EditStep::Changed
            }
            Keypress::Named(NamedKey::Enter) => {
                EditStep::Commit(std::mem::take(&mut self.committed))
            }
            Keypress::Named(NamedKey::Other(_)) => EditStep::Unchanged,
            Keypress::Char(c) => {
                let at = self.byte_offset(self.edit_cursor);
                self.committed.insert(at, c);
                self.edit_cursor += 1;
                EditStep::Changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(key: NamedKey) -> Keypress {
        Keypress::Named(key)
    }

    fn type_str(edit: &mut LineEdit, s: &str) {
        for c in s.chars() {
            assert_eq!(edit.apply(Keypress::Char(c)), EditStep::Changed);
        }
    }

    #[test]
    fn test_insert_appends_and_advances() {
        let mut edit = LineEdit::new(3);
        type_str(&mut edit, "abc");
        assert_eq!(edit.committed(), "abc");
        assert_eq!(edit.edit_cursor(), 3);
        assert_eq!(edit.anchor(), 3);
    }

    #[test]
    fn test_edit_in_the_middle() {
        let mut edit = LineEdit::new(0);
        type_str(&mut edit, "abc");
        assert_eq!(edit.apply(named(NamedKey::ArrowLeft)), EditStep::Unchanged);
        assert_eq!(edit.apply(named(NamedKey::ArrowLeft)), EditStep::Unchanged);
        assert_eq!(edit.apply(named(NamedKey::Backspace)), EditStep::Changed);
        assert_eq!(edit.committed(), "bc");
        type_str(&mut edit, "X");
        assert_eq!(edit.committed(), "Xbc");
    }

    #[test]
    fn test_left_then_backspace_then_insert() {
        // One Left from the end sits between 'b' and 'c'.
        let mut edit = LineEdit::new(0);
        type_str(&mut edit, "abc");
        edit.apply(named(NamedKey::ArrowLeft));
        assert_eq!(edit.edit_cursor(), 2);
        edit.apply(named(NamedKey::Backspace));
        assert_eq!(edit.committed(), "ac");
        assert_eq!(edit.edit_cursor(), 1);
        type_str(&mut edit, "X");
        assert_eq!(edit.apply(named(NamedKey::Enter)), EditStep::Commit("aXc".to_string()));
    }

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let mut edit = LineEdit::new(0);
        edit.apply(named(NamedKey::ArrowLeft));
        assert_eq!(edit.edit_cursor(), 0);

        type_str(&mut edit, "ab");
        edit.apply(named(NamedKey::ArrowRight));
        edit.apply(named(NamedKey::ArrowRight));
        assert_eq!(edit.edit_cursor(), 2);
    }

    #[test]
    fn test_backspace_at_start_does_nothing() {
        let mut edit = LineEdit::new(0);
        type_str(&mut edit, "ab");
        edit.apply(named(NamedKey::ArrowLeft));
        edit.apply(named(NamedKey::ArrowLeft));
        assert_eq!(edit.apply(named(NamedKey::Backspace)), EditStep::Unchanged);
        assert_eq!(edit.committed(), "ab");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut edit = LineEdit::new(0);
        type_str(&mut edit, "日本語");
        edit.apply(named(NamedKey::ArrowLeft));
        edit.apply(named(NamedKey::Backspace));
        assert_eq!(edit.committed(), "日語");
        type_str(&mut edit, "é");
        assert_eq!(edit.committed(), "日é語");
    }

    #[test]
    fn test_other_named_keys_ignored() {
        let mut edit = LineEdit::new(0);
        type_str(&mut edit, "a");
        let step = edit.apply(named(NamedKey::Other("Tab".to_string())));
        assert_eq!(step, EditStep::Unchanged);
        assert_eq!(edit.committed(), "a");
        assert_eq!(edit.edit_cursor(), 1);
    }
}
