//! # Keypresses
//!
//! The unit of input handed to a reader. The capture surface reports keys as
//! browser-style identifiers (`"a"`, `"ArrowLeft"`, `"Enter"`); anything longer
//! than one character is a named key.

use std::fmt;

/// Non-printable keys. The line editor understands the first four; everything
/// else is carried through as `Other` so `read_key` callers can still see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedKey {
    ArrowLeft,
    ArrowRight,
    Backspace,
    Enter,
    Other(String),
}

impl NamedKey {
    /// Parse a key identifier. Returns `None` for printable (single-character)
    /// identifiers and for the empty string.
    pub fn from_token(token: &str) -> Option<Self> {
        if token.chars().nth(1).is_none() {
            return None;
        }
        Some(match token {
            "ArrowLeft" => NamedKey::ArrowLeft,
            "ArrowRight" => NamedKey::ArrowRight,
            "Backspace" => NamedKey::Backspace,
            "Enter" => NamedKey::Enter,
            other => NamedKey::Other(other.to_string()),
        })
    }

    pub fn token(&self) -> &str {
        match self {
            NamedKey::ArrowLeft => "ArrowLeft",
            NamedKey::ArrowRight => "ArrowRight",
            NamedKey::Backspace => "Backspace",
            NamedKey::Enter => "Enter",
            NamedKey::Other(token) => token,
        }
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One logical keypress: a single code point or a named key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keypress {
    Char(char),
    Named(NamedKey),
}

impl fmt::Display for Keypress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keypress::Char(c) => write!(f, "{c:?}"),
            Keypress::Named(key) => write!(f, "{key}"),
        }
    }
}

impl From<char> for Keypress {
    fn from(c: char) -> Self {
        Keypress::Char(c)
    }
}

impl From<NamedKey> for Keypress {
    fn from(key: NamedKey) -> Self {
        Keypress::Named(key)
    }
}
