//! # Output Surface
//!
//! The console never paints anything itself. After every mutation it hands
//! the full buffer to an [`OutputSurface`], which shows it in place of whatever
//! it showed before.

/// One renderable element of the console buffer.
///
/// `N` is the surface's own pre-built node type (a styled span, a widget
/// handle). The console stores nodes but never looks inside them.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUnit<N> {
    Text(String),
    LineBreak,
    Node(N),
}

impl<N> RenderUnit<N> {
    /// The unit a single written character becomes.
    pub fn from_char(c: char) -> Self {
        if c == '\n' {
            RenderUnit::LineBreak
        } else {
            RenderUnit::Text(c.to_string())
        }
    }
}

/// Sink for console frames.
pub trait OutputSurface {
    /// Opaque node type accepted in [`RenderUnit::Node`].
    type Node: Clone;

    /// Replace the visible content with `units`, in order.
    fn replace_content(&mut self, units: &[RenderUnit<Self::Node>]);

    /// Where the line editor inserts next, as a unit index into the last
    /// frame. `None` means after the last unit. Surfaces without a caret
    /// ignore it.
    fn move_caret(&mut self, _caret: Option<usize>) {}
}
