//! # Terminal Surface
//!
//! Renders console frames with ratatui. Consecutive text units are merged
//! into one span, line breaks start a new `Line`, and nodes are ready-made
//! styled spans. The view is scrolled so the end of the buffer stays visible.
//! The terminal cursor sits on the line editor's caret, or after the last
//! glyph when no line is being edited.

use log::warn;
use ratatui::backend::Backend;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use crate::core::{OutputSurface, RenderUnit};

/// Group units into display lines.
pub fn lines_from_units(units: &[RenderUnit<Span<'static>>]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();

    for unit in units {
        match unit {
            RenderUnit::Text(s) => run.push_str(s),
            RenderUnit::Node(span) => {
                if !run.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut run)));
                }
                spans.push(span.clone());
            }
            RenderUnit::LineBreak => {
                if !run.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut run)));
                }
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
        }
    }
    if !run.is_empty() {
        spans.push(Span::raw(run));
    }
    lines.push(Line::from(spans));
    lines
}

/// Logical line and display column of the unit at `index`.
pub fn caret_position(units: &[RenderUnit<Span<'static>>], index: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for unit in units.iter().take(index) {
        match unit {
            RenderUnit::Text(s) => col += s.width(),
            RenderUnit::Node(span) => col += span.content.width(),
            RenderUnit::LineBreak => {
                line += 1;
                col = 0;
            }
        }
    }
    (line, col)
}

fn wrapped_rows(lines: &[Line<'static>], width: u16) -> usize {
    Paragraph::new(Text::from(lines.to_vec()))
        .wrap(Wrap { trim: false })
        .line_count(width)
}

/// Draw a full frame of console lines into the whole area, with the cursor at
/// `caret` (logical line, display column).
pub fn draw_console(frame: &mut Frame, lines: &[Line<'static>], caret: (usize, usize)) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let total_lines = wrapped_rows(lines, area.width);

    // Paragraph scroll offsets are u16, so very long buffers render only the
    // wrapped lines that fit under that offset.
    let skip = total_lines.saturating_sub(usize::from(u16::MAX) + usize::from(area.height));
    let first = first_visible_line(lines, area.width, skip);
    let visible = &lines[first..];
    let paragraph = Paragraph::new(Text::from(visible.to_vec())).wrap(Wrap { trim: false });
    let visible_lines = paragraph.line_count(area.width);

    let scroll_rows = visible_lines.saturating_sub(usize::from(area.height));
    frame.render_widget(paragraph.scroll((clamp_u16(scroll_rows), 0)), area);

    // Approximate: assumes the caret's line wraps at exact width boundaries.
    let width = usize::from(area.width);
    let (caret_line, caret_col) = caret;
    let caret_line = caret_line.clamp(first, lines.len().saturating_sub(1));
    let caret_row = visible_lines.saturating_sub(wrapped_rows(&lines[caret_line..], area.width))
        + caret_col / width;
    let cursor_col = clamp_u16(caret_col % width).min(area.width - 1);
    let cursor_row = clamp_u16(caret_row.saturating_sub(scroll_rows)).min(area.height - 1);
    frame.set_cursor_position((area.x + cursor_col, area.y + cursor_row));
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Index of the first line that must be kept so that at most `skip` wrapped
/// rows are dropped from the top.
fn first_visible_line(lines: &[Line<'static>], width: u16, skip: usize) -> usize {
    let mut dropped = 0;
    for (index, line) in lines.iter().enumerate() {
        let rows = Paragraph::new(line.clone())
            .wrap(Wrap { trim: false })
            .line_count(width);
        if dropped + rows > skip {
            return index;
        }
        dropped += rows;
    }
    lines.len().saturating_sub(1)
}

/// A console output surface backed by a ratatui terminal.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    units: Vec<RenderUnit<Span<'static>>>,
    caret: Option<usize>,
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            units: Vec::new(),
            caret: None,
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    fn draw(&mut self) {
        let lines = lines_from_units(&self.units);
        let index = self.caret.map_or(self.units.len(), |i| i.min(self.units.len()));
        let caret = caret_position(&self.units, index);
        if let Err(e) = self.terminal.draw(|frame| draw_console(frame, &lines, caret)) {
            warn!("Failed to draw console: {e}");
        }
    }
}

impl<B: Backend> OutputSurface for TerminalSurface<B> {
    type Node = Span<'static>;

    fn replace_content(&mut self, units: &[RenderUnit<Span<'static>>]) {
        self.units = units.to_vec();
        self.draw();
    }

    fn move_caret(&mut self, caret: Option<usize>) {
        self.caret = caret;
        self.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::style::Stylize;

    fn text(s: &str) -> RenderUnit<Span<'static>> {
        RenderUnit::Text(s.to_string())
    }

    fn screen_text(surface: &TerminalSurface<TestBackend>) -> String {
        let buffer = surface.terminal().backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_text_runs_are_merged() {
        let lines = lines_from_units(&[text("a"), text("b"), RenderUnit::LineBreak, text("c")]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].content, "ab");
        assert_eq!(lines[1].spans[0].content, "c");
    }

    #[test]
    fn test_nodes_split_runs() {
        let node = RenderUnit::Node(Span::raw("$ ").bold());
        let lines = lines_from_units(&[text("x"), node, text("y")]);
        assert_eq!(lines.len(), 1);
        let contents: Vec<_> = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(contents, vec!["x", "$ ", "y"]);
    }

    #[test]
    fn test_trailing_line_break_opens_empty_line() {
        let lines = lines_from_units(&[text("a"), RenderUnit::LineBreak]);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].spans.is_empty());
    }

    #[test]
    fn test_replace_content_draws_text() {
        let terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        let mut surface = TerminalSurface::new(terminal);
        surface.replace_content(&[text("h"), text("i"), RenderUnit::LineBreak, text("!")]);

        let screen = screen_text(&surface);
        assert!(screen.starts_with("hi"));
        assert_eq!(&screen[10..11], "!");
    }

    #[test]
    fn test_replace_content_discards_previous_frame() {
        let terminal = Terminal::new(TestBackend::new(10, 1)).unwrap();
        let mut surface = TerminalSurface::new(terminal);
        surface.replace_content(&[text("long text")]);
        surface.replace_content(&[text("ok")]);
        assert_eq!(screen_text(&surface).trim_end(), "ok");
    }

    #[test]
    fn test_tail_stays_visible() {
        let terminal = Terminal::new(TestBackend::new(5, 2)).unwrap();
        let mut surface = TerminalSurface::new(terminal);
        let mut units = Vec::new();
        for line in ["one", "two", "three"] {
            units.push(text(line));
            units.push(RenderUnit::LineBreak);
        }
        units.push(text(">"));
        surface.replace_content(&units);

        let screen = screen_text(&surface);
        assert!(screen.starts_with("three"));
        assert!(screen[5..].starts_with('>'));
    }

    #[test]
    fn test_cursor_follows_caret() {
        let terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        let mut surface = TerminalSurface::new(terminal);
        surface.replace_content(&[
            text(">"),
            RenderUnit::LineBreak,
            text("a"),
            text("b"),
            text("c"),
        ]);
        let end = surface.terminal.get_cursor_position().unwrap();
        assert_eq!((end.x, end.y), (3, 1));

        surface.move_caret(Some(3));
        let caret = surface.terminal.get_cursor_position().unwrap();
        assert_eq!((caret.x, caret.y), (1, 1));

        surface.move_caret(None);
        let parked = surface.terminal.get_cursor_position().unwrap();
        assert_eq!((parked.x, parked.y), (3, 1));
    }

    #[test]
    fn test_caret_position_counts_wide_glyphs() {
        let units = [text("好"), text("a"), RenderUnit::LineBreak, text("b")];
        assert_eq!(caret_position(&units, 2), (0, 3));
        assert_eq!(caret_position(&units, 3), (1, 0));
        assert_eq!(caret_position(&units, 4), (1, 1));
    }

    #[test]
    fn test_tail_visible_past_u16_rows() {
        let terminal = Terminal::new(TestBackend::new(8, 2)).unwrap();
        let mut surface = TerminalSurface::new(terminal);
        let mut units = Vec::new();
        for n in 0..70_000 {
            units.push(text(&n.to_string()));
            units.push(RenderUnit::LineBreak);
        }
        units.push(text("> end"));
        surface.replace_content(&units);

        let screen = screen_text(&surface);
        assert_eq!(screen[..8].trim_end(), "69999");
        assert_eq!(screen[8..].trim_end(), "> end");

        let cursor = surface.terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (5, 1));
    }
}
