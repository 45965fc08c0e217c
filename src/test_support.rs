//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use crate::core::surface::{OutputSurface, RenderUnit};

/// An output surface that records every frame it is given. Clones share the
/// recording, so a test can keep one and hand the other to a console.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    frames: Arc<Mutex<Vec<Vec<RenderUnit<String>>>>>,
    caret: Arc<Mutex<Option<usize>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn last_frame(&self) -> Vec<RenderUnit<String>> {
        self.frames.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn caret(&self) -> Option<usize> {
        *self.caret.lock().unwrap()
    }
}

impl OutputSurface for RecordingSurface {
    type Node = String;

    fn replace_content(&mut self, units: &[RenderUnit<String>]) {
        self.frames.lock().unwrap().push(units.to_vec());
    }

    fn move_caret(&mut self, caret: Option<usize>) {
        *self.caret.lock().unwrap() = caret;
    }
}

/// Flatten units to a string: line breaks become `\n`, nodes their label.
pub fn text_of(units: &[RenderUnit<String>]) -> String {
    units
        .iter()
        .map(|unit| match unit {
            RenderUnit::Text(s) | RenderUnit::Node(s) => s.as_str(),
            RenderUnit::LineBreak => "\n",
        })
        .collect()
}
