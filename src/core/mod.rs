//! # Core Console Logic
//!
//! The console itself. It knows nothing about any specific terminal or
//! rendering technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • InputMultiplexer     │
//!                    │  • LineConsole          │
//!                    │  • OutputSurface trait  │
//!                    │                         │
//!                    │  No I/O. No rendering.  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    Web     │      │   Tests    │
//!     │  Adapter   │      │  Adapter   │      │ (recording │
//!     │ (ratatui)  │      │  (future)  │      │  surface)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`keypress`]: `Keypress` / `NamedKey`, the unit of input
//! - [`multiplexer`]: capture events in, one ordered keypress stream out
//! - [`buffer`]: the cursor-addressable unit buffer
//! - [`line_edit`]: the `read_line` editing state
//! - [`console`]: `LineConsole`, tying input and buffer to a surface
//! - [`surface`]: the `OutputSurface` trait and `RenderUnit`
//! - [`config`]: settings file and resolution

pub mod buffer;
pub mod config;
pub mod console;
pub mod keypress;
pub mod line_edit;
pub mod multiplexer;
pub mod surface;

pub use console::{LineConsole, WriteItem};
pub use keypress::{Keypress, NamedKey};
pub use multiplexer::{CaptureEvent, InputMultiplexer, ReadError};
pub use surface::{OutputSurface, RenderUnit};
