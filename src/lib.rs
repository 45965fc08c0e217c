//! lineterm library exports

pub mod core;
pub mod logging;
pub mod tui;

#[cfg(test)]
pub mod test_support;
