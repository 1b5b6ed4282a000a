//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the pets and owners screens with ratatui and
//! routes keyboard input to the application layer.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
