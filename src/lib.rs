//! Petbook - Terminal Pet Registry Library
//!
//! A terminal-based pet registry with searchable pet and owner screens,
//! built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
