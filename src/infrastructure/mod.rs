//! Infrastructure layer providing external service integrations.
//!
//! This module contains the embedded store handle, registry file
//! persistence, and CSV export.

pub mod store;
pub mod persistence;
pub mod export;

pub use store::*;
pub use persistence::*;
pub use export::*;
