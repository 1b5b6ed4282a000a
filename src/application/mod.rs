//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the dialog state machines, the per-screen view-models, and the top-level
//! application state.

pub mod dialogs;
pub mod pets;
pub mod owners;
pub mod state;

pub use dialogs::*;
pub use pets::*;
pub use owners::*;
pub use state::*;
