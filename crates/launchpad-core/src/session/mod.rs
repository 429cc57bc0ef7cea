//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the `Session` value and its parts (`ExecutionTag`, `SessionBase`)
//! - `factory`: initial data derivation from pipeline descriptors
//! - `changes`: partial change-sets (`SessionChanges`)
//! - `set`: `SessionSet`, the per-scope collection with its current selection
//! - `repository`: persistence trait for session sets
//!
//! # Usage
//!
//! ```ignore
//! use launchpad_core::session::{derive_initial_data, SessionChanges, SessionSet};
//! ```

mod changes;
mod factory;
mod model;
mod repository;
mod set;

// Re-export public API
pub use changes::{SessionChanges, apply_changes};
pub use factory::{InitialData, derive_initial_data};
pub use model::{ALL_STEPS_QUERY, ExecutionTag, Session, SessionBase};
pub use repository::{SessionSetRepository, StoredSessionSet};
pub use set::SessionSet;
