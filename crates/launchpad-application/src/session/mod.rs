//! Session application services.
//!
//! `SessionStore` persists session sets, `LaunchpadSessionController` tracks
//! the current session of each scope for the job launchpad, and
//! `TransientSession` backs the asset launchpad without persistence.

mod controller;
mod store;
mod transient;

pub use controller::{LaunchpadSessionController, ScopeState};
pub use store::SessionStore;
pub use transient::TransientSession;
