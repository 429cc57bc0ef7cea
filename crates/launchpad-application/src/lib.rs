//! Application layer for the launchpad.
//!
//! Coordinates the domain session model with a repository backend: stored
//! session sets for the job launchpad, transient sessions for the asset
//! launchpad, and resolution of the launchpad root from query results.

pub mod launchpad;
pub mod session;

pub use launchpad::{LaunchpadQueryResult, LaunchpadRootError, LaunchpadTarget, resolve_launchpad};
pub use session::{LaunchpadSessionController, ScopeState, SessionStore, TransientSession};
