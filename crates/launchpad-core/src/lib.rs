//! Domain layer for the launchpad.
//!
//! Run configuration sessions for pipeline and job launches: the session
//! model, its pure operations, and the persistence seam.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::LaunchpadError;
