//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned on-disk schema. They are private to
//! the infrastructure layer and absorb the evolution of the storage format.
//!
//! ### SessionSet Version History
//! - **1.0.0**: Initial schema (no `schema_version` key)
//! - **1.1.0**: Added `flatten_graphs`, `run_id`, `config_changed_since_run`
//!   per session and a top-level `schema_version`

mod session_set;

pub use session_set::{
    SESSION_SET_SCHEMA_VERSION, ScopeV1, SessionBaseV1, SessionSetDTO, SessionSetV1_0_0,
    SessionSetV1_1_0, SessionV1_0_0, SessionV1_1_0, TagV1,
};
