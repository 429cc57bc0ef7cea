pub mod config_service;
pub mod dto;
pub mod memory_session_set_repository;
pub mod paths;
pub mod storage;
pub mod toml_session_set_repository;

pub use crate::config_service::ConfigService;
pub use crate::memory_session_set_repository::InMemorySessionSetRepository;
pub use crate::paths::LaunchpadPaths;
pub use crate::toml_session_set_repository::TomlSessionSetRepository;
