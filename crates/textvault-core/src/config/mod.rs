//! Configuration loading

mod loader;

pub use loader::{CollisionPolicy, ProjectConfig, ProjectConfigFile, CONFIG_FILE_NAMES};
