//! osk-config
//!
//! User preferences for the driving school manager and their JSON persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{resolve_home, ConfigManager, HOME_ENV};
pub use model::Config;
