pub mod config;
pub mod paths;

pub use config::{ApiConfig, Config, LoggingConfig, StorageConfig, UiConfig};
pub use paths::{PathManager, container_base_path};
