//! Loader configuration.

mod loader_config;

pub use loader_config::LoaderConfig;
