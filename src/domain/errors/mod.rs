//! Domain error types.

mod config_error;
mod fetch_error;
mod machine_error;

pub use config_error::{ConfigError, ConfigResult};
pub use fetch_error::{FetchError, FetchResult};
pub use machine_error::MachineError;
