//! Application layer with the loading mechanism services.

/// Service implementations.
pub mod services;

pub use services::{
    ImageLoadMachine, ListenerRegistry, LoadAttemptController, RetryScheduler, Throttle,
    ViewportDetector,
};
