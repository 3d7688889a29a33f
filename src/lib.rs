//! Graceful Image - viewport-gated lazy loading for a single remote image.
//!
//! This crate provides the acquisition state machine behind a gracefully
//! degrading image surface: deciding when to start fetching (lazy activation
//! once the tracked element is visible), reacting to fetch success and
//! failure, and retrying failed fetches under a configurable backoff policy,
//! all while remaining safe to tear down at any point.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the loading mechanism services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = "graceful-image";
