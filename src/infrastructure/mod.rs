//! Infrastructure layer with external service adapters.

/// Loader configuration.
pub mod config;
/// HTTP adapters.
pub mod http;
/// Host trigger bus.
pub mod surface;

pub use config::LoaderConfig;
pub use http::HttpImageFetcher;
pub use surface::SurfaceEventBus;
