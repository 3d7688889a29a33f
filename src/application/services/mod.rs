//! Loading mechanism services.

pub mod listener_registry;
pub mod load_attempt;
pub mod load_machine;
pub mod retry_scheduler;
pub mod throttle;
pub mod viewport_detector;

pub use listener_registry::ListenerRegistry;
pub use load_attempt::LoadAttemptController;
pub use load_machine::ImageLoadMachine;
pub use retry_scheduler::RetryScheduler;
pub use throttle::Throttle;
pub use viewport_detector::ViewportDetector;
