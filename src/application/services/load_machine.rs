//! The image acquisition state machine.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::FutureExt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, warn};

use crate::application::services::listener_registry::ListenerRegistry;
use crate::application::services::load_attempt::LoadAttemptController;
use crate::application::services::retry_scheduler::RetryScheduler;
use crate::application::services::throttle::Throttle;
use crate::application::services::viewport_detector::ViewportDetector;
use crate::domain::errors::{ConfigResult, FetchResult, MachineError};
use crate::domain::events::LoadEvent;
use crate::domain::lifecycle::MountToken;
use crate::domain::load_state::{LoadPhase, LoadState};
use crate::domain::ports::{ImageFetchPort, LayoutQueryPort};
use crate::infrastructure::config::LoaderConfig;
use crate::infrastructure::surface::SurfaceEventBus;

/// Internal machine-loop message.
///
/// Components never mutate machine state directly; they send one of these
/// into the loop and the loop applies the transition.
#[derive(Debug)]
enum MachineSignal {
    VisibilityConfirmed,
    AttemptSettled(FetchResult<Bytes>),
    RetryTimerFired,
    Stop,
}

/// Handle to one image acquisition.
///
/// Composes the viewport detector and listener registry to decide *when* to
/// start fetching, and the attempt controller and retry scheduler to decide
/// *how* attempts proceed. The observable phase is published through a
/// watch channel; progress notifications arrive on the receiver returned by
/// [`ImageLoadMachine::start`].
pub struct ImageLoadMachine {
    config: LoaderConfig,
    fetcher: Arc<dyn ImageFetchPort>,
    layout: Arc<dyn LayoutQueryPort>,
    bus: SurfaceEventBus,
    mount: MountToken,
    phase_tx: Arc<watch::Sender<LoadPhase>>,
    signal_tx: Option<mpsc::UnboundedSender<MachineSignal>>,
}

impl ImageLoadMachine {
    /// Creates a machine for one image in one tracked element.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the configuration is invalid; nothing is
    /// discovered mid-retry.
    pub fn new(
        config: LoaderConfig,
        fetcher: Arc<dyn ImageFetchPort>,
        layout: Arc<dyn LayoutQueryPort>,
        bus: SurfaceEventBus,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let (phase_tx, _) = watch::channel(LoadPhase::Idle);

        Ok(Self {
            config,
            fetcher,
            layout,
            bus,
            mount: MountToken::new(),
            phase_tx: Arc::new(phase_tx),
            signal_tx: None,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        *self.phase_tx.borrow()
    }

    /// Subscribes to phase changes.
    #[must_use]
    pub fn subscribe_phase(&self) -> watch::Receiver<LoadPhase> {
        self.phase_tx.subscribe()
    }

    /// Activates the machine.
    ///
    /// In lazy mode with the element not yet visible, listeners are
    /// attached and the machine waits; otherwise the first fetch attempt
    /// begins immediately. Progress arrives on the returned receiver.
    ///
    /// # Errors
    /// Returns `MachineError::AlreadyStarted` on a second call; each
    /// instance is started once.
    pub fn start(&mut self) -> Result<mpsc::UnboundedReceiver<LoadEvent>, MachineError> {
        if self.signal_tx.is_some() {
            return Err(MachineError::AlreadyStarted);
        }

        self.mount.mount();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        self.signal_tx = Some(signal_tx.clone());

        let machine = MachineLoop {
            config: self.config.clone(),
            state: LoadState::new(self.phase_tx.clone()),
            detector: ViewportDetector::new(self.layout.clone()),
            registry: ListenerRegistry::new(),
            scheduler: RetryScheduler::new(self.config.retry),
            controller: LoadAttemptController::new(self.fetcher.clone(), self.mount.clone()),
            bus: self.bus.clone(),
            mount: self.mount.clone(),
            event_tx,
            signal_tx,
            signal_rx,
        };

        let mount = self.mount.clone();
        tokio::spawn(async move {
            let result = AssertUnwindSafe(run_machine_loop(machine)).catch_unwind().await;

            if let Err(panic_info) = result {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };

                error!(panic = %panic_msg, "load machine task panicked");
                mount.unmount();
            }
        });

        Ok(event_rx)
    }

    /// Stops the machine and releases its resources.
    ///
    /// Idempotent and callable from any state, including before `start`
    /// and after a terminal phase. The mount token flips immediately, so a
    /// timer or fetch that can no longer be cancelled becomes a no-op on
    /// arrival; the loop then releases the pending timer and listeners
    /// exactly once and the phase returns to `Idle`.
    pub fn stop(&self) {
        self.mount.unmount();
        if let Some(signal_tx) = &self.signal_tx {
            let _ = signal_tx.send(MachineSignal::Stop);
        }
        self.phase_tx.send_replace(LoadPhase::Idle);
    }
}

impl Drop for ImageLoadMachine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ImageLoadMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoadMachine")
            .field("src", &self.config.src)
            .field("phase", &self.phase())
            .field("mounted", &self.mount.is_mounted())
            .finish_non_exhaustive()
    }
}

/// State owned by the spawned machine loop.
struct MachineLoop {
    config: LoaderConfig,
    state: LoadState,
    detector: ViewportDetector,
    registry: ListenerRegistry,
    scheduler: RetryScheduler,
    controller: LoadAttemptController,
    bus: SurfaceEventBus,
    mount: MountToken,
    event_tx: mpsc::UnboundedSender<LoadEvent>,
    signal_tx: mpsc::UnboundedSender<MachineSignal>,
    signal_rx: mpsc::UnboundedReceiver<MachineSignal>,
}

impl MachineLoop {
    /// Starts one fetch attempt for the configured source.
    fn begin_attempt(&mut self) {
        self.state.transition_to_loading();
        debug!(url = %self.config.src, "starting fetch attempt");

        let signal_tx = self.signal_tx.clone();
        self.controller.attempt(&self.config.src, move |result| {
            let _ = signal_tx.send(MachineSignal::AttemptSettled(result));
        });
    }

    /// Attaches the throttled visibility check and waits.
    fn wait_for_viewport(&mut self) {
        self.state.transition_to_waiting();

        let signal_tx = self.signal_tx.clone();
        let detector = self.detector.clone();
        let throttled = Throttle::new(self.config.throttle_interval(), move || {
            if detector.is_visible() {
                let _ = signal_tx.send(MachineSignal::VisibilityConfirmed);
            }
        });

        self.registry.attach_all(&self.bus, throttled);
        debug!(url = %self.config.src, "waiting for element to enter viewport");
    }

    fn teardown(&mut self) {
        self.scheduler.cancel_pending();
        self.registry.detach_all();
    }
}

async fn run_machine_loop(mut machine: MachineLoop) {
    if !machine.mount.is_mounted() {
        return;
    }

    if machine.config.lazy && !machine.detector.is_visible() {
        machine.wait_for_viewport();
    } else {
        machine.begin_attempt();
    }

    while let Some(signal) = machine.signal_rx.recv().await {
        if !machine.mount.is_mounted() {
            break;
        }

        match signal {
            MachineSignal::VisibilityConfirmed => {
                // Stale confirmations from a throttled check that raced the
                // detach are swallowed here.
                if machine.state.phase() != LoadPhase::WaitingForViewport {
                    continue;
                }
                machine.registry.detach_all();
                machine.begin_attempt();
            }
            MachineSignal::AttemptSettled(Ok(bytes)) => {
                machine.state.transition_to_loaded();
                debug!(url = %machine.config.src, "image loaded");
                let _ = machine.event_tx.send(LoadEvent::Loaded { bytes });
                break;
            }
            MachineSignal::AttemptSettled(Err(error)) => {
                warn!(url = %machine.config.src, error = %error, "fetch attempt failed");

                let attempt = machine.scheduler.retry_count();
                let delay = machine.scheduler.current_delay();
                let signal_tx = machine.signal_tx.clone();
                let armed = machine.scheduler.schedule_retry(move || {
                    let _ = signal_tx.send(MachineSignal::RetryTimerFired);
                });

                if armed {
                    machine.state.transition_to_retrying();
                    let _ = machine.event_tx.send(LoadEvent::Retrying { attempt, delay });
                } else {
                    machine.state.transition_to_failed();
                    error!(
                        url = %machine.config.src,
                        attempts = attempt,
                        "image load failed, retry budget exhausted"
                    );
                    let _ = machine.event_tx.send(LoadEvent::Failed {
                        attempts: attempt,
                        error,
                    });
                    break;
                }
            }
            MachineSignal::RetryTimerFired => {
                if machine.state.phase() != LoadPhase::Retrying {
                    continue;
                }
                // Re-attempt first, then advance the count and delay; the
                // growth applies to the delay that was actually used.
                machine.begin_attempt();
                machine.scheduler.on_timer_fired();
            }
            MachineSignal::Stop => break,
        }
    }

    machine.teardown();
}
