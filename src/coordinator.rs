//! Process lifecycle and cross-module event coordination
//!
//! The coordinator owns the boot sequence, the window handle and the typed
//! event bus. It is the only place that distinguishes "user wants to
//! dismiss" from "app wants to exit".

use crate::bus::{ControlEvent, EventBus};
use crate::config::Config;
use crate::error::StartupError;
use crate::messages::{BackendEvent, BackendReceiver, Query, ViewEvent, ViewSender};
use crate::steam;
use crate::window::{CloseOutcome, WindowState};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Window lifecycle phases, in boot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Booting,
    PreflightChecking,
    WindowCreated,
    Ready,
    FatalError,
}

#[derive(Debug, Clone, Default)]
pub struct BootOptions {
    pub config_path: Option<PathBuf>,
    pub steam_root: Option<PathBuf>,
    pub worker_cmd: Option<String>,
    pub beta: bool,
}

/// Platform identity registered at boot, used by external integrations
/// (notification delivery, taskbar grouping) to attribute this process.
pub const APP_USER_MODEL_ID: &str = "com.steamwatch.SteamWatch";

pub struct Coordinator {
    phase: Phase,
    bus: Arc<EventBus>,
    window: WindowState,
    config_tx: watch::Sender<Config>,
    view_tx: ViewSender,
    launched_at: DateTime<Utc>,
    beta: bool,
    update_pending: bool,
    quit_signalled: bool,
    view_ready: bool,
}

impl Coordinator {
    /// Boot the application: load and validate configuration, run the
    /// environment preflight checks, then construct the window state.
    ///
    /// Boot is sequential and single-shot, so the filesystem checks are
    /// allowed to block briefly. Failures are not retried; typed startup
    /// errors pass through and anything else is wrapped uniformly.
    pub async fn start(
        options: BootOptions,
        view_tx: ViewSender,
        launched_at: DateTime<Utc>,
    ) -> Result<Self, StartupError> {
        let mut phase = Phase::Booting;
        tracing::info!(?phase, %launched_at, app_id = APP_USER_MODEL_ID, "starting");

        let mut config = Config::load(options.config_path.as_deref());
        if let Some(cmd) = options.worker_cmd.clone() {
            config.worker_cmd = Some(cmd);
        }

        phase = Phase::PreflightChecking;
        tracing::debug!(?phase);
        let checks = || -> Result<()> {
            steam::preflight(options.steam_root.as_deref())?;
            Ok(())
        };
        if let Err(err) = checks() {
            // Typed startup errors pass through; anything else gets the
            // uniform wrapper.
            let err = StartupError::wrap(err);
            tracing::error!(phase = ?Phase::FatalError, %err, "preflight failed");
            return Err(err);
        }

        phase = Phase::WindowCreated;
        tracing::debug!(?phase);
        let window = WindowState::create(&config);
        let (config_tx, _) = watch::channel(config);

        Ok(Self {
            phase,
            bus: Arc::new(EventBus::new()),
            window,
            config_tx,
            view_tx,
            launched_at,
            beta: options.beta,
            update_pending: false,
            quit_signalled: false,
            view_ready: false,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn window(&self) -> &WindowState {
        &self.window
    }

    pub fn bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    /// Live configuration. Replacement is wholesale: readers observe either
    /// the old or the new snapshot in full, never a partial update.
    pub fn config_watch(&self) -> watch::Receiver<Config> {
        self.config_tx.subscribe()
    }

    pub fn update_pending(&self) -> bool {
        self.update_pending
    }

    /// Forward an uncaught runtime error to the window for display, if one
    /// exists. The process keeps running.
    pub fn forward_error(&self, message: &str) {
        if self.window.is_created() {
            let _ = self.view_tx.send(ViewEvent::Error(message.to_string()));
        }
    }

    /// Drive the coordinator until the window is destroyed or the view side
    /// goes away.
    pub async fn run(mut self, mut backend_rx: BackendReceiver) -> Result<()> {
        let mut bus_rx = self.bus.subscribe();

        loop {
            tokio::select! {
                maybe = backend_rx.recv() => match maybe {
                    Some(event) => {
                        if self.handle_event(event) == Flow::Exit {
                            break;
                        }
                    }
                    None => break,
                },
                result = bus_rx.recv() => match result {
                    Ok(event) => self.handle_control(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "coordinator lagged behind the bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        tracing::info!("coordinator stopped");
        Ok(())
    }

    /// Handle one message from the view side.
    pub fn handle_event(&mut self, event: BackendEvent) -> Flow {
        match event {
            BackendEvent::ViewReady => {
                if !self.view_ready {
                    self.view_ready = true;
                    self.on_view_ready();
                }
                Flow::Continue
            }
            BackendEvent::ConfigUpdated(new_config) => {
                // Last write wins, no merge.
                self.config_tx.send_replace(new_config);
                Flow::Continue
            }
            BackendEvent::CloseRequested => self.request_close(),
            BackendEvent::ShowRequested => {
                self.window.show();
                let _ = self.view_tx.send(ViewEvent::Show);
                Flow::Continue
            }
            BackendEvent::Query(query) => {
                self.answer(query);
                Flow::Continue
            }
        }
    }

    /// React to control events from collaborators.
    pub fn handle_control(&mut self, event: ControlEvent) {
        if event == ControlEvent::UpdatePending {
            tracing::info!("update pending; next close request quits");
            self.update_pending = true;
        }
    }

    /// First "ready to display": hand off to collaborators and fan out the
    /// startup control events.
    fn on_view_ready(&mut self) {
        self.phase = Phase::Ready;
        tracing::info!(phase = ?self.phase, "view attached");

        let config = self.config_tx.borrow().clone();

        self.bus.emit(ControlEvent::ValidateWorker);

        if config.extwin {
            self.bus.emit(ControlEvent::ExtWin(true));
        }
        if config.statwin {
            self.bus.emit(ControlEvent::StatWin(true));
        }

        self.bus.emit(ControlEvent::ApplyShortcuts(config.shortcuts));
    }

    /// The close intercept. A plain close hides the window; with an update
    /// pending it proceeds, signals dependents exactly once, and terminates.
    fn request_close(&mut self) -> Flow {
        match self.window.handle_close_request(self.update_pending) {
            CloseOutcome::Hidden => {
                tracing::debug!("close request converted to hide");
                let _ = self.view_tx.send(ViewEvent::Hide);
                Flow::Continue
            }
            CloseOutcome::Destroyed => {
                if !self.quit_signalled {
                    self.quit_signalled = true;
                    self.bus.emit(ControlEvent::QuitForUpdate);
                }
                let _ = self.view_tx.send(ViewEvent::Close);
                Flow::Exit
            }
        }
    }

    fn answer(&self, query: Query) {
        match query {
            Query::Version(reply) => {
                let _ = reply.send(env!("CARGO_PKG_VERSION").to_string());
            }
            Query::Beta(reply) => {
                let _ = reply.send(self.beta);
            }
            Query::LaunchedAt(reply) => {
                let _ = reply.send(self.launched_at);
            }
        }
    }
}

/// Whether the coordinator loop keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}
