//! Worker process supervision
//!
//! Spawns the external watcher worker, forwards its JSON-line status
//! snapshots into the view channel, and tears it down on shutdown. What the
//! worker actually detects is its own business; only the snapshot contract
//! lives here.

use crate::bus::{ControlEvent, EventBus};
use crate::config::Config;
use crate::messages::{ViewEvent, ViewSender};
use crate::snapshot::StatusSnapshot;
use anyhow::{Context, Result};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use sysinfo::{Pid, System};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{broadcast, watch};

const WATCHDOG_INTERVAL: Duration = Duration::from_secs(2);

/// Check whether a pid is still running.
pub fn pid_alive(pid: u32) -> bool {
    let mut sys = System::new();
    sys.refresh_processes();
    sys.process(Pid::from_u32(pid)).is_some()
}

pub struct WorkerSupervisor {
    bus: Arc<EventBus>,
    config: watch::Receiver<Config>,
    view_tx: ViewSender,
}

impl WorkerSupervisor {
    pub fn new(bus: Arc<EventBus>, config: watch::Receiver<Config>, view_tx: ViewSender) -> Self {
        Self {
            bus,
            config,
            view_tx,
        }
    }

    /// React to control events until shutdown: `ValidateWorker` (re)starts
    /// the worker, `QuitForUpdate` kills it and exits. A watchdog reports a
    /// worker that died on its own; post-boot failures degrade to an in-UI
    /// notice instead of crashing.
    pub async fn run(mut self) -> Result<()> {
        let mut bus_rx = self.bus.subscribe();
        let mut child: Option<Child> = None;
        let mut watchdog = tokio::time::interval(WATCHDOG_INTERVAL);

        loop {
            tokio::select! {
                result = bus_rx.recv() => match result {
                    Ok(ControlEvent::ValidateWorker) => {
                        if let Some(mut old) = child.take() {
                            let _ = old.kill().await;
                        }
                        match self.spawn_worker() {
                            Ok(new_child) => child = Some(new_child),
                            Err(err) => {
                                tracing::error!(%err, "failed to start worker");
                                let _ = self
                                    .view_tx
                                    .send(ViewEvent::Error(format!("failed to start worker: {err}")));
                            }
                        }
                    }
                    Ok(ControlEvent::QuitForUpdate) => {
                        if let Some(mut old) = child.take() {
                            tracing::info!("stopping worker for update");
                            let _ = old.kill().await;
                        }
                        break;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "worker supervisor lagged behind the bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = watchdog.tick() => {
                    if let Some(pid) = child.as_ref().and_then(|c| c.id()) {
                        if !pid_alive(pid) {
                            tracing::warn!(pid, "worker process exited");
                            let _ = self
                                .view_tx
                                .send(ViewEvent::Error(format!("worker process {pid} exited")));
                            child = None;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn spawn_worker(&self) -> Result<Child> {
        let config = self.config.borrow().clone();
        let command_line = config.worker_command().to_string();
        let mut parts = command_line.split_whitespace();
        let program = parts.next().context("empty worker command")?;

        let mut command = Command::new(program);
        command
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .with_context(|| format!("spawning worker `{command_line}`"))?;
        tracing::info!(pid = child.id(), cmd = %command_line, "worker started");

        let stdout = child.stdout.take().context("worker stdout not captured")?;
        let view_tx = self.view_tx.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            // The first snapshot after a (re)start resyncs the whole view.
            let mut first = true;
            while let Ok(Some(line)) = lines.next_line().await {
                match serde_json::from_str::<StatusSnapshot>(&line) {
                    Ok(snapshot) => {
                        let _ = view_tx.send(ViewEvent::StatusUpdated {
                            snapshot,
                            reset: first,
                        });
                        first = false;
                    }
                    Err(err) => {
                        tracing::warn!(%err, "discarding malformed worker line");
                    }
                }
            }
            tracing::info!("worker stdout closed");
        });

        Ok(child)
    }
}
