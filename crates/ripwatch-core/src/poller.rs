// ── Background poll loops ──
//
// Two independent interval loops (status, log tail). Every tick spawns its
// own request task so a hung request never delays the next tick. Results
// travel to the UI loop over an unbounded channel, tagged with a
// per-loop generation so late answers can be recognised and dropped.

use std::future::Future;
use std::time::Duration;

use ripwatch_api::{LogEntry, RipperClient, StatusSnapshot};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Poll cadence and log tail size.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub status_interval: Duration,
    pub logs_interval: Duration,
    /// Lines requested from `/api/logs/tail`.
    pub log_lines: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            status_interval: Duration::from_secs(2),
            logs_interval: Duration::from_secs(3),
            log_lines: 100,
        }
    }
}

/// A successful poll result.
#[derive(Debug, Clone)]
pub enum PollEvent {
    Status {
        generation: u64,
        snapshot: StatusSnapshot,
    },
    Logs {
        generation: u64,
        entries: Vec<LogEntry>,
    },
}

impl PollEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Status { generation, .. } | Self::Logs { generation, .. } => *generation,
        }
    }
}

/// Drops responses older than the newest one already applied.
///
/// Generations start at 1; a fresh gate admits anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshnessGate {
    newest: u64,
}

impl FreshnessGate {
    /// Returns `true` (and records `generation`) if it is newer than every
    /// generation admitted so far.
    pub fn admit(&mut self, generation: u64) -> bool {
        if generation <= self.newest {
            debug!(generation, newest = self.newest, "dropping stale response");
            return false;
        }
        self.newest = generation;
        true
    }
}

/// Owns the client and spawns both loops.
pub struct Poller {
    client: RipperClient,
    config: PollerConfig,
}

impl Poller {
    pub fn new(client: RipperClient, config: PollerConfig) -> Self {
        Self { client, config }
    }

    /// Start both loops. They run until `cancel` fires; in-flight request
    /// tasks are abandoned at that point.
    pub fn spawn(
        self,
        tx: mpsc::UnboundedSender<PollEvent>,
        cancel: &CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        info!(
            base_url = %self.client.base_url(),
            status_ms = self.config.status_interval.as_millis(),
            logs_ms = self.config.logs_interval.as_millis(),
            "starting poll loops"
        );

        let status = {
            let client = self.client.clone();
            let tx = tx.clone();
            tokio::spawn(poll_loop(
                "status",
                self.config.status_interval,
                cancel.clone(),
                move |generation| {
                    let client = client.clone();
                    let tx = tx.clone();
                    async move {
                        match client.get_status().await {
                            Ok(snapshot) => {
                                let _ = tx.send(PollEvent::Status {
                                    generation,
                                    snapshot,
                                });
                            }
                            Err(e) => warn!(
                                error = %e,
                                status = ?e.status(),
                                transient = e.is_transient(),
                                generation,
                                "status poll failed"
                            ),
                        }
                    }
                },
            ))
        };

        let logs = {
            let client = self.client;
            let lines = self.config.log_lines;
            tokio::spawn(poll_loop(
                "logs",
                self.config.logs_interval,
                cancel.clone(),
                move |generation| {
                    let client = client.clone();
                    let tx = tx.clone();
                    async move {
                        match fetch_logs(&client, lines).await {
                            Ok(entries) => {
                                let _ = tx.send(PollEvent::Logs {
                                    generation,
                                    entries,
                                });
                            }
                            Err(e) => warn!(
                                error = %e,
                                status = ?e.status(),
                                transient = e.is_transient(),
                                generation,
                                "log poll failed"
                            ),
                        }
                    }
                },
            ))
        };

        vec![status, logs]
    }
}

/// The log file tail, or the service's in-memory log when the tail is
/// empty (the service returns no lines while its log file is missing).
async fn fetch_logs(
    client: &RipperClient,
    lines: u32,
) -> Result<Vec<LogEntry>, ripwatch_api::Error> {
    let tail = client.tail_logs(lines).await?;
    if !tail.is_empty() {
        return Ok(tail);
    }
    match client.recent_logs(lines).await {
        Ok(recent) => Ok(recent),
        Err(e) => {
            debug!(error = %e, status = ?e.status(), "in-memory log unavailable");
            Ok(tail)
        }
    }
}

/// Tick every `period`, handing each tick's generation to `fetch` and
/// running the resulting future as its own task.
async fn poll_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    cancel: CancellationToken,
    mut fetch: F,
) where
    F: FnMut(u64) -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately and doubles as the initial load.
    let mut generation: u64 = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                generation += 1;
                debug!(poll = name, generation, "tick");
                let request = fetch(generation);
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {}
                        () = request => {}
                    }
                });
            }
        }
    }

    debug!(poll = name, "poll loop stopped");
}
