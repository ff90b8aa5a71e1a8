//! Bounded, fire-and-forget submission queue.
//!
//! The capture thread only ever calls `try_send`: a full queue drops the
//! new submission instead of waiting. A dedicated thread running a
//! single-threaded Tokio runtime drains the queue and performs the HTTP
//! calls, with at most `max_in_flight` requests outstanding.

use crate::transport_data::{PacketEvent, StatsSnapshot};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicU64, Ordering::Relaxed},
    Arc,
};
use std::thread::JoinHandle;
use thiserror::Error;
use tmon_config::ReportingConfig;
use tokio::sync::{
    mpsc::{self, error::TrySendError, Receiver, Sender},
    oneshot, Semaphore,
};
use tracing::{debug, error, info, warn};

/// Work items for the reporting thread.
#[derive(Debug)]
pub enum Submission {
    /// A closed second's statistics: two posts to `<base>/update`.
    Snapshot(Box<StatsSnapshot>),
    /// One accepted frame: a post to `<base>/packets`.
    Packet(PacketEvent),
}

/// Running totals for the reporting path.
#[derive(Debug, Default)]
pub struct ReportCounters {
    /// Submissions accepted into the queue
    pub queued: AtomicU64,
    /// Submissions discarded because the queue was full or closed
    pub dropped: AtomicU64,
    /// HTTP requests that completed (any status)
    pub sent: AtomicU64,
    /// HTTP requests that failed to complete
    pub failed: AtomicU64,
}

/// Cheap, cloneable handle used to enqueue submissions. Never blocks.
#[derive(Clone, Debug)]
pub struct ReportSender {
    tx: Option<Sender<Submission>>,
    counters: Arc<ReportCounters>,
}

impl ReportSender {
    /// A sender that silently discards everything (reporting disabled).
    pub fn disabled() -> Self {
        Self {
            tx: None,
            counters: Arc::new(ReportCounters::default()),
        }
    }

    pub(crate) fn with_capacity(depth: usize) -> (Self, Receiver<Submission>) {
        let (tx, rx) = mpsc::channel(depth);
        (
            Self {
                tx: Some(tx),
                counters: Arc::new(ReportCounters::default()),
            },
            rx,
        )
    }

    /// Is there a collector to report to?
    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Offer a submission to the queue. Returns `false` if it was dropped.
    pub fn enqueue(&self, submission: Submission) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        match tx.try_send(submission) {
            Ok(()) => {
                self.counters.queued.fetch_add(1, Relaxed);
                true
            }
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.counters.dropped.fetch_add(1, Relaxed);
                false
            }
        }
    }

    /// Access the running totals.
    pub fn counters(&self) -> &ReportCounters {
        &self.counters
    }
}

/// Owns the reporting thread.
pub struct Reporter {
    sender: ReportSender,
    quit_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Reporter {
    /// Start the reporting thread. Without a configured base URL the
    /// reporter is disabled and no thread is started.
    pub fn start(config: &ReportingConfig) -> Result<Self, ReporterError> {
        let Some(base_url) = &config.base_url else {
            info!("No report URL configured, statistics stay local");
            return Ok(Self {
                sender: ReportSender::disabled(),
                quit_tx: None,
                handle: None,
            });
        };

        let (sender, rx) = ReportSender::with_capacity(config.queue_depth);
        let (quit_tx, quit_rx) = oneshot::channel();
        let worker = SubmissionWorker {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            max_in_flight: config.max_in_flight,
            counters: sender.counters.clone(),
        };

        let handle = std::thread::Builder::new()
            .name("Report Submission".to_string())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(worker.run(rx, quit_rx)),
                    Err(e) => error!("Unable to start the reporting runtime: {e:?}"),
                }
            })
            .map_err(|e| ReporterError::Thread(e.to_string()))?;
        info!("Reporting to {base_url}");

        Ok(Self {
            sender,
            quit_tx: Some(quit_tx),
            handle: Some(handle),
        })
    }

    /// A handle for enqueueing submissions.
    pub fn sender(&self) -> ReportSender {
        self.sender.clone()
    }

    /// Stop the reporting thread. Queued and in-flight submissions are
    /// abandoned.
    pub fn shutdown(mut self) {
        if let Some(quit) = self.quit_tx.take() {
            let _ = quit.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Reporting thread panicked");
            }
        }
        let c = self.sender.counters();
        info!(
            "Reporting finished: {} queued, {} dropped, {} sent, {} failed",
            c.queued.load(Relaxed),
            c.dropped.load(Relaxed),
            c.sent.load(Relaxed),
            c.failed.load(Relaxed)
        );
    }
}

struct SubmissionWorker {
    base_url: String,
    max_in_flight: usize,
    counters: Arc<ReportCounters>,
}

impl SubmissionWorker {
    async fn run(self, mut rx: Receiver<Submission>, mut quit: oneshot::Receiver<()>) {
        debug!("Report submission worker started");
        let client = reqwest::Client::new();
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let worker = Arc::new(self);
        loop {
            let submission = tokio::select! {
                _ = &mut quit => break,
                msg = rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
            };
            let permit = tokio::select! {
                _ = &mut quit => break,
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };
            let client = client.clone();
            let worker = worker.clone();
            tokio::spawn(async move {
                worker.submit(&client, submission).await;
                drop(permit);
            });
        }
        debug!("Report submission worker exiting");
    }

    async fn submit(&self, client: &reqwest::Client, submission: Submission) {
        match submission {
            Submission::Snapshot(snapshot) => {
                let url = endpoint(&self.base_url, "update");
                self.post_json(client, &url, &snapshot.global).await;
                self.post_json(client, &url, &snapshot.addresses).await;
            }
            Submission::Packet(event) => {
                self.post_json(client, &endpoint(&self.base_url, "packets"), &event)
                    .await;
            }
        }
    }

    /// Failures are counted and otherwise ignored: no retry, no backoff.
    async fn post_json<T: Serialize + ?Sized>(&self, client: &reqwest::Client, url: &str, body: &T) {
        match client.post(url).json(body).send().await {
            Ok(_) => self.counters.sent.fetch_add(1, Relaxed),
            Err(_) => self.counters.failed.fetch_add(1, Relaxed),
        };
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim().trim_end_matches('/'))
}

/// Reporting start-up failures.
#[derive(Error, Debug)]
pub enum ReporterError {
    /// The reporting thread could not be spawned.
    #[error("Unable to spawn reporting thread: {0}")]
    Thread(String),
}
