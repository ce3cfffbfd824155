//! Native snapshot client
//!
//! Runs `reqwest` on a tokio runtime in a background thread. Requests go in
//! through an unbounded channel, completions come back through `mpsc`.

use crate::config::Config;
use crate::core::{Completion, FetchError, FetchTicket, SnapshotSource};
use crate::fetch_state::FetchStatus;
use parking_lot::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Called after each completion is queued (e.g. to wake the UI)
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Native HTTP client that runs in a background thread
pub struct NativeFetchClient {
    requests: UnboundedSender<FetchTicket>,
    rx: Receiver<Completion>,
    /// Completions for requests the worker never received
    failed: Vec<Completion>,
    /// Shared status of the latest request
    pub status: Arc<Mutex<FetchStatus>>,
}

impl NativeFetchClient {
    pub fn spawn(config: &Config) -> Self {
        Self::spawn_with_waker(config, Arc::new(|| {}))
    }

    /// Start the worker thread
    ///
    /// The tokio runtime and `reqwest::Client` live on that thread; `waker`
    /// runs there too, once per finished request.
    pub fn spawn_with_waker(config: &Config, waker: Waker) -> Self {
        let (req_tx, req_rx) = unbounded_channel();
        let (tx, rx): (Sender<Completion>, Receiver<Completion>) = mpsc::channel();
        let status = Arc::new(Mutex::new(FetchStatus::Idle));

        let url = config.data_url.clone();
        let timeout = config.request_timeout;
        let status_clone = status.clone();

        let spawned = std::thread::Builder::new()
            .name("snapshot-fetch".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!(error = %e, "Failed to create tokio runtime");
                        *status_clone.lock() = FetchStatus::Error(e.to_string());
                        return;
                    }
                };
                rt.block_on(Self::run(url, timeout, req_rx, tx, status_clone, waker));
            });
        if let Err(e) = spawned {
            error!(error = %e, "Failed to spawn fetch thread");
            *status.lock() = FetchStatus::Error(e.to_string());
        }

        Self {
            requests: req_tx,
            rx,
            failed: Vec::new(),
            status,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status.lock().clone()
    }

    async fn run(
        url: String,
        timeout: Duration,
        mut requests: UnboundedReceiver<FetchTicket>,
        tx: Sender<Completion>,
        status: Arc<Mutex<FetchStatus>>,
        waker: Waker,
    ) {
        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client");
                *status.lock() = FetchStatus::Error(e.to_string());
                return;
            }
        };
        info!(url = %url, timeout_ms = timeout.as_millis() as u64, "Snapshot fetcher ready");

        while let Some(ticket) = requests.recv().await {
            *status.lock() = FetchStatus::Loading;
            let client = client.clone();
            let url = url.clone();
            let tx = tx.clone();
            let status = status.clone();
            let waker = waker.clone();
            tokio::spawn(async move {
                let outcome = fetch_body(&client, &url).await;
                *status.lock() = match &outcome {
                    Ok(_) => FetchStatus::Ok,
                    Err(e) => FetchStatus::Error(e.to_string()),
                };
                if tx.send(Completion { ticket, outcome }).is_ok() {
                    waker();
                }
            });
        }
        debug!("Snapshot fetcher stopped");
    }
}

/// GET `url` and return the body of a successful response
pub async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))
}

impl SnapshotSource for NativeFetchClient {
    fn request(&mut self, ticket: FetchTicket) {
        if self.requests.send(ticket).is_err() {
            warn!(seq = ticket.seq, "Fetch worker not running");
            self.failed.push(Completion {
                ticket,
                outcome: Err(FetchError::Transport("fetch worker not running".into())),
            });
        }
    }

    fn drain(&mut self) -> Vec<Completion> {
        let mut done = std::mem::take(&mut self.failed);
        done.extend(self.rx.try_iter());
        done
    }
}
