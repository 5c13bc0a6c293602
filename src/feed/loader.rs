//! Single-shot background loading of the news feed.
//!
//! The loader lives on the UI task. Each [`FeedLoader::load`] spawns one
//! fetch + parse task tagged with a generation number; the result comes back
//! as an [`AppEvent::FeedLoaded`] and is only accepted if its generation is
//! still the current one.

use crate::app::{AppEvent, EmptyReason};
use crate::feed::client::{FeedClient, FetchError};
use crate::feed::item::FeedItem;
use crate::feed::parser::{parse, ParseError};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Why a load cycle produced no items.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The background task panicked before producing a result
    #[error("Load task panicked: {0}")]
    Panicked(String),
}

impl LoadError {
    /// Reason code handed to the presenter for the empty-state message.
    pub fn empty_reason(&self) -> EmptyReason {
        match self {
            LoadError::Fetch(_) => EmptyReason::FetchFailed,
            LoadError::Parse(_) | LoadError::Panicked(_) => EmptyReason::NoNews,
        }
    }
}

pub type LoadResult = Result<Vec<FeedItem>, LoadError>;

/// Loader lifecycle: `Idle -> Loading -> {Delivered, Failed}`, and back to
/// `Loading` on the next `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Delivered,
    Failed,
}

pub struct FeedLoader {
    client: FeedClient,
    event_tx: mpsc::Sender<AppEvent>,
    generation: u64,
    state: LoadState,
    handle: Option<JoinHandle<()>>,
}

impl FeedLoader {
    pub fn new(client: FeedClient, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            client,
            event_tx,
            generation: 0,
            state: LoadState::Idle,
            handle: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Starts a load cycle for `url` and returns its generation.
    ///
    /// Never blocks. Any outstanding cycle is superseded: its task is aborted
    /// if it has not finished, and a result it already queued is rejected by
    /// [`accept`](Self::accept).
    pub fn load(&mut self, url: impl Into<String>) -> u64 {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(superseded = self.generation, "Aborted previous feed load");
        }

        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Loading;
        let generation = self.generation;

        let client = self.client.clone();
        let tx = self.event_tx.clone();
        let url = url.into();

        tracing::debug!(generation, "Spawning feed load task");

        self.handle = Some(tokio::spawn(async move {
            let result = match catch_task_panic(fetch_and_parse(&client, &url)).await {
                Ok(result) => result,
                Err(panic_msg) => {
                    tracing::error!(generation, error = %panic_msg, "Feed load task panicked");
                    Err(LoadError::Panicked(panic_msg))
                }
            };

            if let Err(e) = tx.send(AppEvent::FeedLoaded { generation, result }).await {
                tracing::debug!(generation, error = %e, "Feed load result dropped (receiver closed)");
            }
        }));

        generation
    }

    /// Delivery gate for a finished cycle.
    ///
    /// Returns the result only if `generation` is the current cycle and it is
    /// still loading; stale results and results arriving after
    /// [`reset`](Self::reset) yield `None`.
    pub fn accept(&mut self, generation: u64, result: LoadResult) -> Option<LoadResult> {
        if self.state != LoadState::Loading || generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                state = ?self.state,
                "Ignoring stale feed load (generation mismatch)"
            );
            return None;
        }

        self.handle = None;
        self.state = match &result {
            Ok(items) => {
                tracing::info!(generation, items = items.len(), "Feed loaded");
                LoadState::Delivered
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Feed load failed");
                LoadState::Failed
            }
        };
        Some(result)
    }

    /// Abandons any outstanding cycle; its result will never be accepted.
    pub fn reset(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Idle;
    }
}

impl Drop for FeedLoader {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn fetch_and_parse(client: &FeedClient, url: &str) -> LoadResult {
    let raw = client.fetch_raw(url).await?;
    Ok(parse(&raw)?)
}

/// Runs `future`, converting a panic into `Err(message)`.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}
