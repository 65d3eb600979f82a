//! Execution adapters: run a walk on the caller's thread, on a dedicated
//! background thread with a completion callback, or as a tokio future.

use std::any::Any;
use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};
use std::thread;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::WalkError;

use super::config::{Delivery, Execution, OutputType, WalkRequest};
use super::engine::{CancelToken, Traversal};
use super::lister::{FsLister, Lister};
use super::materialize::{Listing, WalkItem, materialize};
use super::stream::EntryStream;

/// Result of a blocking or callback walk.
pub enum Walked<L> {
    Listing(Listing),
    Stream(EntryStream<L>),
}

impl<L> Walked<L> {
    pub fn into_listing(self) -> Option<Listing> {
        match self {
            Walked::Listing(l) => Some(l),
            Walked::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<EntryStream<L>> {
        match self {
            Walked::Listing(_) => None,
            Walked::Stream(s) => Some(s),
        }
    }
}

/// Result of `Walker::walk_async`.
pub enum AsyncWalked<L> {
    Listing(Listing),
    Stream(AsyncEntryStream<L>),
}

impl<L> AsyncWalked<L> {
    pub fn into_listing(self) -> Option<Listing> {
        match self {
            AsyncWalked::Listing(l) => Some(l),
            AsyncWalked::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<AsyncEntryStream<L>> {
        match self {
            AsyncWalked::Listing(_) => None,
            AsyncWalked::Stream(s) => Some(s),
        }
    }
}

enum AsyncSource<L> {
    Inline(EntryStream<L>),
    Channel(mpsc::Receiver<Result<WalkItem, WalkError>>),
    Closed,
}

/// Stream handed out by `walk_async`.
///
/// With asynchronous execution, awaiting the next item never blocks the
/// runtime on filesystem calls; the walk runs on tokio's blocking pool and
/// pauses while the buffer is full.
pub struct AsyncEntryStream<L> {
    source: AsyncSource<L>,
}

impl<L: Lister> AsyncEntryStream<L> {
    /// Next item, or `None` once the stream has closed.
    pub async fn recv(&mut self) -> Option<Result<WalkItem, WalkError>> {
        let next = match &mut self.source {
            AsyncSource::Inline(stream) => stream.next(),
            AsyncSource::Channel(rx) => rx.recv().await,
            AsyncSource::Closed => None,
        };
        if !matches!(next, Some(Ok(_))) {
            self.source = AsyncSource::Closed;
        }
        next
    }

    /// Drain everything that is left. Fails on the first error.
    pub async fn collect_items(mut self) -> Result<Vec<WalkItem>, WalkError> {
        let mut items = Vec::new();
        while let Some(item) = self.recv().await {
            items.push(item?);
        }
        Ok(items)
    }
}

/// Runs one `WalkRequest`.
pub struct Walker<L = FsLister> {
    request: WalkRequest,
    lister: L,
    cancel: CancelToken,
}

impl Walker<FsLister> {
    pub fn new(request: WalkRequest) -> Self {
        Self {
            request,
            lister: FsLister,
            cancel: CancelToken::new(),
        }
    }
}

impl<L: Lister> Walker<L> {
    /// Replace the listing source, e.g. with an in-memory tree.
    pub fn with_lister<M: Lister>(self, lister: M) -> Walker<M> {
        Walker {
            request: self.request,
            lister,
            cancel: self.cancel,
        }
    }

    pub fn request(&self) -> &WalkRequest {
        &self.request
    }

    /// Token that cancels this walk, whichever thread it runs on.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// A fresh lazy engine borrowing this walker's lister.
    pub fn traverse(&self) -> Traversal<&L> {
        Traversal::new(&self.request.root, self.request.algorithm, &self.lister)
            .with_cancel(self.cancel.clone())
    }

    fn into_traversal(self) -> Traversal<L> {
        Traversal::new(&self.request.root, self.request.algorithm, self.lister)
            .with_cancel(self.cancel)
    }

    fn collect_listing(self) -> Result<Listing, WalkError> {
        let output_type = self.request.output_type;
        materialize(self.into_traversal(), output_type)
    }

    /// Walk on the caller's thread.
    ///
    /// Materialized delivery blocks until the whole tree is listed. Streamed
    /// delivery returns at once; each listing call then happens while the
    /// stream is being read.
    pub fn walk(self) -> Result<Walked<L>, WalkError> {
        let output_type = self.request.output_type;
        match self.request.delivery {
            Delivery::Materialized => self.collect_listing().map(Walked::Listing),
            Delivery::Streamed => Ok(Walked::Stream(EntryStream::lazy(
                self.into_traversal(),
                output_type,
            ))),
        }
    }
}

impl<L: Lister + Send + 'static> Walker<L> {
    /// Walk according to the request's execution mode and report through
    /// `on_complete`, which is called exactly once.
    ///
    /// Asynchronous execution runs the walk on its own background thread, so
    /// a walk paused by a full buffer never holds up another walk. For
    /// streamed delivery the callback receives the stream immediately and the
    /// background thread fills it, blocking whenever the buffer is full.
    ///
    /// That stream is a blocking iterator: `next()` waits on the calling
    /// thread until the walk produces the next item. Use
    /// [`walk_async`](Self::walk_async) when the consumer must not block.
    pub fn walk_with<F>(self, on_complete: F)
    where
        F: FnOnce(Result<Walked<L>, WalkError>) + Send + 'static,
    {
        if self.request.execution == Execution::Synchronous {
            on_complete(self.walk());
            return;
        }

        debug!(
            root = %self.request.root.display(),
            algorithm = ?self.request.algorithm,
            delivery = ?self.request.delivery,
            "spawning background walk"
        );

        match self.request.delivery {
            Delivery::Materialized => {
                let slot = Arc::new(Mutex::new(Some(on_complete)));
                let worker_slot = Arc::clone(&slot);
                let spawned = spawn_worker(move || {
                    let outcome = catch_unwind(AssertUnwindSafe(|| self.collect_listing()))
                        .unwrap_or_else(|panic| Err(WalkError::WorkerLost(panic_message(&*panic))));
                    if let Some(on_complete) = take_callback(&worker_slot) {
                        on_complete(outcome.map(Walked::Listing));
                    }
                });
                if let Err(err) = spawned {
                    if let Some(on_complete) = take_callback(&slot) {
                        on_complete(Err(WalkError::WorkerLost(err.to_string())));
                    }
                }
            }
            Delivery::Streamed => {
                let (tx, rx) = crossbeam_channel::bounded(self.request.capacity());
                let spawn_failed = tx.clone();
                let output_type = self.request.output_type;
                let traversal = self.into_traversal();
                match spawn_worker(move || {
                    produce(traversal, output_type, |item| tx.send(item).is_ok())
                }) {
                    Ok(()) => drop(spawn_failed),
                    Err(err) => {
                        // The buffer is empty, so this never blocks.
                        let _ = spawn_failed.send(Err(WalkError::WorkerLost(err.to_string())));
                    }
                }
                on_complete(Ok(Walked::Stream(EntryStream::channel(rx))));
            }
        }
    }

    /// Walk according to the request's execution mode as a future.
    ///
    /// Asynchronous execution moves every listing call onto tokio's blocking
    /// pool, so this must be awaited inside a tokio runtime. Synchronous
    /// execution walks inside the calling task.
    pub async fn walk_async(self) -> Result<AsyncWalked<L>, WalkError> {
        if self.request.execution == Execution::Synchronous {
            return self.walk().map(|walked| match walked {
                Walked::Listing(l) => AsyncWalked::Listing(l),
                Walked::Stream(s) => AsyncWalked::Stream(AsyncEntryStream {
                    source: AsyncSource::Inline(s),
                }),
            });
        }

        debug!(
            root = %self.request.root.display(),
            algorithm = ?self.request.algorithm,
            delivery = ?self.request.delivery,
            "spawning blocking walk"
        );

        match self.request.delivery {
            Delivery::Materialized => tokio::task::spawn_blocking(move || self.collect_listing())
                .await
                .map_err(|e| WalkError::WorkerLost(e.to_string()))?
                .map(AsyncWalked::Listing),
            Delivery::Streamed => {
                let (tx, rx) = mpsc::channel(self.request.capacity());
                let output_type = self.request.output_type;
                let traversal = self.into_traversal();
                tokio::task::spawn_blocking(move || {
                    produce(traversal, output_type, |item| tx.blocking_send(item).is_ok())
                });
                Ok(AsyncWalked::Stream(AsyncEntryStream {
                    source: AsyncSource::Channel(rx),
                }))
            }
        }
    }
}

/// Feed a walk into `send` until it ends or the reader goes away.
///
/// `send` blocks while the buffer is full and returns false once the
/// receiving side is gone.
fn produce<L, S>(traversal: Traversal<L>, output_type: OutputType, mut send: S)
where
    L: Lister,
    S: FnMut(Result<WalkItem, WalkError>) -> bool,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        for result in traversal {
            if !send(result.map(|e| WalkItem::shape(e, output_type))) {
                debug!("stream reader dropped, stopping walk");
                return;
            }
        }
    }));

    if let Err(panic) = outcome {
        send(Err(WalkError::WorkerLost(panic_message(&*panic))));
    }
}

/// Run `work` on a fresh, detached thread.
fn spawn_worker<W>(work: W) -> io::Result<()>
where
    W: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name("burrow-walk".to_string())
        .spawn(work)
        .map(drop)
}

fn take_callback<F>(slot: &Mutex<Option<F>>) -> Option<F> {
    slot.lock().ok().and_then(|mut guard| guard.take())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "walk panicked".to_string()
    }
}

/// Walk the real filesystem on the caller's thread.
pub fn read_dir_recursive(request: WalkRequest) -> Result<Walked<FsLister>, WalkError> {
    Walker::new(request).walk()
}
