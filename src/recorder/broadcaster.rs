use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::*;

use super::{EventRecorder, EventSink, EventSource, RecordedEvent};

/// Events buffered per watcher before the slowest one starts losing events
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// How hard a sink task tries to deliver a single event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            interval: Duration::from_secs(10),
        }
    }
}

/// Fans every recorded event out to all attached watchers and sinks.
///
/// Each watcher runs in its own task with its own queue, so a slow sink never
/// blocks the producers or the other watchers.
#[derive(Clone)]
pub struct Broadcaster {
    inner: Arc<Inner>,
}

type EventSender = broadcast::Sender<Arc<RecordedEvent>>;

struct Inner {
    sender: RwLock<Option<EventSender>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    retry: RetryPolicy,
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(capacity, RetryPolicy::default())
    }

    /// `retry` applies to every sink attached with [`Self::start_recording_to_sink`]
    pub fn with_options(capacity: usize, retry: RetryPolicy) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(Inner {
                sender: RwLock::new(Some(sender)),
                tasks: Mutex::new(Vec::new()),
                retry,
            }),
        }
    }

    fn read_sender(&self) -> RwLockReadGuard<'_, Option<EventSender>> {
        self.inner.sender.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Derive a recorder whose events all carry `source`
    pub fn new_recorder(&self, source: EventSource) -> EventRecorder {
        EventRecorder::new(self.clone(), source)
    }

    /// Call `handler` for every event recorded from now on
    pub fn start_event_watcher<F>(&self, mut handler: F)
    where
        F: FnMut(&RecordedEvent) + Send + 'static,
    {
        self.spawn_watcher(move |event| {
            handler(event.as_ref());
            async {}
        });
    }

    /// Write every event to the informational log stream
    pub fn start_logging(&self) {
        self.start_event_watcher(|event| info!("{event}"));
    }

    /// Deliver every event to `sink`, retrying failures per the retry policy
    pub fn start_recording_to_sink<S: EventSink>(&self, sink: S) {
        let sink = Arc::new(sink);
        let retry = self.inner.retry.clone();
        self.spawn_watcher(move |event| {
            let sink = sink.clone();
            let retry = retry.clone();
            async move { record_to_sink(sink.as_ref(), event.as_ref(), &retry).await }
        });
    }

    fn spawn_watcher<F, Fut>(&self, mut on_event: F)
    where
        F: FnMut(Arc<RecordedEvent>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Some(mut rx) = self.read_sender().as_ref().map(|tx| tx.subscribe()) else {
            warn!("broadcaster already shut down, watcher not started");
            return;
        };
        let task = async move {
            loop {
                match rx.recv().await {
                    Ok(event) => on_event(event).await,
                    Err(RecvError::Lagged(missed)) => {
                        warn!("event watcher fell behind, dropped {missed} events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };
        let handle = tokio::spawn(task.with_current_subscriber());
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    /// Enqueue an event for every watcher; never blocks
    pub(crate) fn action(&self, event: RecordedEvent) {
        match self.read_sender().as_ref() {
            Some(tx) => {
                if tx.send(Arc::new(event)).is_err() {
                    debug!("no event watchers attached, event dropped");
                }
            }
            None => debug!("broadcaster shut down, dropping event: {event}"),
        }
    }

    /// Stop accepting events and wait until every watcher has drained its queue
    pub async fn shutdown(&self) {
        let sender = self
            .inner
            .sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);
        let tasks: Vec<_> = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result {
                warn!("event watcher terminated abnormally: {e}");
            }
        }
    }
}

async fn record_to_sink<S: EventSink + ?Sized>(
    sink: &S,
    event: &RecordedEvent,
    retry: &RetryPolicy,
) {
    let mut attempt = 1;
    loop {
        match sink.deliver(event).await {
            Ok(()) => return,
            Err(e) if !e.is_retryable() => {
                warn!("server rejected event '{event}', will not retry: {e}");
                return;
            }
            Err(e) if attempt >= retry.max_attempts => {
                error!("unable to write event '{event}' (retry limit exceeded): {e}");
                return;
            }
            Err(e) => {
                warn!(
                    "unable to write event '{event}' (attempt {attempt}), retrying in {:?}: {e}",
                    retry.interval
                );
                attempt += 1;
                tokio::time::sleep(retry.interval).await;
            }
        }
    }
}
