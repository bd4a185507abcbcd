use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use futures::future::BoxFuture;
use kube::Client;
use kube::runtime::events::Recorder;

use super::{EventSource, RecordedEvent};
use crate::{Error, Result};

/// A delivery target for recorded events
pub trait EventSink: Send + Sync + 'static {
    fn deliver<'a>(&'a self, event: &'a RecordedEvent) -> BoxFuture<'a, Result<()>>;
}

/// Writes events to the cluster's `events.k8s.io/v1` API.
///
/// Each event lands in the namespace of the object it regards, so a single
/// sink covers every namespace. One `kube` recorder is kept per event source
/// so `reportingController` always matches the emitting component.
pub struct KubeSink {
    client: Client,
    recorders: Mutex<HashMap<EventSource, Recorder>>,
}

impl KubeSink {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            recorders: Mutex::new(HashMap::new()),
        }
    }

    fn recorder_for(&self, source: &EventSource) -> Recorder {
        let mut recorders = self.recorders.lock().unwrap_or_else(PoisonError::into_inner);
        recorders
            .entry(source.clone())
            .or_insert_with(|| Recorder::new(self.client.clone(), source.into()))
            .clone()
    }
}

impl EventSink for KubeSink {
    fn deliver<'a>(&'a self, event: &'a RecordedEvent) -> BoxFuture<'a, Result<()>> {
        let recorder = self.recorder_for(&event.source);
        Box::pin(async move {
            recorder
                .publish(&event.to_event(), &event.regarding)
                .await
                .map_err(Error::KubeError)
        })
    }
}
