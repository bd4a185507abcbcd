//! Event recording for the controller.
//!
//! [`create_event_recorder`] wires a [`Broadcaster`] to the log stream and,
//! when remote delivery is enabled, to the cluster's events API. The returned
//! [`EventRecorder`] only enqueues; delivery happens on background tasks.

use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::{Event, EventType};
use kube::{Client, Resource};

mod broadcaster;
mod event;
pub mod sink;
mod source;

pub use broadcaster::{Broadcaster, DEFAULT_QUEUE_CAPACITY, RetryPolicy};
pub use event::RecordedEvent;
pub use sink::{EventSink, KubeSink};
pub use source::{COMPONENT_NAME, EventSource};

/// How [`create_event_recorder`] assembles the recorder
#[derive(Clone, Debug)]
pub struct RecorderSettings {
    /// Identity stamped on every event
    pub source: EventSource,
    /// Write events to the cluster. Disable when running against a client
    /// that has no API server behind it, e.g. in tests.
    pub remote_delivery: bool,
    pub queue_capacity: usize,
    pub retry: RetryPolicy,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            source: EventSource::default(),
            remote_delivery: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            retry: RetryPolicy::default(),
        }
    }
}

impl RecorderSettings {
    /// Log-only settings for clients without a reachable API server
    pub fn detached() -> Self {
        Self {
            remote_delivery: false,
            ..Self::default()
        }
    }
}

/// Create a recorder that logs every event and, if `settings.remote_delivery`
/// is set, publishes it to the cluster through `client`.
///
/// # Panics
///
/// Must be called from within a tokio runtime, the sinks run as spawned tasks.
pub fn create_event_recorder(client: Client, settings: &RecorderSettings) -> EventRecorder {
    let broadcaster = Broadcaster::with_options(settings.queue_capacity, settings.retry.clone());
    broadcaster.start_logging();
    if settings.remote_delivery {
        broadcaster.start_recording_to_sink(KubeSink::new(client));
    }
    broadcaster.new_recorder(settings.source.clone())
}

/// Handle for recording events about objects; cheap to clone and share
#[derive(Clone)]
pub struct EventRecorder {
    broadcaster: Broadcaster,
    source: EventSource,
}

impl EventRecorder {
    pub(crate) fn new(broadcaster: Broadcaster, source: EventSource) -> Self {
        Self { broadcaster, source }
    }

    pub fn source(&self) -> &EventSource {
        &self.source
    }

    /// Record `event` about the object behind `regarding`
    pub fn publish(&self, event: Event, regarding: &ObjectReference) {
        self.broadcaster
            .action(RecordedEvent::new(self.source.clone(), regarding.clone(), event));
    }

    /// Record an event about `obj`, using `reason` as the action
    pub fn event<K>(&self, obj: &K, type_: EventType, reason: &str, message: impl Into<String>)
    where
        K: Resource<DynamicType = ()>,
    {
        self.publish(
            Event {
                type_,
                reason: reason.into(),
                note: Some(message.into()),
                action: reason.into(),
                secondary: None,
            },
            &obj.object_ref(&()),
        );
    }

    pub fn normal<K>(&self, obj: &K, reason: &str, message: impl Into<String>)
    where
        K: Resource<DynamicType = ()>,
    {
        self.event(obj, EventType::Normal, reason, message);
    }

    pub fn warning<K>(&self, obj: &K, reason: &str, message: impl Into<String>)
    where
        K: Resource<DynamicType = ()>,
    {
        self.event(obj, EventType::Warning, reason, message);
    }

    /// Stop the underlying broadcaster after flushing queued events.
    /// Affects every clone of this recorder.
    pub async fn shutdown(&self) {
        self.broadcaster.shutdown().await;
    }
}
