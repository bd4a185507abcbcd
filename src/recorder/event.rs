use std::fmt;

use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::{Event, EventType};

use super::EventSource;

/// An event as it travels through the broadcaster to every attached sink
#[derive(Clone, Debug)]
pub struct RecordedEvent {
    /// Identity of the recorder that emitted the event
    pub source: EventSource,
    /// Object the event is about
    pub regarding: ObjectReference,
    pub type_: EventType,
    /// Machine readable, UpperCamelCase reason for the transition
    pub reason: String,
    /// What the controller did (or failed to do) to the object
    pub action: String,
    /// Human readable message
    pub message: Option<String>,
    /// Optional secondary object involved in the action
    pub related: Option<ObjectReference>,
}

impl RecordedEvent {
    pub fn new(source: EventSource, regarding: ObjectReference, event: Event) -> Self {
        Self {
            source,
            regarding,
            type_: event.type_,
            reason: event.reason,
            action: event.action,
            message: event.note,
            related: event.secondary,
        }
    }

    /// Back to the shape `kube`'s events API publisher expects
    pub fn to_event(&self) -> Event {
        Event {
            type_: self.type_,
            reason: self.reason.clone(),
            note: self.message.clone(),
            action: self.action.clone(),
            secondary: self.related.clone(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.type_ {
            EventType::Normal => "Normal",
            EventType::Warning => "Warning",
        }
    }
}

impl fmt::Display for RecordedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.regarding;
        write!(
            f,
            "Event({}/{}/{}): type: '{}' reason: '{}' {}",
            r.kind.as_deref().unwrap_or_default(),
            r.namespace.as_deref().unwrap_or_default(),
            r.name.as_deref().unwrap_or_default(),
            self.type_name(),
            self.reason,
            self.message.as_deref().unwrap_or_default(),
        )
    }
}
