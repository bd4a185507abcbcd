use kube::Resource;
use kube::runtime::events::{Event, EventType};

use crate::recorder::EventRecorder;

/// Publish a simple Normal event with given reason, action and note.
pub fn emit_info<R: Resource<DynamicType = ()>>(
    recorder: &EventRecorder,
    obj: &R,
    reason: &str,
    action: &str,
    note: impl Into<Option<String>>,
) {
    emit(recorder, obj, EventType::Normal, reason, action, note.into());
}

/// Publish a Warning event, typically for a failed reconcile step.
pub fn emit_warning<R: Resource<DynamicType = ()>>(
    recorder: &EventRecorder,
    obj: &R,
    reason: &str,
    action: &str,
    note: impl Into<Option<String>>,
) {
    emit(recorder, obj, EventType::Warning, reason, action, note.into());
}

fn emit<R: Resource<DynamicType = ()>>(
    recorder: &EventRecorder,
    obj: &R,
    type_: EventType,
    reason: &str,
    action: &str,
    note: Option<String>,
) {
    recorder.publish(
        Event {
            type_,
            reason: reason.into(),
            note,
            action: action.into(),
            secondary: None,
        },
        &obj.object_ref(&()),
    );
}
