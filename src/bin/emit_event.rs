use clap::Parser;
use controller::{
    helper::{get_instance_name, get_my_namespace},
    recorder::{COMPONENT_NAME, EventSource, RecorderSettings, create_event_recorder},
    telemetry::{self, LogFormat},
};
use k8s_openapi::api::core::v1::ObjectReference;
use kube::{
    Client,
    runtime::events::{Event, EventType},
};
use tracing::*;

/// Record a single event against a Kubernetes object
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Kind of the object the event is about
    #[arg(long)]
    kind: String,
    #[arg(long, default_value = "v1")]
    api_version: String,
    /// Name of the object the event is about
    #[arg(long)]
    name: String,
    /// Namespace of the object; defaults to the pod's own namespace
    #[arg(long)]
    namespace: Option<String>,
    #[arg(long)]
    reason: String,
    /// Defaults to the reason
    #[arg(long)]
    action: Option<String>,
    #[arg(long)]
    message: Option<String>,
    /// Record a Warning instead of a Normal event
    #[arg(long)]
    warning: bool,
    #[arg(long, default_value = COMPONENT_NAME)]
    component: String,
    /// Only log the event, do not write it to the cluster
    #[arg(long)]
    no_remote: bool,
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init(args.log_format);

    let client = Client::try_default().await?;
    let mut source = EventSource::new(args.component);
    if let Some(host) = get_instance_name() {
        source = source.with_host(host);
    }
    let settings = RecorderSettings {
        source,
        remote_delivery: !args.no_remote,
        ..RecorderSettings::default()
    };
    let recorder = create_event_recorder(client, &settings);

    let namespace = args.namespace.or_else(|| get_my_namespace().ok());
    let regarding = ObjectReference {
        api_version: Some(args.api_version),
        kind: Some(args.kind),
        name: Some(args.name),
        namespace,
        ..ObjectReference::default()
    };
    let type_ = if args.warning {
        EventType::Warning
    } else {
        EventType::Normal
    };
    recorder.publish(
        Event {
            type_,
            action: args.action.unwrap_or_else(|| args.reason.clone()),
            reason: args.reason,
            note: args.message,
            secondary: None,
        },
        &regarding,
    );
    debug!("event queued, flushing sinks");
    recorder.shutdown().await;
    Ok(())
}
