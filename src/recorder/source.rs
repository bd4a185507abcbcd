use kube::runtime::events::Reporter;

/// Component name stamped on every event this controller records
pub static COMPONENT_NAME: &str = "kube-aws-iam-controller";

/// Identity attached to every event emitted by a recorder
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventSource {
    pub component: String,
    pub host: Option<String>,
}

impl EventSource {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            host: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
}

impl Default for EventSource {
    fn default() -> Self {
        Self::new(COMPONENT_NAME)
    }
}

impl From<&EventSource> for Reporter {
    fn from(source: &EventSource) -> Self {
        Reporter {
            controller: source.component.clone(),
            instance: source.host.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_uses_component_name() {
        let source = EventSource::default();
        assert_eq!(source.component, COMPONENT_NAME);
        assert_eq!(source.host, None);
    }

    #[test]
    fn reporter_carries_component_and_host() {
        let source = EventSource::new("iam").with_host("iam-7d9f-abcde");
        let reporter = Reporter::from(&source);
        assert_eq!(reporter.controller, "iam");
        assert_eq!(reporter.instance.as_deref(), Some("iam-7d9f-abcde"));
    }
}
