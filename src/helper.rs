use crate::{Error, Result};

pub fn get_my_namespace() -> Result<String> {
    std::fs::read_to_string("/var/run/secrets/kubernetes.io/serviceaccount/namespace")
        .map(|ns| ns.trim_end_matches('\n').to_string())
        .map_err(Error::IoError)
}

pub fn get_my_pod_name() -> Result<String> {
    std::fs::read_to_string("/etc/hostname")
        .map(|name| name.trim_end_matches('\n').to_string())
        .map_err(Error::IoError)
}

/// Pod name from `POD_NAME` (downward API), falling back to the hostname.
pub fn get_instance_name() -> Option<String> {
    std::env::var("POD_NAME")
        .ok()
        .filter(|name| !name.is_empty())
        .or_else(|| get_my_pod_name().ok())
        .filter(|name| !name.is_empty())
}
