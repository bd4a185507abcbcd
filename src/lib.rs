use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Kube Error: {0}")]
    KubeError(#[source] kube::Error),

    #[error("IO Error: {0}")]
    IoError(std::io::Error),

    /// NB: this is a catch-all for any other errors
    #[error("Other Error: {0}")]
    OtherError(String),
}
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Whether delivering the same event again could succeed.
    ///
    /// The API server answers 409 when the event already exists and 422 when
    /// it rejects the event outright; neither improves with another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::KubeError(kube::Error::Api(resp)) => !matches!(resp.code, 409 | 422),
            Error::KubeError(_) => true,
            Error::IoError(_) => true,
            Error::OtherError(_) => false,
        }
    }
}

pub mod events_helper;
pub mod helper;
pub mod recorder;

/// Log and trace integrations
pub mod telemetry;
