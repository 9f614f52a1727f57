use thiserror::Error;

/// Failure taxonomy shared by the generation and deploy surfaces.
///
/// `Validation` is the caller's fault, `Configuration` means a required
/// credential is absent on the server, `Upstream` carries the error text of a
/// failed provider or deploy-target call.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("{0}")] Validation(String),
    #[error("{0}")] Configuration(String),
    #[error("{0}")] Upstream(String),
}

impl ForgeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}
