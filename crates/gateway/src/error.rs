use thiserror::Error;

/// Failures at the completion-service boundary. Anything here means the
/// service was unreachable or misbehaving; the text it returned (if any)
/// never made it out.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("completion request failed")]
    Request(#[from] reqwest::Error),

    #[error("completion service returned status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("completion response carried no extractable text")]
    NoContent,
}
