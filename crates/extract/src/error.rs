use gateway::GatewayError;
use thiserror::Error;

/// Stage-level extraction failures. Record-level problems never show up
/// here; bad records are dropped inside the stages and the run continues.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Transport(#[from] GatewayError),

    #[error("model response never parsed as JSON within {attempts} attempt(s)")]
    Decode {
        attempts: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("model returned valid JSON but not an array (got {found})")]
    Shape { found: &'static str },
}
