pub mod chat;
pub mod error;

pub use chat::{ChatClient, GatewayConfig};
pub use error::GatewayError;

use std::future::Future;

/// One prompt in, best-effort text out. Implementations own the transport,
/// the timeout, and nothing else; JSON validation happens downstream.
pub trait CompletionGateway: Send + Sync {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}
