use std::time::{Duration, Instant};

use crate::{BrainError, ChatRequest, ChatTransport, Usage};

/// What one provider round trip produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderReply {
    pub content: String,
    pub usage: Usage,
    pub exid: Option<String>,
    pub elapsed: Duration,
}

/// Sends `request` through `transport` exactly once.
///
/// The clock covers only the transport call. Transport errors are returned as
/// they came, wrapped in [`BrainError::ProviderCall`].
pub async fn invoke_provider(
    transport: &dyn ChatTransport,
    request: ChatRequest,
) -> Result<ProviderReply, BrainError> {
    let model = request.model.clone();
    let message_count = request.messages.len();

    let started = Instant::now();
    let result = transport.complete(request).await;
    let elapsed = started.elapsed();

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                model = %model,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %err,
                "provider call failed"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        model = %model,
        messages = message_count,
        elapsed_ms = elapsed.as_millis() as u64,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        cached_tokens = response.usage.cached_tokens,
        "provider call completed"
    );

    Ok(ProviderReply {
        content: response.content,
        usage: response.usage,
        exid: response.exid,
        elapsed,
    })
}
