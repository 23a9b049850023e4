//! Bedrock-backed text generation with a bounded retry policy.

use std::time::Duration;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, Message, SystemContentBlock,
};
use tracing::{info, warn};

use nurtura_engine::generator::{GenerateError, GenerationRequest, TextGenerator};

use crate::error::BedrockError;

const SYSTEM_PROMPT: &str = "\
You are a pediatric development specialist providing evidence-based, \
compassionate assessments. Always return only valid JSON matching the \
requested structure — no markdown fences, no commentary outside JSON.";

/// Bounded retry for model invocation: exponential backoff between
/// attempts and a hard per-attempt timeout. Exhaustion surfaces as an
/// error, never a hang.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(10),
            attempt_timeout: Duration::from_secs(90),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry `attempt` (1-based): doubles from the initial
    /// backoff, capped.
    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
            .min(self.max_backoff)
    }
}

/// Bedrock implementation of the engine's text-generation seam.
///
/// Constructed once at process bootstrap and injected into the
/// orchestrator — never held as process-wide state.
pub struct BedrockGenerator {
    client: Client,
    model_id: String,
    retry: RetryPolicy,
}

impl BedrockGenerator {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            model_id: model_id.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// One Converse invocation. Returns the concatenated text blocks of
    /// the model's reply.
    async fn invoke_once(&self, user_message: &str) -> Result<String, BedrockError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(user_message.to_string()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(SYSTEM_PROMPT.to_string()))
            .messages(message)
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(t) = block {
                    Some(t.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(text)
    }
}

impl TextGenerator for BedrockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        let context = serde_json::to_string_pretty(&request.context)
            .map_err(|e| GenerateError::Invocation(format!("context serialization: {e}")))?;
        let user_message = format!(
            "CONTEXT (JSON):\n{context}\n\n\
             Return ONLY valid JSON with this exact structure:\n{}",
            request.schema_hint
        );

        let mut last_error = GenerateError::Unavailable("no attempts made".to_string());

        for attempt in 0..self.retry.attempts {
            if attempt > 0 {
                let delay = self.retry.backoff(attempt);
                info!(
                    operation = request.operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying generation"
                );
                tokio::time::sleep(delay).await;
            }

            match tokio::time::timeout(self.retry.attempt_timeout, self.invoke_once(&user_message))
                .await
            {
                Ok(Ok(text)) => {
                    info!(
                        operation = request.operation,
                        model = %self.model_id,
                        attempt,
                        response_chars = text.len(),
                        "generation complete"
                    );
                    return Ok(text);
                }
                Ok(Err(e)) => {
                    warn!(operation = request.operation, attempt, error = %e, "model invocation failed");
                    last_error = GenerateError::Invocation(e.to_string());
                }
                Err(_) => {
                    warn!(operation = request.operation, attempt, "attempt timed out");
                    last_error = GenerateError::Timeout(self.retry.attempt_timeout);
                }
            }
        }

        Err(last_error)
    }
}
