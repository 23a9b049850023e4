use thiserror::Error;

/// A request to the text-generation collaborator.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Operation label for logging and audit (e.g. `"pool_summary"`).
    pub operation: &'static str,
    /// Structured clinical context, serialized to JSON for the model.
    pub context: serde_json::Value,
    /// The JSON shape the response must follow, described to the model.
    pub schema_hint: &'static str,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("generation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Stateless text-generation collaborator.
///
/// May fail, and may return structurally malformed output — callers
/// validate through [`crate::parse`] before trusting content. There is no
/// semantic guarantee beyond best-effort JSON matching the requested
/// shape. Implementations own their retry policy and timeouts; the trait
/// surfaces only the final outcome. The implementation is injected at
/// bootstrap and shared by reference — never held as global state.
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;
}
