//! Boundary to the external text-generation collaborator.

/// Failure modes a generation backend may report. Callers must recover by
/// answering from the scheme's stored text instead of failing the turn.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation backend unavailable: {0}")]
    Unavailable(String),
    #[error("text generation timed out after {0} ms")]
    TimedOut(u64),
    #[error("text generation returned empty output")]
    EmptyOutput,
}

/// Black-box natural-language answer service. Implementations are expected to
/// use deterministic decoding so repeated calls with the same prompt give
/// stable output, and to enforce their own timeout.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Default backend when no model endpoint is configured. Every call reports
/// unavailability, so replies come from the stored scheme text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

impl TextGenerator for UnconfiguredGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(
            "no generation backend configured".to_string(),
        ))
    }
}
