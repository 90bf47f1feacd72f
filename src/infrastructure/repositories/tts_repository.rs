use crate::domain::tts::{AudioFormat, SynthesisRequest};
use async_trait::async_trait;
use std::path::Path;

/// Failure of a single engine attempt. Never surfaced to callers; the
/// dispatcher logs it and moves on to the next engine.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("engine returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine process failed: {0}")]
    Process(String),
    #[error("no voice available for {0}")]
    UnsupportedVoice(String),
    #[error("engine error: {0}")]
    Engine(String),
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("artifact too small ({size} bytes, minimum {minimum})")]
    ImplausibleArtifact { size: u64, minimum: u64 },
}

/// Adapter over one concrete text-to-speech engine.
///
/// Implementations are responsible for:
/// - Translating the engine-independent render hints into engine parameters
///   (or ignoring the ones the engine cannot honour)
/// - Handling provider-specific text length limitations
/// - Writing the finished artifact to `output`
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Short engine name reported to callers as the synthesis method
    fn name(&self) -> &'static str;

    /// Render `request.text` with the resolved `voice` into `output`.
    ///
    /// Returns the format actually written, which may differ from the
    /// requested one when the engine cannot produce it.
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &str,
        output: &Path,
    ) -> Result<AudioFormat, AdapterError>;
}
