use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tts_relay::domain::tts::{AudioFormat, SynthesisRequest};
use tts_relay::infrastructure::repositories::{AdapterError, TtsRepository};

#[derive(Debug, Clone, Copy)]
pub enum StubBehavior {
    /// Writes an artifact of the given size and reports success
    Succeed(usize),
    /// Leaves a partial artifact behind and fails
    Fail,
}

/// Synthesis engine double that writes deterministic bytes
pub struct StubTtsRepository {
    name: &'static str,
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubTtsRepository {
    pub fn new(name: &'static str, behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            name,
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsRepository for StubTtsRepository {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        _voice: &str,
        output: &Path,
    ) -> Result<AudioFormat, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            StubBehavior::Succeed(size) => {
                tokio::fs::write(output, vec![0x49u8; size]).await?;
                Ok(request.hints.format)
            }
            StubBehavior::Fail => {
                tokio::fs::write(output, b"partial").await?;
                Err(AdapterError::Engine("stub engine failure".to_string()))
            }
        }
    }
}
