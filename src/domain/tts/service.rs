use super::catalog::preview_sentence;
use super::error::TtsServiceError;
use super::model::{AudioFormat, SynthesisOutcome, SynthesisRequest};
use super::voice::VoiceTable;
use crate::domain::usage::UsageService;
use crate::infrastructure::repositories::{AdapterError, TtsRepository};
use anyhow::Context;
use async_trait::async_trait;
use moka::future::Cache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_MAX_TEXT_CHARS: usize = 5000;
pub const DEFAULT_MIN_ARTIFACT_BYTES: u64 = 200;
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    /// Directory for per-attempt artifacts
    pub scratch_dir: PathBuf,
    pub max_text_chars: usize,
    /// Artifacts smaller than this are treated as corrupt
    pub min_artifact_bytes: u64,
    pub adapter_timeout: Duration,
    pub preview_cache_enabled: bool,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            min_artifact_bytes: DEFAULT_MIN_ARTIFACT_BYTES,
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
            preview_cache_enabled: true,
        }
    }
}

/// Synthesis dispatcher: resolves the voice, walks the engine chain until
/// one produces a plausible artifact, and records usage on success.
pub struct TtsService {
    voice_table: Arc<VoiceTable>,
    adapters: Vec<Arc<dyn TtsRepository>>,
    usage: Arc<UsageService>,
    settings: DispatcherSettings,
    preview_cache: Option<Cache<String, SynthesisOutcome>>,
}

impl TtsService {
    pub fn new(
        voice_table: Arc<VoiceTable>,
        adapters: Vec<Arc<dyn TtsRepository>>,
        usage: Arc<UsageService>,
        settings: DispatcherSettings,
    ) -> Self {
        let preview_cache = if settings.preview_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(60 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            voice_table,
            adapters,
            usage,
            settings,
            preview_cache,
        }
    }

    /// Engine names in the order they are tried
    pub fn engine_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Convert text to speech
    ///
    /// This operation:
    /// - Validates the text (non-empty, within the length limit)
    /// - Resolves the requested voice and runs the engine chain
    /// - Records usage when synthesis succeeds
    async fn convert(&self, request: SynthesisRequest) -> Result<SynthesisOutcome, TtsServiceError>;

    /// Synthesize the sample sentence for a language with the requested voice.
    /// Previews are not counted as usage.
    async fn preview(
        &self,
        language: &str,
        voice_type: &str,
    ) -> Result<SynthesisOutcome, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn convert(&self, request: SynthesisRequest) -> Result<SynthesisOutcome, TtsServiceError> {
        let request = self.validate(request)?;
        let outcome = self.dispatch(&request).await?;

        self.usage.record_conversion(&request.language).await;

        Ok(outcome)
    }

    async fn preview(
        &self,
        language: &str,
        voice_type: &str,
    ) -> Result<SynthesisOutcome, TtsServiceError> {
        let resolved = self.voice_table.resolve(language, voice_type);
        let cache_key = format!("{}|{}", language, resolved.voice_id);

        if let Some(cache) = &self.preview_cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::debug!(cache_key = %cache_key, "Voice preview cache hit");
                return Ok(cached);
            }
        }

        let request = SynthesisRequest::new(preview_sentence(language), language, voice_type);
        let outcome = self.dispatch(&request).await?;

        if let Some(cache) = &self.preview_cache {
            cache.insert(cache_key, outcome.clone()).await;
        }

        Ok(outcome)
    }
}

impl TtsService {
    fn validate(&self, mut request: SynthesisRequest) -> Result<SynthesisRequest, TtsServiceError> {
        let trimmed = request.text.trim();

        if trimmed.is_empty() {
            return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
        }

        let max = self.settings.max_text_chars;
        if trimmed.chars().count() > max {
            return Err(TtsServiceError::Invalid(format!(
                "Text must be {} characters or less",
                max
            )));
        }

        if trimmed.len() != request.text.len() {
            request.text = trimmed.to_string();
        }
        Ok(request)
    }

    /// Run the engine chain for an already validated request
    async fn dispatch(&self, request: &SynthesisRequest) -> Result<SynthesisOutcome, TtsServiceError> {
        let resolved = self
            .voice_table
            .resolve(&request.language, &request.voice_type);
        let token = Uuid::new_v4().simple().to_string();

        tokio::fs::create_dir_all(&self.settings.scratch_dir)
            .await
            .with_context(|| {
                format!(
                    "scratch directory {} is not usable",
                    self.settings.scratch_dir.display()
                )
            })?;

        tracing::info!(
            voice = %resolved.voice_id,
            resolution = ?resolved.step,
            language = %request.language,
            voice_type = %request.voice_type,
            rate = request.hints.rate,
            pitch = request.hints.pitch,
            format = %request.hints.format,
            text_length = request.text.len(),
            "Dispatching synthesis"
        );

        for adapter in &self.adapters {
            let path = self.settings.scratch_dir.join(format!(
                "tts_{}_{}.{}",
                token,
                adapter.name(),
                request.hints.format.extension()
            ));

            let produced = match self
                .attempt(adapter.as_ref(), request, &resolved.voice_id, &path)
                .await
            {
                Ok(format) => format,
                Err(e) => {
                    tracing::warn!(adapter = adapter.name(), error = %e, "Synthesis engine failed, trying next");
                    remove_scratch(&path).await;
                    continue;
                }
            };

            let read = tokio::fs::read(&path).await;
            remove_scratch(&path).await;

            match read {
                Ok(audio_data) => {
                    tracing::info!(
                        adapter = adapter.name(),
                        voice = %resolved.voice_id,
                        audio_size_bytes = audio_data.len(),
                        "Synthesis succeeded"
                    );
                    return Ok(SynthesisOutcome {
                        audio_data,
                        method: adapter.name().to_string(),
                        voice_used: resolved.voice_id,
                        format: produced,
                    });
                }
                Err(e) => {
                    tracing::warn!(adapter = adapter.name(), error = %e, "Failed to read artifact, trying next");
                }
            }
        }

        tracing::error!(
            engines = ?self.engine_names(),
            "All synthesis engines failed"
        );
        Err(TtsServiceError::AllAdaptersFailed)
    }

    /// One bounded attempt on one engine, including artifact validation
    async fn attempt(
        &self,
        adapter: &dyn TtsRepository,
        request: &SynthesisRequest,
        voice: &str,
        path: &Path,
    ) -> Result<AudioFormat, AdapterError> {
        let timeout = self.settings.adapter_timeout;
        let format = tokio::time::timeout(timeout, adapter.synthesize(request, voice, path))
            .await
            .map_err(|_| AdapterError::Timeout(timeout.as_secs()))??;

        let size = tokio::fs::metadata(path).await?.len();
        let minimum = self.settings.min_artifact_bytes;
        if size < minimum {
            return Err(AdapterError::ImplausibleArtifact { size, minimum });
        }

        Ok(format)
    }
}

async fn remove_scratch(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch artifact"),
    }
}
