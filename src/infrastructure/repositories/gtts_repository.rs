use super::batching::split_into_batches;
use super::tts_repository::{AdapterError, TtsRepository};
use crate::domain::tts::{AudioFormat, SynthesisRequest};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// The translate endpoint rejects longer inputs
const MAX_BATCH_SIZE: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) tts-relay";

/// Google Translate speech endpoint. Has no voice, rate, pitch or style
/// controls; only the language is honoured and the output is always mp3.
pub struct GoogleTranslateTtsRepository {
    client: Client,
    endpoint: String,
}

impl GoogleTranslateTtsRepository {
    pub fn new(timeout: Duration) -> Result<Self, AdapterError> {
        Self::with_endpoint(TRANSLATE_TTS_URL.to_string(), timeout)
    }

    pub fn with_endpoint(endpoint: String, timeout: Duration) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Two-letter primary subtag, or English for anything else
    fn target_language(language: &str) -> String {
        let primary = language.split(['-', '_']).next().unwrap_or_default();
        if primary.len() == 2 && primary.chars().all(|c| c.is_ascii_alphabetic()) {
            primary.to_lowercase()
        } else {
            "en".to_string()
        }
    }

    async fn fetch_batch(
        &self,
        batch: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, AdapterError> {
        let textlen = batch.chars().count().to_string();
        let idx = index.to_string();
        let total = total.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", batch),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl TtsRepository for GoogleTranslateTtsRepository {
    fn name(&self) -> &'static str {
        "gtts"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        _voice: &str,
        output: &Path,
    ) -> Result<AudioFormat, AdapterError> {
        let start_time = std::time::Instant::now();
        let language = Self::target_language(&request.language);
        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);

        tracing::info!(
            language = %language,
            batch_count = batches.len(),
            text_length = request.text.len(),
            "Starting Google Translate TTS synthesis"
        );

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio = self
                .fetch_batch(batch, &language, index, batches.len())
                .await?;
            merged_audio.extend(audio);
        }

        tokio::fs::write(output, &merged_audio).await?;

        tracing::info!(
            provider = "gtts",
            latency_ms = start_time.elapsed().as_millis(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(AudioFormat::Mp3)
    }
}
