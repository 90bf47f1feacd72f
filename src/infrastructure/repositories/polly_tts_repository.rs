use super::azure_tts_repository::escape_xml;
use super::batching::split_into_batches;
use super::tts_repository::{AdapterError, TtsRepository};
use crate::domain::tts::{AudioFormat, Quality, RenderHints, SynthesisRequest};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::path::Path;
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// (locale, female voice, male voice) per Polly locale
const POLLY_VOICES: &[(&str, &str, &str)] = &[
    ("en-US", "Joanna", "Matthew"),
    ("en-GB", "Amy", "Brian"),
    ("en-IN", "Kajal", "Kajal"),
    ("hi-IN", "Kajal", "Kajal"),
    ("es-ES", "Lucia", "Sergio"),
    ("es-MX", "Mia", "Andres"),
    ("fr-FR", "Lea", "Remi"),
    ("de-DE", "Vicki", "Daniel"),
    ("it-IT", "Bianca", "Adriano"),
    ("pt-BR", "Camila", "Thiago"),
    ("ar-AE", "Hala", "Zayd"),
];

/// Voices that support the neural engine
const NEURAL_VOICES: &[&str] = &[
    "Joanna", "Matthew", "Amy", "Brian", "Kajal", "Lucia", "Sergio", "Mia", "Andres", "Lea",
    "Remi", "Vicki", "Daniel", "Bianca", "Adriano", "Camila", "Thiago", "Hala", "Zayd",
];

/// Voices with no standard-engine variant
const NEURAL_ONLY_VOICES: &[&str] = &[
    "Kajal", "Sergio", "Andres", "Remi", "Daniel", "Adriano", "Thiago", "Hala", "Zayd",
];

/// AWS Polly implementation of the engine adapter
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Pick a Polly voice from the resolved voice's locale and the requested
    /// voice class. Locales are matched exactly first, then by language.
    fn select_voice(resolved_voice: &str, female: bool) -> Option<&'static str> {
        let mut parts = resolved_voice.splitn(3, '-');
        let language = parts.next().unwrap_or_default();
        let locale = format!("{}-{}", language, parts.next().unwrap_or_default());

        POLLY_VOICES
            .iter()
            .find(|(l, _, _)| l.eq_ignore_ascii_case(&locale))
            .or_else(|| {
                POLLY_VOICES
                    .iter()
                    .find(|(l, _, _)| l.split('-').next() == Some(language))
            })
            .map(|(_, f, m)| if female { *f } else { *m })
    }

    fn is_voice_neural_compatible(voice: &str) -> bool {
        NEURAL_VOICES.contains(&voice)
    }

    fn engine_for(voice: &str, quality: Quality) -> Engine {
        if NEURAL_ONLY_VOICES.contains(&voice) {
            Engine::Neural
        } else if quality == Quality::High && Self::is_voice_neural_compatible(voice) {
            Engine::Neural
        } else {
            Engine::Standard
        }
    }

    /// Polly can emit mp3 and ogg; anything else is rendered as mp3
    fn output_format(format: AudioFormat) -> (OutputFormat, AudioFormat) {
        match format {
            AudioFormat::Ogg => (OutputFormat::OggVorbis, AudioFormat::Ogg),
            _ => (OutputFormat::Mp3, AudioFormat::Mp3),
        }
    }

    /// Neural voices ignore the prosody pitch attribute, so it is only set on
    /// the standard engine
    fn build_ssml(text: &str, hints: &RenderHints, engine: &Engine) -> String {
        let pitch = if *engine == Engine::Standard {
            format!(r#" pitch="{:+}%""#, hints.pitch)
        } else {
            String::new()
        };

        format!(
            r#"<speak><prosody rate="{}%" volume="{:+}dB"{}>{}</prosody></speak>"#,
            100 + hints.rate.max(-80),
            hints.volume / 10,
            pitch,
            escape_xml(text)
        )
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(
        &self,
        ssml: String,
        voice_name: &str,
        engine: Engine,
        output_format: OutputFormat,
    ) -> Result<Vec<u8>, AdapterError> {
        tracing::debug!(
            voice = voice_name,
            engine = ?engine,
            output_format = ?output_format,
            ssml_length = ssml.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(ssml)
            .text_type(TextType::Ssml)
            .voice_id(VoiceId::from(voice_name))
            .output_format(output_format)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    voice = voice_name,
                    engine = ?engine,
                    "AWS Polly synthesize_speech failed"
                );
                AdapterError::Engine(format!("AWS Polly error: {}", e))
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            AdapterError::Engine(format!("Failed to read Polly audio stream: {}", e))
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn name(&self) -> &'static str {
        "polly"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &str,
        output: &Path,
    ) -> Result<AudioFormat, AdapterError> {
        let start_time = std::time::Instant::now();

        let voice_name = Self::select_voice(voice, request.wants_female_voice())
            .ok_or_else(|| AdapterError::UnsupportedVoice(voice.to_string()))?;
        let engine = Self::engine_for(voice_name, request.hints.quality);
        let (polly_format, produced_format) = Self::output_format(request.hints.format);

        // Split text into batches based on Polly's limitations
        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            voice = voice_name,
            engine = ?engine,
            batch_count = batches.len(),
            text_length = request.text.len(),
            "Starting AWS Polly synthesis"
        );

        let mut merged_audio = Vec::new();
        for batch in &batches {
            let ssml = Self::build_ssml(batch, &request.hints, &engine);
            let audio = self
                .call_polly(ssml, voice_name, engine.clone(), polly_format.clone())
                .await?;
            merged_audio.extend(audio);
        }

        tokio::fs::write(output, &merged_audio).await?;

        tracing::info!(
            provider = "polly",
            latency_ms = start_time.elapsed().as_millis(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(produced_format)
    }
}
