use super::tts_repository::{AdapterError, TtsRepository};
use crate::domain::tts::{AudioFormat, Quality, RenderHints, SynthesisRequest};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = "tts-relay";

/// Azure Speech neural voices over the REST endpoint.
///
/// Voice ids from the voice table (`hi-IN-SwaraNeural`, ...) are Azure short
/// names, so the resolved voice is used as-is.
pub struct AzureTtsRepository {
    client: Client,
    endpoint: String,
    subscription_key: String,
}

impl AzureTtsRepository {
    pub fn new(subscription_key: String, region: &str, timeout: Duration) -> Result<Self, AdapterError> {
        let endpoint = format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", region);
        Self::with_endpoint(subscription_key, endpoint, timeout)
    }

    pub fn with_endpoint(
        subscription_key: String,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            subscription_key,
        })
    }

    /// `X-Microsoft-OutputFormat` value for the requested format and quality
    fn output_format(format: AudioFormat, quality: Quality) -> &'static str {
        match (format, quality) {
            (AudioFormat::Mp3, Quality::Standard) => "audio-24khz-48kbitrate-mono-mp3",
            (AudioFormat::Mp3, Quality::High) => "audio-48khz-192kbitrate-mono-mp3",
            (AudioFormat::Wav, Quality::Standard) => "riff-24khz-16bit-mono-pcm",
            (AudioFormat::Wav, Quality::High) => "riff-48khz-16bit-mono-pcm",
            (AudioFormat::Ogg, Quality::Standard) => "ogg-24khz-16bit-mono-opus",
            (AudioFormat::Ogg, Quality::High) => "ogg-48khz-16bit-mono-opus",
        }
    }

    /// Locale prefix of a voice short name: `en-US-AriaNeural` -> `en-US`
    fn voice_locale(voice: &str) -> String {
        let parts: Vec<&str> = voice.splitn(3, '-').collect();
        match parts.as_slice() {
            [lang, region, _] => format!("{}-{}", lang, region),
            _ => "en-US".to_string(),
        }
    }

    fn build_ssml(text: &str, voice: &str, hints: &RenderHints) -> String {
        let prosody = format!(
            r#"<prosody rate="{:+}%" pitch="{:+}Hz" volume="{:+}%">{}</prosody>"#,
            hints.rate,
            hints.pitch,
            hints.volume,
            escape_xml(text)
        );

        let body = match &hints.style {
            Some(style) => format!(
                r#"<mstts:express-as style="{}">{}</mstts:express-as>"#,
                escape_xml(style),
                prosody
            ),
            None => prosody,
        };

        format!(
            r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="https://www.w3.org/2001/mstts" xml:lang="{}"><voice name="{}">{}</voice></speak>"#,
            Self::voice_locale(voice),
            escape_xml(voice),
            body
        )
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl TtsRepository for AzureTtsRepository {
    fn name(&self) -> &'static str {
        "azure"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        voice: &str,
        output: &Path,
    ) -> Result<AudioFormat, AdapterError> {
        let start_time = std::time::Instant::now();
        let hints = &request.hints;
        let ssml = Self::build_ssml(&request.text, voice, hints);
        let output_format = Self::output_format(hints.format, hints.quality);

        tracing::info!(
            voice = voice,
            rate = hints.rate,
            pitch = hints.pitch,
            style = ?hints.style,
            output_format = output_format,
            text_length = request.text.len(),
            "Calling Azure Speech synthesis"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", output_format)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .body(ssml)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        tokio::fs::write(output, &audio).await?;

        tracing::info!(
            provider = "azure",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(hints.format)
    }
}
