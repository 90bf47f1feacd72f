use axum::{
    body::Body,
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    domain::tts::{
        AudioFormat, Quality, RenderHints, SynthesisOutcome, SynthesisRequest, TtsService,
        TtsServiceApi,
    },
    error::{AppError, AppResult},
};

const DEFAULT_LANGUAGE: &str = "hi";
const DEFAULT_VOICE_TYPE: &str = "female1";

/// Form body for POST /convert. Everything arrives as text so that bad
/// values produce our own 400 messages instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertForm {
    pub text: Option<String>,
    pub language: Option<String>,
    pub voice_type: Option<String>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub volume: Option<String>,
    pub style: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
    pub response_type: Option<String>,
}

/// Request for POST /preview-voice
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_voice_type")]
    pub voice_type: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_voice_type() -> String {
    DEFAULT_VOICE_TYPE.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub audio_data: String,
    pub filename: String,
    pub method: String,
    pub voice_used: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub success: bool,
    pub audio_data: String,
    pub method: String,
    pub voice_used: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    Json,
    File,
}

impl FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "json" => Ok(ResponseType::Json),
            "file" => Ok(ResponseType::File),
            other => Err(format!("Unsupported response_type: {}", other)),
        }
    }
}

fn non_blank(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ConvertForm {
    /// Split the form into a synthesis request and the requested response mode
    pub fn into_request(self) -> Result<(SynthesisRequest, ResponseType), String> {
        let signed = |raw: Option<&String>, field: &str| match raw {
            Some(raw) => RenderHints::parse_signed(raw, field),
            None => Ok(0),
        };

        let hints = RenderHints {
            rate: signed(self.rate.as_ref(), "rate")?,
            pitch: signed(self.pitch.as_ref(), "pitch")?,
            volume: signed(self.volume.as_ref(), "volume")?,
            style: RenderHints::normalize_style(self.style.as_deref()),
            format: AudioFormat::from_str(self.format.as_deref().unwrap_or_default())?,
            quality: Quality::from_str(self.quality.as_deref().unwrap_or_default())?,
        };
        let response_type = ResponseType::from_str(self.response_type.as_deref().unwrap_or_default())?;

        let request = SynthesisRequest::new(
            self.text.unwrap_or_default(),
            non_blank(self.language, DEFAULT_LANGUAGE),
            non_blank(self.voice_type, DEFAULT_VOICE_TYPE),
        )
        .with_hints(hints);

        Ok((request, response_type))
    }
}

fn data_uri(outcome: &SynthesisOutcome) -> String {
    format!(
        "data:audio/{};base64,{}",
        outcome.format.data_uri_subtype(),
        STANDARD.encode(&outcome.audio_data)
    )
}

fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

fn file_response(outcome: SynthesisOutcome) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(outcome.format.mime_type()),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("attachment; filename=\"{}\"", outcome.filename())),
    );
    headers.insert("X-Synthesis-Method", header_value(&outcome.method));
    headers.insert("X-Voice-Used", header_value(&outcome.voice_used));

    (StatusCode::OK, headers, Body::from(outcome.audio_data)).into_response()
}

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    pub fn engine_names(&self) -> Vec<&'static str> {
        self.tts_service.engine_names()
    }

    /// POST /convert - Convert text to speech
    pub async fn convert(
        State(controller): State<Arc<TtsController>>,
        form: Result<Form<ConvertForm>, FormRejection>,
    ) -> AppResult<Response> {
        let Form(form) = form?;
        let (request, response_type) = form.into_request().map_err(AppError::BadRequest)?;

        let outcome = controller.tts_service.convert(request).await?;

        tracing::info!(
            method = %outcome.method,
            voice = %outcome.voice_used,
            audio_size_bytes = outcome.audio_data.len(),
            response_type = ?response_type,
            "Conversion completed"
        );

        match response_type {
            ResponseType::File => Ok(file_response(outcome)),
            ResponseType::Json => Ok(Json(ConvertResponse {
                success: true,
                audio_data: data_uri(&outcome),
                filename: outcome.filename(),
                method: outcome.method,
                voice_used: outcome.voice_used,
            })
            .into_response()),
        }
    }

    /// POST /preview-voice - Short sample of a voice
    pub async fn preview(
        State(controller): State<Arc<TtsController>>,
        request: Result<Json<PreviewRequest>, JsonRejection>,
    ) -> AppResult<Json<PreviewResponse>> {
        let Json(request) = request?;
        let outcome = controller
            .tts_service
            .preview(&request.language, &request.voice_type)
            .await?;

        Ok(Json(PreviewResponse {
            success: true,
            audio_data: data_uri(&outcome),
            method: outcome.method,
            voice_used: outcome.voice_used,
        }))
    }
}
