use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bounds applied to every signed rendering hint (rate, pitch, volume)
pub const HINT_MIN: i32 = -100;
pub const HINT_MAX: i32 = 100;

/// Output container of a synthesized artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Ogg => "audio/ogg",
        }
    }

    /// Subtype used in `data:audio/<fmt>;base64,` URIs
    pub fn data_uri_subtype(&self) -> &'static str {
        self.extension()
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "mp3" | "mpeg" => Ok(AudioFormat::Mp3),
            "wav" | "wave" => Ok(AudioFormat::Wav),
            "ogg" | "opus" => Ok(AudioFormat::Ogg),
            other => Err(format!("Unsupported format: {}", other)),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    High,
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "standard" | "normal" => Ok(Quality::Standard),
            "high" | "hd" | "neural" => Ok(Quality::High),
            other => Err(format!("Unsupported quality: {}", other)),
        }
    }
}

/// Engine-independent rendering hints. Each adapter translates (or ignores)
/// them according to its own capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RenderHints {
    /// Signed percent relative to the engine's normal speaking rate
    pub rate: i32,
    /// Signed offset in Hz
    pub pitch: i32,
    /// Signed percent relative to the engine's normal volume
    pub volume: i32,
    pub style: Option<String>,
    pub format: AudioFormat,
    pub quality: Quality,
}

impl RenderHints {
    /// Parse a signed hint such as `"10"`, `"+10"`, `"-5%"` or `"3Hz"`.
    /// Empty input means the engine default (0). Values are clamped.
    pub fn parse_signed(raw: &str, field: &str) -> Result<i32, String> {
        let trimmed = raw
            .trim()
            .trim_end_matches('%')
            .trim_end_matches("Hz")
            .trim_end_matches("hz")
            .trim();
        if trimmed.is_empty() {
            return Ok(0);
        }

        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| (v.round() as i64).clamp(HINT_MIN as i64, HINT_MAX as i64) as i32)
            .ok_or_else(|| format!("Invalid {}: {}", field, raw))
    }

    /// `general` (the UI's neutral style) and empty strings mean no style
    pub fn normalize_style(raw: Option<&str>) -> Option<String> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("general"))
            .map(|s| s.to_lowercase())
    }
}

/// A validated conversion request as seen by the dispatcher
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub language: String,
    pub voice_type: String,
    pub hints: RenderHints,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, language: impl Into<String>, voice_type: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            voice_type: voice_type.into(),
            hints: RenderHints::default(),
        }
    }

    pub fn with_hints(mut self, hints: RenderHints) -> Self {
        self.hints = hints;
        self
    }

    /// True when the caller asked for a female voice class
    pub fn wants_female_voice(&self) -> bool {
        let descriptor = self.voice_type.to_lowercase();
        descriptor.starts_with("female") || descriptor == "emotional"
    }
}

/// Successful result of a conversion
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub audio_data: Vec<u8>,
    /// Name of the adapter that produced the artifact
    pub method: String,
    pub voice_used: String,
    pub format: AudioFormat,
}

impl SynthesisOutcome {
    /// Suggested download name, timestamped at call time
    pub fn filename(&self) -> String {
        format!(
            "voice_{}.{}",
            chrono::Local::now().format("%Y%m%d_%H%M"),
            self.format.extension()
        )
    }
}
