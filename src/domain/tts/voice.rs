use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Reserved language/descriptor value of the global default entry
pub const DEFAULT_KEY: &str = "default";

/// Descriptor tried for a language when the requested one is unknown
pub const DEFAULT_DESCRIPTOR: &str = "female1";

pub const DEFAULT_VOICE: &str = "en-US-AriaNeural";

const DESCRIPTOR_SEPARATORS: &[char] = &['-', '_', ' '];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceKey {
    pub language: String,
    pub descriptor: String,
}

impl VoiceKey {
    pub fn new(language: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn global_default() -> Self {
        Self::new(DEFAULT_KEY, DEFAULT_KEY)
    }
}

/// Which fallback step produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    Exact,
    SeparatorsRemoved,
    DescriptorPrefix,
    LanguageDefault,
    GlobalDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVoice {
    pub voice_id: String,
    pub step: ResolutionStep,
}

/// Entry format of an external voice table file
#[derive(Debug, Deserialize)]
struct VoiceTableEntry {
    language: String,
    descriptor: String,
    voice: String,
}

#[derive(Debug, thiserror::Error)]
pub enum VoiceTableError {
    #[error("failed to read voice table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid voice table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable (language, descriptor) -> engine voice id lookup.
/// Always holds the reserved global default entry.
#[derive(Debug, Clone)]
pub struct VoiceTable {
    voices: HashMap<VoiceKey, String>,
}

impl VoiceTable {
    pub fn new<I>(entries: I, default_voice: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (VoiceKey, String)>,
    {
        let mut voices: HashMap<VoiceKey, String> = entries.into_iter().collect();
        let default_voice = default_voice.into();
        voices
            .entry(VoiceKey::global_default())
            .or_insert(default_voice);
        Self { voices }
    }

    /// Voices shipped with the service
    pub fn builtin() -> Self {
        const ENTRIES: &[(&str, &str, &str)] = &[
            // Hindi
            ("hi", "male1", "hi-IN-MadhurNeural"),
            ("hi", "male2", "hi-IN-MadhurNeural"),
            ("hi", "female1", "hi-IN-SwaraNeural"),
            ("hi", "female2", "hi-IN-NeerjaNeural"),
            ("hi", "emotional", "hi-IN-NeerjaNeural"),
            // English US
            ("en", "male1", "en-US-GuyNeural"),
            ("en", "male2", "en-US-DavisNeural"),
            ("en", "female1", "en-US-AriaNeural"),
            ("en", "female2", "en-US-JennyNeural"),
            // English UK
            ("en-uk", "female1", "en-GB-SoniaNeural"),
            // Punjabi
            ("pa", "male1", "pa-IN-GurpreetNeural"),
            // Mostly female-only Indic voices
            ("ur", "female1", "ur-PK-GulNeural"),
            ("bn", "female1", "bn-IN-TanishaaNeural"),
            ("te", "female1", "te-IN-ShrutiNeural"),
            ("ta", "female1", "ta-IN-PallaviNeural"),
        ];

        Self::new(
            ENTRIES
                .iter()
                .map(|(lang, desc, voice)| (VoiceKey::new(*lang, *desc), voice.to_string())),
            DEFAULT_VOICE,
        )
    }

    /// Load a table from a JSON array of `{language, descriptor, voice}`
    pub fn from_json_file(path: &Path) -> Result<Self, VoiceTableError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<VoiceTableEntry> = serde_json::from_str(&raw)?;

        Ok(Self::new(
            entries
                .into_iter()
                .map(|e| (VoiceKey::new(e.language, e.descriptor), e.voice)),
            DEFAULT_VOICE,
        ))
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    fn lookup(&self, language: &str, descriptor: &str) -> Option<&String> {
        self.voices.get(&VoiceKey::new(language, descriptor))
    }

    pub fn global_default(&self) -> &str {
        self.voices
            .get(&VoiceKey::global_default())
            .map(String::as_str)
            .unwrap_or(DEFAULT_VOICE)
    }

    /// Resolve a requested voice, degrading to the nearest available entry.
    /// Never fails.
    pub fn resolve(&self, language: &str, descriptor: &str) -> ResolvedVoice {
        let found = |voice_id: &String, step| ResolvedVoice {
            voice_id: voice_id.clone(),
            step,
        };

        if let Some(voice) = self.lookup(language, descriptor) {
            return found(voice, ResolutionStep::Exact);
        }

        if descriptor.contains(DESCRIPTOR_SEPARATORS) {
            let joined: String = descriptor
                .chars()
                .filter(|c| !DESCRIPTOR_SEPARATORS.contains(c))
                .collect();
            if let Some(voice) = self.lookup(language, &joined) {
                return found(voice, ResolutionStep::SeparatorsRemoved);
            }

            let prefix = descriptor
                .split(DESCRIPTOR_SEPARATORS)
                .next()
                .unwrap_or_default();
            if let Some(voice) = self.lookup(language, prefix) {
                return found(voice, ResolutionStep::DescriptorPrefix);
            }
        }

        if let Some(voice) = self.lookup(language, DEFAULT_DESCRIPTOR) {
            return found(voice, ResolutionStep::LanguageDefault);
        }

        ResolvedVoice {
            voice_id: self.global_default().to_string(),
            step: ResolutionStep::GlobalDefault,
        }
    }
}

impl Default for VoiceTable {
    fn default() -> Self {
        Self::builtin()
    }
}
