pub mod catalog;
pub mod error;
pub mod model;
pub mod service;
pub mod voice;

pub use error::TtsServiceError;
pub use model::{AudioFormat, Quality, RenderHints, SynthesisOutcome, SynthesisRequest};
pub use service::{DispatcherSettings, TtsService, TtsServiceApi};
pub use voice::{ResolutionStep, ResolvedVoice, VoiceKey, VoiceTable};
