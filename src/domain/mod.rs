pub mod tts;
pub mod usage;
