use super::tts_repository::{AdapterError, TtsRepository};
use crate::domain::tts::{AudioFormat, RenderHints, SynthesisRequest};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const BINARY_NAME: &str = "espeak-ng";

/// espeak-ng defaults: 175 words per minute, pitch 50, amplitude 100
const BASE_WPM: i32 = 175;
const BASE_PITCH: i32 = 50;
const BASE_AMPLITUDE: i32 = 100;

/// Fully offline last-resort engine driving the `espeak-ng` binary.
/// Always produces WAV.
pub struct EspeakTtsRepository {
    binary: PathBuf,
}

impl EspeakTtsRepository {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Find the binary at `explicit` or on `PATH`
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return path.is_file().then(|| path.to_path_buf());
        }

        std::env::var_os("PATH").and_then(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join(BINARY_NAME))
                .find(|candidate| candidate.is_file())
        })
    }

    /// espeak voice name for a request, e.g. `hi+f3`, `en-gb`
    fn voice_for(request: &SynthesisRequest) -> String {
        let language = request.language.to_lowercase();
        let base = match language.as_str() {
            "en" | "en-us" => "en-us".to_string(),
            "en-uk" | "en-gb" => "en-gb".to_string(),
            other => other
                .split(['-', '_'])
                .next()
                .filter(|p| !p.is_empty())
                .unwrap_or("en")
                .to_string(),
        };

        if request.wants_female_voice() {
            format!("{}+f3", base)
        } else {
            base
        }
    }

    /// (words per minute, pitch 0-99, amplitude 0-200)
    fn prosody_args(hints: &RenderHints) -> (i32, i32, i32) {
        let speed = (BASE_WPM * (100 + hints.rate) / 100).clamp(80, 450);
        let pitch = (BASE_PITCH + hints.pitch / 2).clamp(0, 99);
        let amplitude = (BASE_AMPLITUDE * (100 + hints.volume) / 100).clamp(0, 200);
        (speed, pitch, amplitude)
    }
}

#[async_trait]
impl TtsRepository for EspeakTtsRepository {
    fn name(&self) -> &'static str {
        "espeak"
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        _voice: &str,
        output: &Path,
    ) -> Result<AudioFormat, AdapterError> {
        let voice = Self::voice_for(request);
        let (speed, pitch, amplitude) = Self::prosody_args(&request.hints);

        tracing::info!(
            voice = %voice,
            speed = speed,
            pitch = pitch,
            amplitude = amplitude,
            text_length = request.text.len(),
            "Starting espeak-ng synthesis"
        );

        // kill_on_drop: a timed-out attempt drops this future and the child
        let mut child = Command::new(&self.binary)
            .arg("-v")
            .arg(&voice)
            .arg("-s")
            .arg(speed.to_string())
            .arg("-p")
            .arg(pitch.to_string())
            .arg("-a")
            .arg(amplitude.to_string())
            .arg("-w")
            .arg(output)
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(request.text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let result = child.wait_with_output().await?;
        if !result.status.success() {
            let err_msg = String::from_utf8_lossy(&result.stderr);
            return Err(AdapterError::Process(format!(
                "espeak-ng exited with {}: {}",
                result.status,
                err_msg.trim()
            )));
        }

        Ok(AudioFormat::Wav)
    }
}
