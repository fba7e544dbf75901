use std::process::Stdio;
use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::errors::SpeechError;
use crate::speech::{CancelScope, SpeechEngine, Utterance, UtteranceHandle, Voice};

// @const: One row of `espeak-ng --voices`: priority, language, age/gender, name, file
static VOICE_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\s+(\S+)\s+\S+\s+(\S+)\s+\S+").unwrap()
});

/// Words per minute at rate 1.0
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speech engine backed by a local synthesizer process.
///
/// Each utterance is one process; the text is passed on stdin. Cancelling
/// kills every process started since the previous cancel.
#[derive(Debug)]
pub struct CommandSpeechEngine {
    program: String,
    scope: CancelScope,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            scope: CancelScope::new(),
        }
    }

    /// Command-line flags for one utterance
    pub fn args_for(utterance: &Utterance) -> Vec<String> {
        let words_per_minute = (BASE_WORDS_PER_MINUTE * utterance.rate).round().clamp(80.0, 500.0);
        let pitch = (50.0 * utterance.pitch).round().clamp(0.0, 99.0);
        let amplitude = (100.0 * utterance.volume).round().clamp(0.0, 200.0);
        let voice = utterance
            .voice
            .clone()
            .unwrap_or_else(|| utterance.language.to_lowercase());

        vec![
            "-v".to_string(),
            voice,
            "-s".to_string(),
            format!("{}", words_per_minute as u32),
            "-p".to_string(),
            format!("{}", pitch as u32),
            "-a".to_string(),
            format!("{}", amplitude as u32),
            "--stdin".to_string(),
        ]
    }

    /// Parse the voice table printed by `--voices`
    pub fn parse_voice_list(output: &str) -> Vec<Voice> {
        output
            .lines()
            .skip(1)
            .filter_map(|line| VOICE_LINE_REGEX.captures(line))
            .map(|caps| Voice {
                name: caps[2].to_string(),
                language: caps[1].to_string(),
            })
            .collect()
    }

    async fn run(
        program: String,
        args: Vec<String>,
        text: String,
        token: CancellationToken,
    ) -> Result<(), SpeechError> {
        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Synthesis(format!("failed to start {}: {}", program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SpeechError::Synthesis(format!("failed to write to {}: {}", program, e)))?;
        }

        tokio::select! {
            status = child.wait() => {
                let status = status
                    .map_err(|e| SpeechError::Synthesis(format!("{} failed: {}", program, e)))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(SpeechError::Synthesis(format!("{} exited with {}", program, status)))
                }
            }
            _ = token.cancelled() => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to stop {}: {}", program, e);
                }
                Err(SpeechError::Cancelled)
            }
        }
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    fn cancel_all(&self) {
        self.scope.cancel_all();
    }

    fn speak(&self, utterance: Utterance) -> UtteranceHandle {
        let (completer, handle) = UtteranceHandle::channel();
        let token = self.scope.token();
        let args = Self::args_for(&utterance);
        let program = self.program.clone();

        debug!("Speaking with {} {:?}", program, args);
        tokio::spawn(async move {
            let result = Self::run(program, args, utterance.text, token).await;
            completer.complete(result);
        });

        handle
    }

    async fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .output()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("failed to start {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(SpeechError::Synthesis(format!(
                "{} --voices exited with {}",
                self.program, output.status
            )));
        }

        Ok(Self::parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }
}
