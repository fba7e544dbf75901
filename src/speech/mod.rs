/*!
 * Speech synthesis engines.
 *
 * An engine accepts one utterance at a time from the orchestrator and
 * reports its outcome exactly once through an `UtteranceHandle`:
 * - `command`: a local synthesizer process (espeak-ng by default)
 * - `log_engine`: logs the text and waits for an estimated duration
 * - `mock`: scripted engine for tests
 */

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::app_config::{SpeechConfig, SpeechEngineKind};
use crate::errors::SpeechError;
use crate::language_utils;

/// One synthesis request
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Engine voice name; `None` lets the engine pick from `language`
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Language tag of `text`, e.g. `pt-BR`
    pub language: String,
}

/// A voice offered by an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// Language tag the voice speaks
    pub language: String,
}

/// Receiving side of an utterance outcome
#[derive(Debug)]
pub struct UtteranceHandle {
    rx: oneshot::Receiver<Result<(), SpeechError>>,
}

/// Sending side of an utterance outcome; consumed on use
#[derive(Debug)]
pub struct UtteranceCompleter {
    tx: oneshot::Sender<Result<(), SpeechError>>,
}

impl UtteranceHandle {
    pub fn channel() -> (UtteranceCompleter, UtteranceHandle) {
        let (tx, rx) = oneshot::channel();
        (UtteranceCompleter { tx }, UtteranceHandle { rx })
    }

    /// Handle that is already resolved with `result`
    pub fn ready(result: Result<(), SpeechError>) -> Self {
        let (completer, handle) = Self::channel();
        completer.complete(result);
        handle
    }

    /// Wait for the utterance to end, fail or be cancelled
    pub async fn finished(self) -> Result<(), SpeechError> {
        self.rx.await.unwrap_or(Err(SpeechError::Interrupted))
    }
}

impl UtteranceCompleter {
    pub fn complete(self, result: Result<(), SpeechError>) {
        let _ = self.tx.send(result);
    }
}

/// Common trait for all speech engines
#[async_trait]
pub trait SpeechEngine: Send + Sync + Debug {
    /// Stop every utterance in progress. Idempotent and immediate.
    fn cancel_all(&self);

    /// Start speaking; the handle resolves once the utterance is over
    fn speak(&self, utterance: Utterance) -> UtteranceHandle;

    /// Voices this engine can use
    async fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
        Ok(Vec::new())
    }
}

/// Cancellation token shared by every utterance started since the last
/// `cancel_all`
#[derive(Debug, Default)]
pub struct CancelScope {
    current: Mutex<CancellationToken>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a new utterance
    pub fn token(&self) -> CancellationToken {
        self.current.lock().clone()
    }

    /// Cancel every outstanding token and start a fresh scope
    pub fn cancel_all(&self) {
        let mut current = self.current.lock();
        current.cancel();
        *current = CancellationToken::new();
    }
}

/// Voices matching the target language, or all voices when none match.
///
/// A voice matches when its language starts with the target's primary
/// subtag or its name mentions it.
pub fn voices_for_language<'a>(voices: &'a [Voice], target_language: &str) -> Vec<&'a Voice> {
    let primary = language_utils::primary_subtag(target_language).to_lowercase();

    let matching: Vec<&Voice> = voices
        .iter()
        .filter(|voice| {
            voice.language.to_lowercase().starts_with(&primary)
                || voice.name.to_lowercase().contains(&primary)
        })
        .collect();

    if matching.is_empty() {
        voices.iter().collect()
    } else {
        matching
    }
}

/// The voice named `preferred`, else the first available voice
pub fn resolve_voice<'a>(voices: &[&'a Voice], preferred: Option<&str>) -> Option<&'a Voice> {
    preferred
        .and_then(|name| voices.iter().copied().find(|voice| voice.name == name))
        .or_else(|| voices.first().copied())
}

/// Ask `engine` for its voices and pick one for `target_language`.
///
/// Listing failures are logged and leave the choice to the engine.
pub async fn select_voice(
    engine: &dyn SpeechEngine,
    target_language: &str,
    preferred: Option<&str>,
) -> Option<Voice> {
    let voices = match engine.voices().await {
        Ok(voices) => voices,
        Err(e) => {
            warn!("Could not list voices: {}", e);
            return None;
        }
    };

    let candidates = voices_for_language(&voices, target_language);
    let chosen = resolve_voice(&candidates, preferred).cloned();
    match (&chosen, preferred) {
        (Some(voice), Some(name)) if voice.name != name => {
            warn!("Voice '{}' not available, using '{}'", name, voice.name)
        }
        (Some(voice), _) => debug!("Using voice '{}' ({})", voice.name, voice.language),
        (None, _) => debug!("No voices listed for {}", target_language),
    }
    chosen
}

/// Build the configured engine
pub fn from_config(config: &SpeechConfig) -> Arc<dyn SpeechEngine> {
    match config.engine {
        SpeechEngineKind::Command => Arc::new(command::CommandSpeechEngine::new(config.command.clone())),
        SpeechEngineKind::Log => Arc::new(log_engine::LogSpeechEngine::new()),
    }
}

pub mod command;
pub mod log_engine;
pub mod mock;
