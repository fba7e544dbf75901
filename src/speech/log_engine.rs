use std::time::Duration;
use async_trait::async_trait;
use log::info;

use crate::errors::SpeechError;
use crate::speech::{CancelScope, SpeechEngine, Utterance, UtteranceHandle};

/// Characters spoken per second at rate 1.0
const CHARS_PER_SECOND: f32 = 15.0;

/// Shortest simulated utterance
const MIN_UTTERANCE_MS: u64 = 300;

/// Engine that writes utterances to the log instead of an audio device.
///
/// Each utterance lasts as long as it would take to read aloud, so the
/// orchestrator sees the same busy windows as with a real synthesizer.
#[derive(Debug, Default)]
pub struct LogSpeechEngine {
    scope: CancelScope,
}

impl LogSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated speaking time for an utterance
    pub fn estimated_duration(utterance: &Utterance) -> Duration {
        let rate = utterance.rate.max(0.1);
        let seconds = utterance.text.chars().count() as f32 / (CHARS_PER_SECOND * rate);
        Duration::from_millis(((seconds * 1000.0) as u64).max(MIN_UTTERANCE_MS))
    }
}

#[async_trait]
impl SpeechEngine for LogSpeechEngine {
    fn cancel_all(&self) {
        self.scope.cancel_all();
    }

    fn speak(&self, utterance: Utterance) -> UtteranceHandle {
        let (completer, handle) = UtteranceHandle::channel();
        let token = self.scope.token();
        let duration = Self::estimated_duration(&utterance);

        info!(
            "🔊 [{}] {}",
            utterance.voice.as_deref().unwrap_or(&utterance.language),
            utterance.text
        );

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = tokio::time::sleep(duration) => Ok(()),
                _ = token.cancelled() => Err(SpeechError::Cancelled),
            };
            completer.complete(result);
        });

        handle
    }
}
