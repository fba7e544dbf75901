/*!
 * Mock speech engine for testing.
 *
 * - `MockSpeechEngine::immediate()` - Every utterance ends right away
 * - `MockSpeechEngine::failing()` - Every utterance fails
 * - `MockSpeechEngine::manual()` - Utterances stay pending until finished or cancelled
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::errors::SpeechError;
use crate::speech::{SpeechEngine, Utterance, UtteranceCompleter, UtteranceHandle, Voice};

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockSpeechBehavior {
    Immediate,
    Failing,
    Manual,
}

/// Call recorded by the mock engine, in order
#[derive(Debug, Clone, PartialEq)]
pub enum MockSpeechCall {
    Cancel,
    Speak(Utterance),
}

#[derive(Debug, Default)]
struct MockSpeechState {
    calls: Vec<MockSpeechCall>,
    pending: Vec<UtteranceCompleter>,
}

#[derive(Debug, Clone)]
pub struct MockSpeechEngine {
    behavior: MockSpeechBehavior,
    state: Arc<Mutex<MockSpeechState>>,
    voices: Vec<Voice>,
}

impl MockSpeechEngine {
    pub fn new(behavior: MockSpeechBehavior) -> Self {
        Self {
            behavior,
            state: Arc::new(Mutex::new(MockSpeechState::default())),
            voices: Vec::new(),
        }
    }

    pub fn immediate() -> Self {
        Self::new(MockSpeechBehavior::Immediate)
    }

    pub fn failing() -> Self {
        Self::new(MockSpeechBehavior::Failing)
    }

    pub fn manual() -> Self {
        Self::new(MockSpeechBehavior::Manual)
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// End every pending utterance successfully
    pub fn finish_all(&self) {
        let pending = std::mem::take(&mut self.state.lock().pending);
        for completer in pending {
            completer.complete(Ok(()));
        }
    }

    /// Fail every pending utterance
    pub fn fail_all(&self, message: &str) {
        let pending = std::mem::take(&mut self.state.lock().pending);
        for completer in pending {
            completer.complete(Err(SpeechError::Synthesis(message.to_string())));
        }
    }

    pub fn calls(&self) -> Vec<MockSpeechCall> {
        self.state.lock().calls.clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, MockSpeechCall::Cancel))
            .count()
    }

    /// Texts of every utterance started so far
    pub fn spoken(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockSpeechCall::Speak(utterance) => Some(utterance.text.clone()),
                MockSpeechCall::Cancel => None,
            })
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }
}

#[async_trait]
impl SpeechEngine for MockSpeechEngine {
    fn cancel_all(&self) {
        let pending = {
            let mut state = self.state.lock();
            state.calls.push(MockSpeechCall::Cancel);
            std::mem::take(&mut state.pending)
        };
        for completer in pending {
            completer.complete(Err(SpeechError::Cancelled));
        }
    }

    fn speak(&self, utterance: Utterance) -> UtteranceHandle {
        let mut state = self.state.lock();
        state.calls.push(MockSpeechCall::Speak(utterance));

        match self.behavior {
            MockSpeechBehavior::Immediate => UtteranceHandle::ready(Ok(())),
            MockSpeechBehavior::Failing => {
                UtteranceHandle::ready(Err(SpeechError::Synthesis("Simulated failure".to_string())))
            }
            MockSpeechBehavior::Manual => {
                let (completer, handle) = UtteranceHandle::channel();
                state.pending.push(completer);
                handle
            }
        }
    }

    async fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
        Ok(self.voices.clone())
    }
}
