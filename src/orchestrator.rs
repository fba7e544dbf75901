/*!
 * Translate-then-speak state machine driven by cue transitions.
 *
 * At most one cycle (translation followed by one utterance) is in flight.
 * Transitions arriving while a cycle runs are dropped, not queued. Every
 * cycle gets a new epoch; completions report the epoch they belong to and
 * are discarded unless it matches the cycle currently running. A cycle also
 * remembers the cue activation it was started for: once another cue shows
 * up or the cue is cleared, its translation is discarded and the
 * orchestrator returns to idle.
 *
 * Completions come back as `OrchestratorEvent`s on a channel owned by the
 * orchestrator. The session loop feeds them to `handle_event` on the same
 * task that delivers clock events, so handlers never run concurrently.
 */

use std::sync::Arc;
use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::app_config::Config;
use crate::errors::{SpeechError, TranslationError};
use crate::providers::Translator;
use crate::speech::{SpeechEngine, Utterance};

/// Settings the orchestrator reads for every cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub source_language: String,
    pub target_language: String,
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl SessionContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            voice: config.speech.voice.clone(),
            rate: config.speech.rate,
            pitch: config.speech.pitch,
            volume: config.speech.volume,
        }
    }

    fn utterance(&self, text: &str) -> Utterance {
        Utterance {
            text: text.to_string(),
            voice: self.voice.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
            language: self.target_language.clone(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Translating { epoch: u64 },
    Speaking { epoch: u64 },
}

/// Observable orchestrator state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorState {
    /// Text of the cue currently displayed, empty when none
    pub active_cue_text: String,
    /// Translation currently displayed, empty when none
    pub active_translation: String,
    /// True from the moment a cycle is accepted until it returns to idle
    pub speaking: bool,
    pub translation_enabled: bool,
}

/// Completion of an asynchronous step, tagged with its cycle's epoch
#[derive(Debug)]
pub enum OrchestratorEvent {
    Translated {
        epoch: u64,
        result: Result<String, TranslationError>,
    },
    UtteranceFinished {
        epoch: u64,
        result: Result<(), SpeechError>,
    },
}

pub struct SpeechOrchestrator {
    context: SessionContext,
    translator: Arc<dyn Translator>,
    engine: Arc<dyn SpeechEngine>,
    state: OrchestratorState,
    phase: Phase,
    /// Epoch of the most recently started cycle
    epoch: u64,
    /// Bumped whenever the displayed cue changes or is cleared
    activation: u64,
    /// Activation the running cycle was started for
    cycle_activation: u64,
    events_tx: mpsc::UnboundedSender<OrchestratorEvent>,
    events_rx: mpsc::UnboundedReceiver<OrchestratorEvent>,
}

impl SpeechOrchestrator {
    pub fn new(
        context: SessionContext,
        translator: Arc<dyn Translator>,
        engine: Arc<dyn SpeechEngine>,
        translation_enabled: bool,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            context,
            translator,
            engine,
            state: OrchestratorState {
                translation_enabled,
                ..OrchestratorState::default()
            },
            phase: Phase::Idle,
            epoch: 0,
            activation: 0,
            cycle_activation: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// A cue with new text became active.
    ///
    /// Returns whether a cycle was started for it.
    pub fn on_transition(&mut self, text: &str) -> bool {
        self.activation += 1;
        self.state.active_cue_text = text.to_string();

        if !self.state.translation_enabled {
            return false;
        }
        if text.is_empty() {
            debug!("Skipping empty cue");
            return false;
        }
        if self.is_busy() {
            debug!("Busy ({:?}), dropping cue: {}", self.phase, text);
            return false;
        }

        self.start_cycle(text.to_string());
        true
    }

    /// No cue is active anymore. A translation still in flight is discarded
    /// when it arrives; an utterance already playing keeps going.
    pub fn on_cue_cleared(&mut self) {
        self.activation += 1;
        self.state.active_cue_text.clear();
        self.state.active_translation.clear();
    }

    /// Playback paused: stop speaking immediately, whatever the phase
    pub fn on_pause(&mut self) {
        self.engine.cancel_all();
        if self.is_busy() {
            debug!("Paused during {:?}", self.phase);
        }
        self.enter_idle();
    }

    pub fn set_translation_enabled(&mut self, enabled: bool) {
        if enabled == self.state.translation_enabled {
            return;
        }
        self.state.translation_enabled = enabled;

        if enabled {
            info!("Translation enabled");
            let text = self.state.active_cue_text.clone();
            if !text.is_empty() {
                self.on_transition(&text);
            }
        } else {
            info!("Translation disabled");
            self.state.active_translation.clear();
            self.engine.cancel_all();
            self.enter_idle();
        }
    }

    /// Apply the completion of an asynchronous step
    pub fn handle_event(&mut self, event: OrchestratorEvent) {
        match event {
            OrchestratorEvent::Translated { epoch, result } => {
                if self.phase != (Phase::Translating { epoch }) {
                    debug!("Discarding stale translation from cycle {}", epoch);
                    return;
                }
                if self.cycle_activation != self.activation {
                    debug!("Cue changed during cycle {}, discarding its translation", epoch);
                    self.enter_idle();
                    return;
                }
                match result {
                    Ok(translation) => self.speak(epoch, translation),
                    Err(e) => {
                        warn!("Translation failed: {}", e);
                        self.enter_idle();
                    }
                }
            }
            OrchestratorEvent::UtteranceFinished { epoch, result } => {
                if self.phase != (Phase::Speaking { epoch }) {
                    debug!("Discarding stale utterance outcome from cycle {}", epoch);
                    return;
                }
                match result {
                    Ok(()) => debug!("Utterance {} finished", epoch),
                    Err(SpeechError::Cancelled) => debug!("Utterance {} cancelled", epoch),
                    Err(e) => warn!("Speech synthesis failed: {}", e),
                }
                self.enter_idle();
            }
        }
    }

    /// Wait for the next completion
    pub async fn next_event(&mut self) -> Option<OrchestratorEvent> {
        self.events_rx.recv().await
    }

    /// Stop any speech and return to idle
    pub fn shutdown(&mut self) {
        self.engine.cancel_all();
        self.enter_idle();
    }

    fn start_cycle(&mut self, text: String) {
        self.epoch += 1;
        let epoch = self.epoch;
        self.phase = Phase::Translating { epoch };
        self.cycle_activation = self.activation;
        self.state.speaking = true;

        let translator = Arc::clone(&self.translator);
        let source = self.context.source_language.clone();
        let target = self.context.target_language.clone();
        let events = self.events_tx.clone();

        debug!("Cycle {}: translating '{}' ({} -> {})", epoch, text, source, target);
        tokio::spawn(async move {
            let result = translator.translate(&text, &source, &target).await;
            let _ = events.send(OrchestratorEvent::Translated { epoch, result });
        });
    }

    fn speak(&mut self, epoch: u64, translation: String) {
        self.state.active_translation = translation.clone();
        if translation.is_empty() {
            debug!("Cycle {}: empty translation, nothing to speak", epoch);
            self.enter_idle();
            return;
        }
        info!("🌐 {}", translation);

        // The engine has no queue of its own
        self.engine.cancel_all();
        let handle = self.engine.speak(self.context.utterance(&translation));
        self.phase = Phase::Speaking { epoch };

        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = handle.finished().await;
            let _ = events.send(OrchestratorEvent::UtteranceFinished { epoch, result });
        });
    }

    fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
        self.state.speaking = false;
    }
}
