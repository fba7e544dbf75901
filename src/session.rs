/*!
 * Playback session: the glue between the clock, the cue track and the
 * speech orchestrator.
 */

use std::path::Path;
use log::{debug, info};
use tokio::sync::mpsc;

use crate::clock::ClockEvent;
use crate::cue_index::CueIndex;
use crate::cue_track::{Cue, CueTrack};
use crate::errors::CueParseError;
use crate::timecode;
use crate::orchestrator::{OrchestratorEvent, SpeechOrchestrator};
use crate::transition::{Transition, TransitionDetector};

/// What the player shows right now
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDisplay {
    pub subtitle: String,
    pub translation: String,
}

pub struct PlaybackSession {
    index: CueIndex,
    detector: TransitionDetector,
    orchestrator: SpeechOrchestrator,
    playing: bool,
}

impl PlaybackSession {
    /// Session with an empty track
    pub fn new(orchestrator: SpeechOrchestrator) -> Self {
        Self::with_track(CueTrack::default(), orchestrator)
    }

    pub fn with_track(track: CueTrack, orchestrator: SpeechOrchestrator) -> Self {
        Self {
            index: CueIndex::new(track),
            detector: TransitionDetector::new(),
            orchestrator,
            playing: false,
        }
    }

    pub fn track(&self) -> &CueTrack {
        self.index.track()
    }

    pub fn orchestrator(&self) -> &SpeechOrchestrator {
        &self.orchestrator
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Replace the current track wholesale
    pub fn load_track(&mut self, track: CueTrack) {
        info!("Loaded cue track with {} cues", track.len());
        self.index = CueIndex::new(track);
        self.detector.reset();
        self.orchestrator.on_cue_cleared();
    }

    /// Parse and load a track; on error the current track stays
    pub fn load_track_text(&mut self, content: &str) -> Result<(), CueParseError> {
        let track = CueTrack::parse(content)?;
        self.load_track(track);
        Ok(())
    }

    /// Read, parse and load a track file; on error the current track stays
    pub fn load_track_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CueParseError> {
        let track = CueTrack::from_file(path)?;
        self.load_track(track);
        Ok(())
    }

    /// Cue active at `t` seconds
    pub fn cue_at(&self, t: f64) -> Option<&Cue> {
        self.index.lookup(t)
    }

    /// Clock moved to `t` seconds
    pub fn on_tick(&mut self, t: f64) -> Transition {
        let transition = self.detector.observe(self.index.lookup(t));

        match &transition {
            Transition::Entered(text) => {
                info!("💬 [{}] {}", timecode::format(t), text);
                self.orchestrator.on_transition(text);
            }
            Transition::Cleared => {
                debug!("{:.3}s: cleared", t);
                self.orchestrator.on_cue_cleared();
            }
            Transition::Unchanged => {}
        }

        transition
    }

    pub fn on_pause(&mut self) {
        info!("⏸ Paused");
        self.playing = false;
        self.orchestrator.on_pause();
    }

    pub fn on_resume(&mut self) {
        info!("▶ Resumed");
        self.playing = true;
    }

    pub fn set_translation_enabled(&mut self, enabled: bool) {
        self.orchestrator.set_translation_enabled(enabled);
    }

    /// Stop speech and return the orchestrator to idle
    pub fn shutdown(&mut self) {
        self.playing = false;
        self.orchestrator.shutdown();
    }

    pub fn display(&self) -> SubtitleDisplay {
        let state = self.orchestrator.state();
        SubtitleDisplay {
            subtitle: state.active_cue_text.clone(),
            translation: state.active_translation.clone(),
        }
    }

    /// Wait for the next translate or speech completion
    pub async fn next_orchestrator_event(&mut self) -> Option<OrchestratorEvent> {
        self.orchestrator.next_event().await
    }

    pub fn handle_orchestrator_event(&mut self, event: OrchestratorEvent) {
        self.orchestrator.handle_event(event);
    }

    /// Apply one clock event; returns false once playback has ended
    pub fn handle_clock_event(&mut self, event: ClockEvent) -> bool {
        match event {
            ClockEvent::Tick(t) => {
                self.playing = true;
                self.on_tick(t);
            }
            ClockEvent::Paused => self.on_pause(),
            ClockEvent::Resumed => self.on_resume(),
            ClockEvent::Ended => {
                info!("⏹ Playback ended");
                self.playing = false;
                return false;
            }
        }
        true
    }

    /// Process clock events and orchestrator completions in arrival order
    /// until playback ends, then let the cycle in flight finish.
    pub async fn run(&mut self, mut clock: mpsc::Receiver<ClockEvent>) {
        loop {
            tokio::select! {
                event = clock.recv() => match event {
                    Some(event) => {
                        if !self.handle_clock_event(event) {
                            break;
                        }
                    }
                    None => {
                        debug!("Clock closed");
                        break;
                    }
                },
                Some(event) = self.orchestrator.next_event() => {
                    self.handle_orchestrator_event(event);
                }
            }
        }

        while self.orchestrator.is_busy() {
            match self.orchestrator.next_event().await {
                Some(event) => self.handle_orchestrator_event(event),
                None => break,
            }
        }
    }
}
