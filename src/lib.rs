/*!
 * # cuedub - spoken translations for timed subtitles
 *
 * A Rust library that follows a media clock through a cue track and, for
 * every newly displayed cue, translates its text and speaks the result.
 *
 * ## Features
 *
 * - Parse WebVTT-style cue tracks (`HH:MM:SS.mmm` or `MM:SS.mmm` timings)
 * - Find the active cue for any playback position
 * - Detect cue changes on every clock tick
 * - Translate then speak each new cue, one cycle at a time:
 *   - Google translate endpoint
 *   - Local synthesizer command (espeak-ng) or log output
 * - Pause and translation toggle cancel speech immediately
 * - ISO 639 language tag support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Timestamp parsing and formatting
 * - `cue_track`: Cue and track types and the track parser
 * - `cue_index`: Active cue lookup
 * - `transition`: Cue change detection
 * - `orchestrator`: Translate-then-speak state machine
 * - `providers`: Translation clients:
 *   - `providers::google`: Google translate client
 *   - `providers::mock`: Scripted translator for tests
 * - `speech`: Speech engines:
 *   - `speech::command`: Local synthesizer process
 *   - `speech::log_engine`: Logs utterances instead of speaking
 *   - `speech::mock`: Scripted engine for tests
 * - `clock`: Simulated playback clock
 * - `session`: Playback session wiring clock, track and orchestrator
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod timecode;
pub mod cue_track;
pub mod cue_index;
pub mod transition;
pub mod orchestrator;
pub mod providers;
pub mod speech;
pub mod clock;
pub mod session;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use cue_track::{Cue, CueTrack};
pub use cue_index::CueIndex;
pub use transition::{Transition, TransitionDetector};
pub use orchestrator::{OrchestratorState, SessionContext, SpeechOrchestrator};
pub use session::{PlaybackSession, SubtitleDisplay};
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{CueParseError, FormatError, ProviderError, SpeechError, TranslationError};
