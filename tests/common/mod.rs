/*!
 * Common test utilities for the cuedub test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use cuedub::orchestrator::{SessionContext, SpeechOrchestrator};
use cuedub::providers::mock::MockTranslator;
use cuedub::session::PlaybackSession;
use cuedub::speech::mock::MockSpeechEngine;

/// Two back-to-back cues, "Hi" then "Bye"
pub const HI_BYE_TRACK: &str = "WEBVTT

00:00:00.000 --> 00:00:02.000
Hi

00:00:02.000 --> 00:00:04.000
Bye
";

/// Install a test logger so `RUST_LOG=debug` shows library logs
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample cue track for testing
pub fn create_test_track(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "WEBVTT - sample

00:00:01.000 --> 00:00:04.000
This is a test cue.

00:00:05.000 --> 00:00:09.000 align:start
It spans
two lines.

00:10.000 --> 00:14.000
For testing purposes.
";
    create_test_file(dir, filename, content)
}

/// Session over `track` with mock collaborators the test can inspect
pub fn mock_session(
    track: &str,
    translator: &MockTranslator,
    engine: &MockSpeechEngine,
    translation_enabled: bool,
) -> Result<PlaybackSession> {
    init_logging();
    let orchestrator = SpeechOrchestrator::new(
        SessionContext::default(),
        Arc::new(translator.clone()),
        Arc::new(engine.clone()),
        translation_enabled,
    );
    let mut session = PlaybackSession::new(orchestrator);
    session.load_track_text(track)?;
    Ok(session)
}
