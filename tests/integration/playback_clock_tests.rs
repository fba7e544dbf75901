/*!
 * Integration tests driving a session with the simulated playback clock
 */

use std::time::Duration;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

use cuedub::clock::{self, ClockOptions, PausePoint};
use cuedub::providers::mock::MockTranslator;
use cuedub::speech::mock::{MockSpeechCall, MockSpeechEngine};
use crate::common;

/// Cues a few ticks long so a run takes well under a second
const SHORT_TRACK: &str = "WEBVTT

00:00:00.000 --> 00:00:00.040
Hi

00:00:00.060 --> 00:00:00.100
Bye
";

/// One cue covering the whole run
const SINGLE_CUE_TRACK: &str = "WEBVTT

00:00:00.000 --> 00:00:00.100
Hi
";

fn options(duration: f64) -> ClockOptions {
    ClockOptions::new(duration, Duration::from_millis(5))
}

#[tokio::test]
async fn test_run_withSimulatedClock_shouldTranslateFirstCueAndFinishIdle() -> Result<()> {
    let translator = MockTranslator::working();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(SHORT_TRACK, &translator, &engine, true)?;

    let events = clock::spawn_clock(options(session.track().duration()), CancellationToken::new());
    tokio::time::timeout(Duration::from_secs(5), session.run(events)).await?;

    let requests = translator.requests();
    assert!(!requests.is_empty());
    assert_eq!(requests[0].text, "Hi");
    assert!(!session.orchestrator().is_busy());
    assert!(!session.is_playing());
    Ok(())
}

#[tokio::test]
async fn test_run_withPausePoint_shouldCancelSpeech() -> Result<()> {
    let translator = MockTranslator::working();
    let engine = MockSpeechEngine::manual();
    let mut session = common::mock_session(SINGLE_CUE_TRACK, &translator, &engine, true)?;

    let mut clock_options = options(session.track().duration());
    clock_options.pause_points = vec![PausePoint { at: 0.02, hold: Duration::from_millis(20) }];
    let events = clock::spawn_clock(clock_options, CancellationToken::new());

    tokio::time::timeout(Duration::from_secs(5), session.run(events)).await?;

    // The pause cancelled the pending "Hi" utterance
    assert_eq!(engine.pending_count(), 0);
    assert!(engine.cancel_count() >= 1);
    assert_eq!(translator.request_count(), 1);
    assert!(matches!(engine.calls().first(), Some(MockSpeechCall::Cancel)));
    assert!(!session.orchestrator().state().speaking);
    Ok(())
}

#[tokio::test]
async fn test_run_withCancelledClock_shouldReturnEarly() -> Result<()> {
    let translator = MockTranslator::working();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(SHORT_TRACK, &translator, &engine, false)?;

    let cancel = CancellationToken::new();
    let mut long = options(600.0);
    long.start_at = 0.05;
    let events = clock::spawn_clock(long, cancel.clone());
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), session.run(events)).await?;
    assert_eq!(translator.request_count(), 0);
    Ok(())
}
