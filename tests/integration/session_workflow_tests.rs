/*!
 * Integration tests for the playback session workflow
 */

use std::time::Duration;
use anyhow::Result;
use tokio::sync::mpsc;

use cuedub::clock::ClockEvent;
use cuedub::orchestrator::{OrchestratorEvent, Phase};
use cuedub::providers::mock::MockTranslator;
use cuedub::session::{PlaybackSession, SubtitleDisplay};
use cuedub::speech::mock::{MockSpeechCall, MockSpeechEngine};
use cuedub::transition::Transition;
use crate::common;

fn translated(text: &str) -> String {
    MockTranslator::expected_translation(text, "pt-BR")
}

async fn next_event(session: &mut PlaybackSession) -> OrchestratorEvent {
    tokio::time::timeout(Duration::from_secs(2), session.next_orchestrator_event())
        .await
        .expect("orchestrator event in time")
        .expect("channel open")
}

/// Wait for and apply `events` orchestrator completions
async fn settle(session: &mut PlaybackSession, events: usize) {
    for _ in 0..events {
        let event = next_event(session).await;
        session.handle_orchestrator_event(event);
    }
}

#[tokio::test]
async fn test_hi_bye_scenario_withTranslation_shouldSpeakEachCue() -> Result<()> {
    let translator = MockTranslator::working();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, true)?;

    assert_eq!(session.on_tick(1.0), Transition::Entered("Hi".to_string()));
    settle(&mut session, 2).await;
    assert_eq!(session.display(), SubtitleDisplay {
        subtitle: "Hi".to_string(),
        translation: translated("Hi"),
    });

    assert_eq!(session.on_tick(3.0), Transition::Entered("Bye".to_string()));
    settle(&mut session, 2).await;
    assert_eq!(session.display().translation, translated("Bye"));

    assert_eq!(session.on_tick(5.0), Transition::Cleared);
    assert_eq!(session.display(), SubtitleDisplay::default());

    assert_eq!(engine.spoken(), vec![translated("Hi"), translated("Bye")]);
    Ok(())
}

#[tokio::test]
async fn test_cue_change_whileSpeaking_shouldBeDroppedNotQueued() -> Result<()> {
    let translator = MockTranslator::working();
    let engine = MockSpeechEngine::manual();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, true)?;

    session.on_tick(1.0);
    settle(&mut session, 1).await;
    assert!(matches!(session.orchestrator().phase(), Phase::Speaking { .. }));

    // "Bye" shows up but is never translated
    assert_eq!(session.on_tick(3.0), Transition::Entered("Bye".to_string()));
    assert_eq!(session.display().subtitle, "Bye");

    engine.finish_all();
    settle(&mut session, 1).await;
    assert_eq!(session.orchestrator().phase(), Phase::Idle);

    // Staying inside "Bye" does not bring it back
    assert_eq!(session.on_tick(3.5), Transition::Unchanged);
    let next = tokio::time::timeout(Duration::from_millis(50), session.next_orchestrator_event()).await;
    assert!(next.is_err());
    assert_eq!(translator.request_count(), 1);
    assert_eq!(engine.spoken(), vec![translated("Hi")]);
    Ok(())
}

#[tokio::test]
async fn test_pause_duringTranslation_shouldDiscardLateResult() -> Result<()> {
    let translator = MockTranslator::gated();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, true)?;

    session.on_tick(1.0);
    assert!(session.handle_clock_event(ClockEvent::Paused));
    assert!(!session.orchestrator().state().speaking);

    translator.release(1);
    settle(&mut session, 1).await;

    assert!(session.display().translation.is_empty());
    assert!(engine.spoken().is_empty());
    assert_eq!(engine.calls(), vec![MockSpeechCall::Cancel]);
    Ok(())
}

#[tokio::test]
async fn test_toggle_translation_midCue_shouldRetriggerAndClear() -> Result<()> {
    let translator = MockTranslator::working();
    let engine = MockSpeechEngine::manual();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, false)?;

    session.on_tick(1.0);
    assert_eq!(translator.request_count(), 0);

    session.set_translation_enabled(true);
    settle(&mut session, 1).await;
    assert_eq!(session.display().translation, translated("Hi"));

    session.set_translation_enabled(false);
    assert!(session.display().translation.is_empty());
    assert_eq!(session.display().subtitle, "Hi");
    assert!(!session.orchestrator().state().speaking);
    assert_eq!(engine.calls().last(), Some(&MockSpeechCall::Cancel));
    Ok(())
}

#[tokio::test]
async fn test_translation_failure_shouldKeepSubtitleAndRecover() -> Result<()> {
    let translator = MockTranslator::failing();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, true)?;

    session.on_tick(1.0);
    settle(&mut session, 1).await;
    assert_eq!(session.display().subtitle, "Hi");
    assert!(session.display().translation.is_empty());
    assert!(!session.orchestrator().is_busy());

    session.on_tick(3.0);
    assert!(session.orchestrator().is_busy());
    settle(&mut session, 1).await;
    assert_eq!(translator.request_count(), 2);
    assert_eq!(session.display().subtitle, "Bye");
    assert!(!session.orchestrator().is_busy());
    Ok(())
}

#[tokio::test]
async fn test_cue_change_duringTranslation_shouldDiscardOldTranslation() -> Result<()> {
    let translator = MockTranslator::gated();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, true)?;

    session.on_tick(1.0);
    assert_eq!(session.on_tick(3.0), Transition::Entered("Bye".to_string()));

    translator.release(1);
    settle(&mut session, 1).await;

    assert_eq!(session.display(), SubtitleDisplay {
        subtitle: "Bye".to_string(),
        translation: String::new(),
    });
    assert!(engine.spoken().is_empty());
    assert!(!session.orchestrator().is_busy());
    Ok(())
}

#[tokio::test]
async fn test_cue_cleared_duringTranslation_shouldLeaveDisplayEmpty() -> Result<()> {
    let translator = MockTranslator::gated();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, true)?;

    session.on_tick(1.0);
    assert_eq!(session.on_tick(5.0), Transition::Cleared);

    translator.release(1);
    settle(&mut session, 1).await;

    assert_eq!(session.display(), SubtitleDisplay::default());
    assert!(engine.spoken().is_empty());
    assert_eq!(session.orchestrator().phase(), Phase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_run_withScriptedClock_shouldProcessEventsInOrder() -> Result<()> {
    let translator = MockTranslator::working();
    let engine = MockSpeechEngine::immediate();
    let mut session = common::mock_session(common::HI_BYE_TRACK, &translator, &engine, true)?;

    let (tx, rx) = mpsc::channel(16);
    let feeder = tokio::spawn(async move {
        for event in [
            ClockEvent::Tick(0.5),
            ClockEvent::Tick(1.0),
            ClockEvent::Paused,
            ClockEvent::Resumed,
            ClockEvent::Tick(1.5),
            ClockEvent::Tick(4.5),
            ClockEvent::Ended,
        ] {
            if tx.send(event).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });

    session.run(rx).await;
    feeder.await?;

    assert_eq!(translator.request_count(), 1);
    assert!(!session.orchestrator().is_busy());
    assert_eq!(session.display(), SubtitleDisplay::default());
    Ok(())
}
