/*!
 * Simulated media clock.
 *
 * `PlaybackClock` tracks a playback position the way a media element
 * does; `spawn_clock` drives one on a tokio task and reports progress as
 * `ClockEvent`s at a fixed cadence.
 */

use std::time::Duration;
use log::debug;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Event emitted by the playback clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    /// Current position in seconds
    Tick(f64),
    Paused,
    Resumed,
    Ended,
}

/// Position, speed and play state of a simulated media element
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    position: f64,
    speed: f64,
    playing: bool,
    duration: f64,
}

impl PlaybackClock {
    /// Paused clock at position 0 that ends at `duration` seconds
    pub fn new(duration: f64, speed: f64) -> Self {
        Self {
            position: 0.0,
            speed,
            playing: false,
            duration: duration.max(0.0),
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.duration
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to `position`, clamped to the clock's range
    pub fn seek(&mut self, position: f64) {
        self.position = position.clamp(0.0, self.duration);
    }

    /// Advance by `elapsed` wall time if playing; returns the new position
    pub fn advance(&mut self, elapsed: Duration) -> f64 {
        if self.playing {
            self.position = (self.position + elapsed.as_secs_f64() * self.speed).min(self.duration);
        }
        self.position
    }
}

/// Scheduled pause: playback holds for `hold` once it reaches `at` seconds
#[derive(Debug, Clone, PartialEq)]
pub struct PausePoint {
    pub at: f64,
    pub hold: Duration,
}

/// Parameters for `spawn_clock`
#[derive(Debug, Clone)]
pub struct ClockOptions {
    pub tick_interval: Duration,
    pub speed: f64,
    pub start_at: f64,
    /// Position at which playback ends
    pub duration: f64,
    pub pause_points: Vec<PausePoint>,
}

impl ClockOptions {
    pub fn new(duration: f64, tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            speed: 1.0,
            start_at: 0.0,
            duration,
            pause_points: Vec::new(),
        }
    }
}

/// Run a playback clock on a new task.
///
/// The receiver sees a `Tick` for every interval, `Paused`/`Resumed` around
/// each pause point and a final `Ended`. The task stops early when `cancel`
/// fires or the receiver is dropped.
pub fn spawn_clock(options: ClockOptions, cancel: CancellationToken) -> mpsc::Receiver<ClockEvent> {
    let (tx, rx) = mpsc::channel(64);

    tokio::spawn(async move {
        if run_clock(options, &tx, &cancel).await.is_none() {
            debug!("Playback clock stopped");
        }
    });

    rx
}

/// Returns `None` when stopped before the end
async fn run_clock(
    options: ClockOptions,
    tx: &mpsc::Sender<ClockEvent>,
    cancel: &CancellationToken,
) -> Option<()> {
    let mut clock = PlaybackClock::new(options.duration, options.speed);
    clock.seek(options.start_at);

    let mut pause_points: Vec<PausePoint> = options
        .pause_points
        .into_iter()
        .filter(|point| point.at >= clock.position())
        .collect();
    pause_points.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut pause_points = pause_points.into_iter().peekable();

    let mut interval = tokio::time::interval(options.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    clock.play();
    tx.send(ClockEvent::Tick(clock.position())).await.ok()?;
    interval.tick().await;
    let mut last = Instant::now();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = interval.tick() => {}
        }

        let now = Instant::now();
        let mut position = clock.advance(now - last);
        last = now;

        if let Some(point) = pause_points.next_if(|point| point.at <= position) {
            clock.seek(point.at);
            position = clock.position();
            tx.send(ClockEvent::Tick(position)).await.ok()?;

            clock.pause();
            tx.send(ClockEvent::Paused).await.ok()?;
            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = tokio::time::sleep(point.hold) => {}
            }
            clock.play();
            tx.send(ClockEvent::Resumed).await.ok()?;

            interval.reset();
            last = Instant::now();
            continue;
        }

        tx.send(ClockEvent::Tick(position)).await.ok()?;
        if clock.is_finished() {
            tx.send(ClockEvent::Ended).await.ok()?;
            return Some(());
        }
    }
}
