// Integration tests for the telemetry broadcast: seed-on-subscribe, live
// ticking, fan-out to multiple subscribers, and the no-tick-after-stop
// guarantee.

mod common;

use common::MockEngine;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use mic_session::{Disposition, RecordingSession, SessionConfig, TrackDescriptor};

fn test_config() -> SessionConfig {
    common::init_tracing();
    SessionConfig {
        tick_interval: Duration::from_millis(10),
        ..SessionConfig::default()
    }
}

fn test_session(engine: MockEngine) -> RecordingSession {
    RecordingSession::with_config(
        test_config(),
        TrackDescriptor::from_path("/tmp/take-02.aac"),
        Box::new(engine),
    )
}

#[tokio::test]
async fn subscriber_sees_zero_seed_before_recording() {
    let session = test_session(MockEngine::new());

    let mut stream = session.dispositions();
    let first = stream.next().await.unwrap();

    assert_eq!(first, Disposition::ZERO);
    assert_eq!(first.decibels, 0.0);
    assert_eq!(first.duration, Duration::ZERO);
}

#[tokio::test]
async fn ticks_carry_engine_level_and_growing_duration() {
    let session = test_session(MockEngine::new().level(37.5));

    session.start(None).await.unwrap();

    let mut stream = session.dispositions();
    // Seed first, then live ticks.
    stream.next().await.unwrap();
    let a = stream.next().await.unwrap();
    let b = stream.next().await.unwrap();

    assert_eq!(a.decibels, 37.5);
    assert_eq!(b.decibels, 37.5);
    assert!(b.duration > a.duration, "elapsed duration must grow tick over tick");
    assert!(a.duration > Duration::ZERO);

    session.dispose().await;
}

#[tokio::test]
async fn start_reseeds_the_stream_with_zero() {
    let session = test_session(MockEngine::new());

    session.start(None).await.unwrap();
    sleep(Duration::from_millis(40)).await;
    session.stop().await.unwrap();

    session.start(None).await.unwrap();
    let mut stream = session.dispositions();
    let first = stream.next().await.unwrap();

    // A subscriber joining right after a restart sees the fresh seed, not a
    // stale tick from the previous recording.
    assert!(first.duration < Duration::from_millis(30));

    session.dispose().await;
}

#[tokio::test]
async fn multiple_subscribers_see_the_same_feed() {
    let session = test_session(MockEngine::new().level(12.0));

    let mut early = session.dispositions();
    assert_eq!(early.next().await.unwrap(), Disposition::ZERO);

    session.start(None).await.unwrap();
    sleep(Duration::from_millis(35)).await;

    // A late subscriber replays the latest value, not history.
    let late = session.dispositions();
    let late_value = late.latest();
    assert_eq!(late_value.decibels, 12.0);
    assert!(late_value.duration > Duration::ZERO);

    // Once ticking stops, both handles hold the identical final snapshot.
    session.stop().await.unwrap();
    assert_eq!(early.latest(), late.latest());
}

#[tokio::test]
async fn no_tick_is_delivered_after_stop() {
    let session = test_session(MockEngine::new());

    session.start(None).await.unwrap();
    sleep(Duration::from_millis(35)).await;
    session.stop().await.unwrap();

    let mut stream = session.dispositions();
    // Replay of the final snapshot is fine...
    stream.next().await.unwrap();
    // ...but nothing new may arrive once stop has returned.
    let further = timeout(Duration::from_millis(60), stream.next()).await;
    assert!(further.is_err(), "no tick may follow the stop sequence");
}

#[tokio::test]
async fn failed_level_query_skips_ticks_but_recording_continues() {
    let session = test_session(MockEngine::new().fail_level());

    session.start(None).await.unwrap();
    assert!(session.is_recording());

    let mut stream = session.dispositions();
    stream.next().await.unwrap(); // seed
    let tick = timeout(Duration::from_millis(60), stream.next()).await;
    assert!(tick.is_err(), "failed level queries publish nothing");

    // Non-fatal: the session still stops cleanly.
    let media = session.stop().await.unwrap();
    assert!(media.is_some());
}

#[tokio::test]
async fn telemetry_tolerates_zero_subscribers() {
    let session = test_session(MockEngine::new());

    session.start(None).await.unwrap();
    sleep(Duration::from_millis(50)).await;

    // Nobody subscribed while it ticked; stop must still be clean and the
    // last snapshot still queryable.
    let media = session.stop().await.unwrap().unwrap();
    assert!(media.duration >= Duration::from_millis(40));
}
