mod common;

use std::time::Duration;

use pose_activity::{
    ActivityError, ActivityLabel, ActivityStream, ActivityUpdate, ClassifierConfig, StreamConfig, StreamPool,
};

use common::fixtures::{raised_hands_frame, squat_frame, standing_frame, translated};

fn spawn_stream() -> ActivityStream {
    ActivityStream::spawn("test", ClassifierConfig::default(), StreamConfig::default())
}

#[tokio::test(start_paused = true)]
async fn classifies_submitted_frame_on_tick() {
    let stream = spawn_stream();
    let mut updates = stream.subscribe();
    assert_eq!(stream.current(), ActivityUpdate::default());

    stream.submit(raised_hands_frame(60.0)).unwrap();
    updates.changed().await.unwrap();

    let update = *updates.borrow_and_update();
    assert_eq!(update.sequence, 1);
    assert_eq!(update.label, ActivityLabel::RaisingHands);

    stream.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn newest_pending_frame_wins() {
    let stream = spawn_stream();
    let mut updates = stream.subscribe();

    stream.submit(standing_frame()).unwrap();
    stream.submit(squat_frame()).unwrap();
    updates.changed().await.unwrap();

    let update = *updates.borrow_and_update();
    assert_eq!(update.sequence, 1);
    assert_eq!(update.label, ActivityLabel::Squatting);

    stream.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn burst_between_ticks_keeps_only_the_newest_frame() {
    let stream = spawn_stream();
    let mut updates = stream.subscribe();

    // Far more submissions than the control queue holds, with no yield in between.
    for _ in 0..(StreamConfig::default().command_queue * 3) {
        stream.submit(standing_frame()).unwrap();
    }
    stream.submit(raised_hands_frame(60.0)).unwrap();
    updates.changed().await.unwrap();

    let update = *updates.borrow_and_update();
    assert_eq!(update.sequence, 1);
    assert_eq!(update.label, ActivityLabel::RaisingHands);

    stream.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_discards_the_waiting_frame() {
    let stream = spawn_stream();
    let updates = stream.subscribe();

    stream.submit(standing_frame()).unwrap();
    stream.reset().await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(!updates.has_changed().unwrap());
    assert_eq!(stream.current().sequence, 0);
    stream.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn idle_ticks_publish_nothing() {
    let stream = spawn_stream();
    let updates = stream.subscribe();

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(!updates.has_changed().unwrap());
    assert_eq!(stream.current().sequence, 0);
    stream.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn motion_builds_across_ticks_and_reset_clears_it() {
    let stream = spawn_stream();
    let mut updates = stream.subscribe();
    let base = standing_frame();

    let mut labels = Vec::new();
    for i in 0..6 {
        stream.submit(translated(&base, i as f64 * 20.0, 0.0)).unwrap();
        updates.changed().await.unwrap();
        labels.push(updates.borrow_and_update().label);
    }
    assert_eq!(labels[3], ActivityLabel::Standing);
    assert_eq!(labels[5], ActivityLabel::Movement);

    stream.reset().await.unwrap();
    stream.submit(translated(&base, 120.0, 0.0)).unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().label, ActivityLabel::Standing);

    stream.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pool_keeps_streams_independent() {
    let mut pool = StreamPool::new(ClassifierConfig::default(), StreamConfig::default());
    let mut walker = pool.open("walker");
    let mut squatter = pool.open("squatter");
    assert_eq!(pool.len(), 2);

    let base = standing_frame();
    for i in 0..5 {
        pool.submit("walker", translated(&base, i as f64 * 25.0, 0.0)).unwrap();
        pool.submit("squatter", squat_frame()).unwrap();
        walker.changed().await.unwrap();
        squatter.changed().await.unwrap();
    }

    assert_eq!(walker.borrow().label, ActivityLabel::Movement);
    assert_eq!(squatter.borrow().label, ActivityLabel::Squatting);

    pool.shutdown_all().await.unwrap();
    assert!(pool.is_empty());
}

#[tokio::test(start_paused = true)]
async fn pool_reports_unknown_streams() {
    let mut pool = StreamPool::new(ClassifierConfig::default(), StreamConfig::default());
    let err = pool.submit("ghost", standing_frame()).unwrap_err();
    assert!(matches!(err, ActivityError::UnknownStream(id) if id == "ghost"));

    pool.open("cam0");
    pool.close("cam0").await.unwrap();
    assert!(matches!(pool.close("cam0").await, Err(ActivityError::UnknownStream(_))));
}

#[tokio::test(start_paused = true)]
async fn reopening_an_id_reuses_the_stream() {
    let mut pool = StreamPool::new(ClassifierConfig::default(), StreamConfig::default());
    let first = pool.open("cam0");
    let mut second = pool.open("cam0");
    assert_eq!(pool.len(), 1);

    pool.submit("cam0", standing_frame()).unwrap();
    second.changed().await.unwrap();
    assert_eq!(first.borrow().label, ActivityLabel::Standing);

    pool.shutdown_all().await.unwrap();
}
