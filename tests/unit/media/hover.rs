use super::*;
use crate::foundation::core::{ElementId, TimeMs};
use crate::media::platform::StreamingOptions;
use crate::runtime::timer::TimerQueue;
use crate::testing::{FakeStreaming, FakeVideo, VideoCall};

fn ready_source() -> (StreamingVideoSource<FakeVideo>, FakeVideo) {
    let video = FakeVideo::new(ElementId(5));
    let mut src = StreamingVideoSource::new(video.clone());
    src.attach(
        "https://x/a.m3u8",
        &mut FakeStreaming::supported(),
        &StreamingOptions::default(),
    )
    .unwrap();
    src.on_manifest_parsed();
    (src, video)
}

#[test]
fn enter_seeks_plays_and_arms_timer() {
    let (mut src, video) = ready_source();
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(2.0, 10_000);

    assert!(hover.enter(&mut src, &mut timers, true));
    assert!(hover.is_previewing());
    assert_eq!(video.calls(), vec![VideoCall::Seek(2.0), VideoCall::Play]);
    assert_eq!(timers.active_count(), 1);

    assert!(!hover.enter(&mut src, &mut timers, true));
    assert_eq!(timers.active_count(), 1);
}

#[test]
fn loop_reseeks_every_period_until_leave() {
    let (mut src, video) = ready_source();
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(0.0, 10_000);
    hover.enter(&mut src, &mut timers, true);
    video.clear_calls();

    for id in timers.advance_to(TimeMs(25_000)) {
        assert!(hover.on_timer(id, &mut src));
    }
    assert_eq!(video.seeks(), vec![0.0, 0.0]);

    assert!(hover.leave(&mut src, &mut timers));
    assert_eq!(hover.state(), HoverState::Idle);
    assert_eq!(timers.active_count(), 0);
    assert!(timers.advance_to(TimeMs(60_000)).is_empty());
    assert!(video.is_paused());
    assert_eq!(video.current_time(), 0.0);
}

#[test]
fn repeated_leave_is_a_noop() {
    let (mut src, video) = ready_source();
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(0.0, 10_000);
    assert!(!hover.leave(&mut src, &mut timers));
    assert!(video.calls().is_empty());
}

#[test]
fn unready_source_defers_then_resumes() {
    let video = FakeVideo::new(ElementId(5));
    let mut src = StreamingVideoSource::new(video.clone());
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(0.0, 10_000);

    assert!(!hover.enter(&mut src, &mut timers, true));
    assert_eq!(hover.state(), HoverState::Deferred);
    assert!(video.calls().is_empty());
    assert!(!hover.resume(&mut src, &mut timers));

    src.attach(
        "https://x/a.mp4",
        &mut FakeStreaming::supported(),
        &StreamingOptions::default(),
    )
    .unwrap();
    src.on_loaded_metadata();
    assert!(hover.resume(&mut src, &mut timers));
    assert!(hover.is_previewing());
}

#[test]
fn leave_while_deferred_cancels_the_deferral() {
    let (mut src, _video) = ready_source();
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(0.0, 10_000);
    hover.enter(&mut src, &mut timers, false);
    assert_eq!(hover.state(), HoverState::Deferred);
    assert!(!hover.leave(&mut src, &mut timers));
    assert!(!hover.resume(&mut src, &mut timers));
}

#[test]
fn aborted_play_is_swallowed() {
    let (mut src, _video) = ready_source();
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(0.0, 10_000);
    hover.enter(&mut src, &mut timers, true);
    hover.leave(&mut src, &mut timers);
    hover
        .on_play_failed(PlayFailure::Aborted, &mut src, &mut timers)
        .unwrap();
    assert!(!hover.is_disabled());
    assert!(hover.enter(&mut src, &mut timers, true));
}

#[test]
fn genuine_playback_error_disables_previews() {
    let (mut src, _video) = ready_source();
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(0.0, 10_000);
    hover.enter(&mut src, &mut timers, true);
    let err = hover
        .on_play_failed(PlayFailure::Other("decode".into()), &mut src, &mut timers)
        .unwrap_err();
    assert!(matches!(err, EngineError::PlaybackError(_)));
    assert!(hover.is_disabled());
    assert_eq!(timers.active_count(), 0);
    assert!(!hover.enter(&mut src, &mut timers, true));
}

#[test]
fn stale_timer_is_ignored() {
    let (mut src, video) = ready_source();
    let mut timers = TimerQueue::new(TimeMs(0));
    let mut hover = HoverPreviewController::new(0.0, 10_000);
    hover.enter(&mut src, &mut timers, true);
    video.clear_calls();
    assert!(!hover.on_timer(TimerId(999), &mut src));
    hover.cancel(&mut timers);
    assert_eq!(timers.active_count(), 0);
    assert!(video.calls().is_empty());
}
