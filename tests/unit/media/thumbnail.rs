use super::*;
use crate::foundation::core::ElementId;
use crate::media::platform::StreamingOptions;
use crate::testing::{FakeStreaming, FakeVideo, VideoCall};

fn ready_source(video: &FakeVideo) -> StreamingVideoSource<FakeVideo> {
    let mut src = StreamingVideoSource::new(video.clone());
    src.attach(
        "https://x/clip.mp4",
        &mut FakeStreaming::supported(),
        &StreamingOptions::default(),
    )
    .unwrap();
    src.on_loaded_metadata();
    src
}

#[test]
fn extracts_one_jpeg_data_uri() {
    let video = FakeVideo::new(ElementId(3));
    let mut src = ready_source(&video);
    let mut ex = ThumbnailExtractor::new(0.1, 80);

    assert!(ex.start(&mut src));
    assert!(ex.in_flight());
    assert!(!ex.start(&mut src));
    assert_eq!(video.seeks(), vec![0.1]);

    let uri = ex.on_seeked(&mut src).unwrap().unwrap();
    assert!(uri.starts_with("data:image/jpeg;base64,/9j/"));
    assert!(ex.on_seeked(&mut src).is_none());
    assert_eq!(video.count(&VideoCall::Capture), 1);
}

#[test]
fn not_ready_source_is_not_touched() {
    let video = FakeVideo::new(ElementId(3));
    let mut src = StreamingVideoSource::new(video.clone());
    let mut ex = ThumbnailExtractor::new(0.1, 80);
    assert!(!ex.start(&mut src));
    assert!(video.calls().is_empty());
}

#[test]
fn capture_failure_is_reported_once_without_retry() {
    let video = FakeVideo::new(ElementId(3));
    video.fail_capture("tainted canvas");
    let mut src = ready_source(&video);
    let mut ex = ThumbnailExtractor::new(0.1, 80);
    ex.start(&mut src);
    let err = ex.on_seeked(&mut src).unwrap().unwrap_err();
    assert!(matches!(err, EngineError::ThumbnailFailed(_)));
    assert!(ex.is_done());
    assert!(!ex.start(&mut src));
}

#[test]
fn unknown_dimensions_fail() {
    let video = FakeVideo::new(ElementId(3)).with_size(None);
    let mut src = ready_source(&video);
    let mut ex = ThumbnailExtractor::new(0.0, 80);
    ex.start(&mut src);
    assert!(ex.on_seeked(&mut src).unwrap().is_err());
}

#[test]
fn media_error_during_seek_fails_the_job() {
    let video = FakeVideo::new(ElementId(3));
    let mut src = ready_source(&video);
    let mut ex = ThumbnailExtractor::new(0.1, 80);
    assert!(ex.on_error("network").is_none());
    ex.start(&mut src);
    assert!(matches!(
        ex.on_error("network"),
        Some(EngineError::ThumbnailFailed(_))
    ));
    assert!(ex.on_seeked(&mut src).is_none());
}

#[test]
fn cache_is_terminal_and_falls_back_to_poster() {
    let mut cache = ThumbnailCache::default();
    assert_eq!(cache.display(Some("poster.jpg")), Some("poster.jpg"));
    assert!(cache.set_failed());
    assert!(!cache.set_ready("data:x".into()));
    assert_eq!(cache.status(), ThumbnailStatus::Failed);
    assert_eq!(cache.display(Some("poster.jpg")), Some("poster.jpg"));

    let mut cache = ThumbnailCache::default();
    assert!(cache.set_ready("data:x".into()));
    assert!(!cache.set_failed());
    assert_eq!(cache.display(Some("poster.jpg")), Some("data:x"));
}

#[test]
fn encode_rejects_mismatched_buffers() {
    let frame = RgbaFrame {
        width: 3,
        height: 3,
        data: vec![0; 4],
    };
    assert!(encode_jpeg_data_uri(&frame, 80).is_err());
}
