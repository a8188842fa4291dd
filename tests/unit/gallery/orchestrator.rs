use super::*;
use crate::testing::{FakeGalleryHost, FakeStreaming, FakeVideo, VideoCall};

fn video_tiles(n: usize) -> Vec<MediaTile> {
    (0..n)
        .map(|i| {
            MediaTile::video(format!("https://cdn.example.com/{i}/master.m3u8"))
                .with_poster(format!("poster-{i}.jpg"))
                .with_title(format!("Reel {i}"))
        })
        .collect()
}

fn mount(tiles: Vec<MediaTile>) -> (GalleryOrchestrator<FakeVideo>, FakeGalleryHost) {
    let mut host = FakeGalleryHost::default();
    let gallery = GalleryOrchestrator::mount(EngineConfig::default(), tiles, &mut host).unwrap();
    (gallery, host)
}

fn reveal(gallery: &mut GalleryOrchestrator<FakeVideo>, host: &mut FakeGalleryHost, key: TileKey) {
    let element = host.container(key).unwrap();
    gallery.on_intersection(element, 1.0, host);
}

#[test]
fn mount_attaches_every_video_source() {
    let (gallery, host) = mount(video_tiles(3));
    assert_eq!(host.streaming_log().created(), 3);
    for key in gallery.keys() {
        let view = gallery.view(*key).unwrap();
        assert_eq!(view.source_state, Some(SourceState::Loading));
        assert!(!view.visible);
        assert_eq!(view.thumbnail, Some(ThumbnailStatus::Pending));
    }
}

#[test]
fn entry_reveals_with_stagger_delay() {
    let (mut gallery, mut host) = mount(video_tiles(4));
    let keys = gallery.keys().to_vec();
    reveal(&mut gallery, &mut host, keys[2]);
    reveal(&mut gallery, &mut host, keys[3]);
    reveal(&mut gallery, &mut host, keys[2]);

    let events = gallery.drain_events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        GalleryEvent::Revealed { key, delay_sec } => {
            assert_eq!(*key, keys[2]);
            assert!((delay_sec - 0.2).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }
    // Fourth tile starts a new row of three.
    assert_eq!(
        events[1],
        GalleryEvent::Revealed {
            key: keys[3],
            delay_sec: 0.0
        }
    );
}

#[test]
fn thumbnail_waits_for_both_entry_and_readiness() {
    let (mut gallery, mut host) = mount(video_tiles(1));
    let key = gallery.keys()[0];
    let video = host.video(key).unwrap();

    gallery.on_manifest_parsed(key, &mut host);
    assert!(video.seeks().is_empty());

    reveal(&mut gallery, &mut host, key);
    assert_eq!(video.seeks(), vec![0.1]);

    gallery.on_seeked(key, &mut host);
    let view = gallery.view(key).unwrap();
    assert_eq!(view.thumbnail, Some(ThumbnailStatus::Ready));
    assert!(view.image.unwrap().starts_with("data:image/jpeg;base64,"));
    assert!(
        gallery
            .drain_events()
            .contains(&GalleryEvent::ThumbnailReady { key })
    );
}

#[test]
fn failed_thumbnail_keeps_poster_and_stays_clickable() {
    let (mut gallery, mut host) = mount(video_tiles(1));
    let key = gallery.keys()[0];
    host.video(key).unwrap().fail_capture("tainted");
    reveal(&mut gallery, &mut host, key);
    gallery.on_manifest_parsed(key, &mut host);
    gallery.on_seeked(key, &mut host);

    let view = gallery.view(key).unwrap();
    assert_eq!(view.thumbnail, Some(ThumbnailStatus::Failed));
    assert_eq!(view.image, Some("poster-0.jpg"));
    assert!(view.interactive);
    assert_eq!(
        gallery.on_click(key).unwrap().source_url,
        "https://cdn.example.com/0/master.m3u8"
    );
}

#[test]
fn unsupported_streaming_fails_only_that_tile() {
    let mut host = FakeGalleryHost::new(FakeStreaming::unsupported());
    let tiles = vec![
        MediaTile::video("https://x/a.m3u8").with_poster("a.jpg"),
        MediaTile::video("https://x/b.mp4"),
    ];
    let mut gallery = GalleryOrchestrator::mount(EngineConfig::default(), tiles, &mut host).unwrap();
    let keys = gallery.keys().to_vec();

    let events = gallery.drain_events();
    assert!(matches!(
        &events[..],
        [GalleryEvent::Fallback { key, reason }] if *key == keys[0] && reason.starts_with("stream attach failed")
    ));
    let failed = gallery.view(keys[0]).unwrap();
    assert!(!failed.interactive);
    assert_eq!(failed.image, Some("a.jpg"));
    assert_eq!(
        gallery.view(keys[1]).unwrap().source_state,
        Some(SourceState::Loading)
    );

    gallery.on_pointer_enter(keys[0], &mut host);
    assert!(gallery.drain_events().is_empty());
}

#[test]
fn hover_is_deferred_while_thumbnail_seek_is_pending() {
    let (mut gallery, mut host) = mount(video_tiles(1));
    let key = gallery.keys()[0];
    let video = host.video(key).unwrap();
    gallery.on_manifest_parsed(key, &mut host);
    reveal(&mut gallery, &mut host, key);
    gallery.drain_events();

    gallery.on_pointer_enter(key, &mut host);
    assert_eq!(gallery.view(key).unwrap().hover, Some(HoverState::Deferred));
    assert_eq!(video.count(&VideoCall::Play), 0);

    gallery.on_seeked(key, &mut host);
    assert_eq!(video.count(&VideoCall::Play), 1);
    assert!(
        gallery
            .drain_events()
            .contains(&GalleryEvent::PreviewStarted { key })
    );
}

#[test]
fn timers_route_to_the_owning_tile() {
    let (mut gallery, mut host) = mount(video_tiles(2));
    let keys = gallery.keys().to_vec();
    gallery.on_manifest_parsed(keys[1], &mut host);
    gallery.on_pointer_enter(keys[1], &mut host);
    let video = host.video(keys[1]).unwrap();
    video.clear_calls();

    let fired = host.advance_to(TimeMs(10_000));
    assert_eq!(fired.len(), 1);
    assert!(gallery.on_timer(fired[0]));
    assert_eq!(video.calls(), vec![VideoCall::Seek(0.0), VideoCall::Play]);
    assert!(host.video(keys[0]).unwrap().calls().is_empty());
    assert!(!gallery.on_timer(TimerId(4242)));
}

#[test]
fn playback_error_disables_preview_but_not_the_tile() {
    let (mut gallery, mut host) = mount(video_tiles(1));
    let key = gallery.keys()[0];
    gallery.on_manifest_parsed(key, &mut host);
    gallery.on_pointer_enter(key, &mut host);
    gallery.drain_events();

    gallery.on_play_failed(key, PlayFailure::Aborted, &mut host);
    assert!(gallery.drain_events().is_empty());

    gallery.on_play_failed(key, PlayFailure::Other("decode".into()), &mut host);
    let events = gallery.drain_events();
    assert_eq!(events[0], GalleryEvent::PreviewStopped { key });
    assert!(matches!(&events[1], GalleryEvent::Fallback { reason, .. } if reason.starts_with("playback error")));
    assert_eq!(host.active_timers(), 0);
    assert!(!gallery.view(key).unwrap().interactive);
    assert!(gallery.on_click(key).is_some());
}

#[test]
fn fatal_media_error_marks_tile_failed() {
    let (mut gallery, mut host) = mount(video_tiles(1));
    let key = gallery.keys()[0];
    gallery.on_media_error(key, "manifest load error", &mut host);
    let view = gallery.view(key).unwrap();
    assert!(!view.interactive);
    assert_eq!(view.thumbnail, Some(ThumbnailStatus::Failed));
    assert_eq!(view.image, Some("poster-0.jpg"));
}

#[test]
fn image_tiles_report_load_and_reveal_frames() {
    let (mut gallery, mut host) = mount(vec![MediaTile::image("https://x/still.jpg")]);
    let key = gallery.keys()[0];
    assert_eq!(host.streaming_log().created(), 0);
    assert!(gallery.on_click(key).is_none());

    let before = gallery.reveal_frame(key, TimeMs(0)).unwrap();
    assert_eq!(before.opacity, 0.0);

    host.advance_to(TimeMs(1_000));
    reveal(&mut gallery, &mut host, key);
    gallery.on_image_loaded(key);
    gallery.on_image_loaded(key);
    let events = gallery.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], GalleryEvent::ImageLoaded { key });

    let done = gallery.reveal_frame(key, TimeMs(2_000)).unwrap();
    assert_eq!(done.opacity, 1.0);
    assert_eq!(gallery.view(key).unwrap().image, Some("https://x/still.jpg"));
}

#[test]
fn unmounted_container_is_skipped() {
    let mut host = FakeGalleryHost::default();
    let tiles = vec![MediaTile::image("https://x/a.jpg")];
    let key = assign_keys(&tiles).unwrap()[0];
    host.unmount_container(key);
    let gallery = GalleryOrchestrator::mount(EngineConfig::default(), tiles, &mut host).unwrap();
    assert_eq!(gallery.pending_observations(), 0);
    assert!(!gallery.view(key).unwrap().visible);
}

#[test]
fn reorder_keeps_state_and_updates_stagger() {
    let tiles = video_tiles(2);
    let (mut gallery, mut host) = mount(tiles.clone());
    let keys = gallery.keys().to_vec();
    gallery.on_manifest_parsed(keys[0], &mut host);

    let reversed = vec![tiles[1].clone(), tiles[0].clone()];
    gallery.set_tiles(reversed, &mut host).unwrap();
    assert_eq!(gallery.keys(), &[keys[1], keys[0]]);
    let view = gallery.view(keys[0]).unwrap();
    assert_eq!(view.index, 1);
    assert!((view.delay_sec - 0.1).abs() < 1e-9);
    assert_eq!(view.source_state, Some(SourceState::Ready));
    assert_eq!(host.streaming_log().created(), 2);
}

#[test]
fn removed_tiles_are_released() {
    let tiles = video_tiles(3);
    let (mut gallery, mut host) = mount(tiles.clone());
    let keys = gallery.keys().to_vec();
    gallery.on_manifest_parsed(keys[2], &mut host);
    gallery.on_pointer_enter(keys[2], &mut host);
    assert_eq!(host.active_timers(), 1);

    gallery.set_tiles(tiles[..1].to_vec(), &mut host).unwrap();
    assert_eq!(host.streaming_log().live_sessions(), 1);
    assert_eq!(host.active_timers(), 0);
    assert!(gallery.view(keys[2]).is_none());
}

#[test]
fn teardown_releases_everything_once() {
    let (mut gallery, mut host) = mount(video_tiles(3));
    let keys = gallery.keys().to_vec();
    gallery.on_manifest_parsed(keys[0], &mut host);
    gallery.on_pointer_enter(keys[0], &mut host);
    let container = host.container(keys[1]).unwrap();
    assert_eq!(
        gallery.drain_events(),
        vec![GalleryEvent::PreviewStarted { key: keys[0] }]
    );

    gallery.teardown(&mut host);
    gallery.teardown(&mut host);
    assert_eq!(host.streaming_log().destroyed(), 3);
    assert_eq!(host.streaming_log().live_sessions(), 0);
    assert_eq!(host.active_timers(), 0);
    assert_eq!(gallery.pending_observations(), 0);
    assert!(gallery.set_tiles(video_tiles(1), &mut host).is_err());

    // The running preview is closed exactly once.
    assert_eq!(
        gallery.drain_events(),
        vec![GalleryEvent::PreviewStopped { key: keys[0] }]
    );

    gallery.on_intersection(container, 1.0, &mut host);
    assert!(gallery.drain_events().is_empty());
}

#[test]
fn removing_a_previewing_tile_stops_its_preview() {
    let tiles = video_tiles(2);
    let (mut gallery, mut host) = mount(tiles.clone());
    let keys = gallery.keys().to_vec();
    gallery.on_manifest_parsed(keys[1], &mut host);
    gallery.on_pointer_enter(keys[1], &mut host);
    gallery.drain_events();

    gallery.set_tiles(tiles[..1].to_vec(), &mut host).unwrap();
    assert_eq!(
        gallery.drain_events(),
        vec![GalleryEvent::PreviewStopped { key: keys[1] }]
    );
}

#[test]
fn leave_keeps_hover_start_until_deferred_thumbnail_runs() {
    let mut tile = MediaTile::video("https://cdn.example.com/reel/master.m3u8");
    tile.hover_start_timestamp = Some(4.0);
    let (mut gallery, mut host) = mount(vec![tile]);
    let key = gallery.keys()[0];
    let video = host.video(key).unwrap();
    gallery.on_manifest_parsed(key, &mut host);
    video.clear_calls();

    gallery.on_pointer_enter(key, &mut host);
    // Revealed while previewing: extraction waits.
    reveal(&mut gallery, &mut host, key);
    gallery.on_pointer_leave(key, &mut host);
    assert_eq!(
        video.calls(),
        vec![
            VideoCall::Seek(4.0),
            VideoCall::Play,
            VideoCall::Pause,
            VideoCall::Seek(4.0)
        ]
    );
    assert_eq!(video.current_time(), 4.0);
    assert_eq!(
        gallery.view(key).unwrap().thumbnail,
        Some(ThumbnailStatus::Pending)
    );

    // Reset seek settles, then the thumbnail seek starts.
    gallery.on_seeked(key, &mut host);
    assert_eq!(video.seeks(), vec![4.0, 4.0, 0.1]);
    assert_eq!(video.count(&VideoCall::Capture), 0);

    gallery.on_seeked(key, &mut host);
    assert_eq!(video.count(&VideoCall::Capture), 1);
    assert_eq!(
        gallery.view(key).unwrap().thumbnail,
        Some(ThumbnailStatus::Ready)
    );
    assert_eq!(video.seeks(), vec![4.0, 4.0, 0.1, 4.0]);
    assert_eq!(video.current_time(), 4.0);

    // The restoring seek completes without a second capture.
    gallery.on_seeked(key, &mut host);
    assert_eq!(video.count(&VideoCall::Capture), 1);
}

#[test]
fn reenter_during_reset_seek_skips_extraction() {
    let (mut gallery, mut host) = mount(video_tiles(1));
    let key = gallery.keys()[0];
    let video = host.video(key).unwrap();
    gallery.on_manifest_parsed(key, &mut host);
    gallery.on_pointer_enter(key, &mut host);
    reveal(&mut gallery, &mut host, key);
    gallery.on_pointer_leave(key, &mut host);
    gallery.on_pointer_enter(key, &mut host);
    assert_eq!(gallery.view(key).unwrap().hover.map(|h| h != HoverState::Idle), Some(true));

    gallery.on_seeked(key, &mut host);
    assert!(!video.seeks().contains(&0.1));
    assert_eq!(video.count(&VideoCall::Capture), 0);

    gallery.on_pointer_leave(key, &mut host);
    gallery.on_seeked(key, &mut host);
    assert_eq!(video.seeks().last(), Some(&0.1));
}
