use showreel::testing::FakeGalleryHost;
use showreel::{
    ColorInterpolator, EngineConfig, GalleryOrchestrator, ManualScrollHost, Rect, RegionSpec,
    ScrollSignal, TimeMs, Viewport, load_tiles_json,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let viewport = Viewport::new(1440.0, 900.0)?;
    let signal = ScrollSignal::new(ManualScrollHost, viewport).with_coalescing(false);
    signal.define_region("hero-to-featured", RegionSpec::hero_to_featured())?;
    ColorInterpolator::new().subscribe(&signal, "hero-to-featured", |palette| {
        println!("background {}", palette.background.to_hex());
    });

    let tiles = load_tiles_json(include_str!("../tests/data/gallery.json"))?;
    let mut host = FakeGalleryHost::default();
    let mut gallery = GalleryOrchestrator::mount(EngineConfig::default(), tiles, &mut host)?;
    let keys = gallery.keys().to_vec();

    for key in &keys {
        gallery.on_manifest_parsed(*key, &mut host);
        gallery.on_loaded_metadata(*key, &mut host);
    }

    for offset in [0.0, 950.0, 1_010.0, 1_100.0] {
        signal.on_scroll(offset);
    }

    let rects: Vec<_> = keys
        .iter()
        .enumerate()
        .filter_map(|(i, key)| {
            let y = 120.0 + 280.0 * i as f64;
            host.container(*key)
                .map(|el| (el, Rect::new(0.0, y, 420.0, y + 260.0)))
        })
        .collect();
    gallery.on_layout(viewport, rects, &mut host);
    for key in &keys {
        gallery.on_seeked(*key, &mut host);
    }

    if let Some(first) = keys.first() {
        gallery.on_pointer_enter(*first, &mut host);
        for timer in host.advance_to(TimeMs(25_000)) {
            gallery.on_timer(timer);
        }
        gallery.on_pointer_leave(*first, &mut host);
    }

    for event in gallery.drain_events() {
        println!("{event:?}");
    }
    for view in gallery.views() {
        println!(
            "#{} {:?} visible={} delay={:.1}s thumbnail={:?}",
            view.index, view.kind, view.visible, view.delay_sec, view.thumbnail
        );
    }

    gallery.teardown(&mut host);
    signal.teardown();
    Ok(())
}
