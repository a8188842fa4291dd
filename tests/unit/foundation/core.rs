use super::*;

#[test]
fn time_arithmetic_saturates() {
    let t = TimeMs(1_000);
    assert_eq!(t.saturating_add_ms(500), TimeMs(1_500));
    assert_eq!(t.since(TimeMs(400)), 600);
    assert_eq!(TimeMs(400).since(t), 0);
    assert_eq!(TimeMs::from_secs_f64(2.5), TimeMs(2_500));
    assert_eq!(TimeMs::from_secs_f64(-1.0), TimeMs(0));
    assert!((TimeMs(1_250).as_secs_f64() - 1.25).abs() < 1e-12);
}

#[test]
fn tile_keys_depend_on_identity_not_position() {
    let a0 = TileKey::for_source("https://cdn/a.m3u8", 0);
    let a1 = TileKey::for_source("https://cdn/a.m3u8", 1);
    let b0 = TileKey::for_source("https://cdn/b.m3u8", 0);
    assert_ne!(a0, a1);
    assert_ne!(a0, b0);
    assert_eq!(a0, TileKey::for_source("https://cdn/a.m3u8", 0));
    assert_eq!(TileKey::for_id("hero"), TileKey::for_id("hero"));
}

#[test]
fn viewport_rejects_non_finite_dimensions() {
    assert!(Viewport::new(f64::NAN, 100.0).is_err());
    assert!(Viewport::new(100.0, -1.0).is_err());
    let vp = Viewport::new(1280.0, 720.0).unwrap();
    assert_eq!(vp.rect(), Rect::new(0.0, 0.0, 1280.0, 720.0));
}
