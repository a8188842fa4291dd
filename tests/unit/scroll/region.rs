use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn hero_to_featured_window_follows_viewport_height() {
    let spec = RegionSpec::hero_to_featured();
    let b = spec.bounds(1000.0);
    assert!(approx(b.start, 1040.0));
    assert!(approx(b.end, 1240.0));

    let b = spec.bounds(500.0);
    assert!(approx(b.start, 520.0));
    assert!(approx(b.end, 620.0));
}

#[test]
fn progress_is_clamped_and_linear_inside() {
    let b = RegionBounds {
        start: 100.0,
        end: 300.0,
    };
    assert_eq!(b.progress(0.0), 0.0);
    assert_eq!(b.progress(100.0), 0.0);
    assert!(approx(b.progress(200.0), 0.5));
    assert_eq!(b.progress(300.0), 1.0);
    assert_eq!(b.progress(10_000.0), 1.0);
}

#[test]
fn invalid_specs_are_rejected() {
    assert!(RegionSpec::new(0.0, 0.0).is_err());
    assert!(RegionSpec::new(0.0, -1.0).is_err());
    assert!(RegionSpec::new(f64::NAN, 1.0).is_err());
    assert!(RegionSpec::new(1.0, 0.5).is_ok());
}

#[test]
fn overlapping_regions_are_a_config_error() {
    let mut map = RegionMap::default();
    map.insert("a", RegionSpec::new(0.0, 1.0).unwrap(), 800.0)
        .unwrap();
    let err = map
        .insert("b", RegionSpec::new(0.5, 1.0).unwrap(), 800.0)
        .unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));

    // Touching windows are fine; so is replacing a region under its own name.
    map.insert("b", RegionSpec::new(1.0, 1.0).unwrap(), 800.0)
        .unwrap();
    map.insert("a", RegionSpec::new(0.0, 0.8).unwrap(), 800.0)
        .unwrap();
}

#[test]
fn recompute_tracks_new_height() {
    let mut map = RegionMap::default();
    map.insert("t", RegionSpec::new(1.0, 0.5).unwrap(), 800.0)
        .unwrap();
    assert!(approx(map.progress("t", 1000.0).unwrap(), 0.5));
    map.recompute(400.0);
    assert_eq!(map.progress("t", 1000.0), Some(1.0));
    assert!(map.remove("t"));
    assert_eq!(map.progress("t", 1000.0), None);
}
