use super::*;

#[test]
fn endpoints_are_fixed_for_every_curve() {
    for ease in [Ease::OutCubic, Ease::REVEAL] {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?}");
    }
}

#[test]
fn degenerate_bezier_is_linear() {
    let ease = Ease::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };
    for t in [0.1, 0.3, 0.5, 0.77] {
        assert!((ease.apply(t) - t).abs() < 1e-5, "t={t}");
    }
}

#[test]
fn reveal_curve_is_monotonic_and_front_loaded() {
    let mut prev = 0.0;
    for i in 1..=100 {
        let v = Ease::REVEAL.apply(f64::from(i) / 100.0);
        assert!(v >= prev - 1e-9);
        prev = v;
    }
    // Ease-out shape: ahead of linear at the midpoint.
    assert!(Ease::REVEAL.apply(0.5) > 0.5);
}

#[test]
fn out_cubic_matches_closed_form() {
    assert!((Ease::OutCubic.apply(0.5) - 0.875).abs() < 1e-12);
}

#[test]
fn reveal_curve_reads_from_config_json() {
    let ease: Ease =
        serde_json::from_str(r#"{"CubicBezier":{"x1":0.25,"y1":0.46,"x2":0.45,"y2":0.94}}"#)
            .unwrap();
    assert_eq!(ease, Ease::REVEAL);
    let out: Ease = serde_json::from_str(r#""OutCubic""#).unwrap();
    assert_eq!(out, Ease::OutCubic);
}
