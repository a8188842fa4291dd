use super::*;
use serde_json::json;

#[test]
fn display_matches_css_rgb() {
    assert_eq!(Color::grey(127.5).to_string(), "rgb(127.5, 127.5, 127.5)");
    assert_eq!(Color::WHITE.to_string(), "rgb(255, 255, 255)");
    assert_eq!(
        Color::rgba(66.0, 133.0, 244.0, 0.8).to_string(),
        "rgba(66, 133, 244, 0.8)"
    );
}

#[test]
fn hex_round_trips_through_parse() {
    let c: Color = "#9CA3AF".parse().unwrap();
    assert_eq!(c, Color::rgb(156.0, 163.0, 175.0));
    assert_eq!(c.to_hex(), "#9ca3af");
    assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
    assert_eq!(Color::grey(127.5).to_hex(), "#808080");
}

#[test]
fn parses_functional_notation() {
    assert_eq!(
        "rgb(10, 20, 30)".parse::<Color>().unwrap(),
        Color::rgb(10.0, 20.0, 30.0)
    );
    assert_eq!(
        " RGBA(66, 133, 244, 0.8) ".parse::<Color>().unwrap(),
        Color::rgba(66.0, 133.0, 244.0, 0.8)
    );
}

#[test]
fn rejects_malformed_colors() {
    for bad in ["#12345", "#gg0000", "rgb(1, 2)", "rgba(1, 2, 3)", "hsl(0, 0, 0)", "rgb(1, 2, 3"] {
        let err = bad.parse::<Color>().unwrap_err();
        assert!(matches!(err, EngineError::Config(_)), "{bad}");
    }
}

#[test]
fn deserializes_strings_objects_and_arrays() {
    let c: Color = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Color::rgb(255.0, 0.0, 0.0));

    let c: Color = serde_json::from_value(json!({"r": 1.0, "g": 2.0, "b": 3.0})).unwrap();
    assert_eq!(c, Color::rgb(1.0, 2.0, 3.0));

    let c: Color = serde_json::from_value(json!([1.0, 2.0, 3.0, 0.5])).unwrap();
    assert_eq!(c, Color::rgba(1.0, 2.0, 3.0, 0.5));

    assert!(serde_json::from_value::<Color>(json!([1.0])).is_err());
}

#[test]
fn serializes_as_css_string() {
    assert_eq!(
        serde_json::to_value(Color::BLACK).unwrap(),
        json!("rgb(0, 0, 0)")
    );
}
