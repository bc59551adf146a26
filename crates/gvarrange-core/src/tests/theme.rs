use crate::theme::{Rgb, Rgba, Theme};

#[test]
fn colours_format_as_hex() {
    assert_eq!(Rgb([1.0, 0.0, 0.5]).to_dot(), "#ff0080");
    assert_eq!(Rgba([0.0, 0.2, 1.0, 0.5]).to_dot(), "#0033ff80");
}

#[test]
fn out_of_range_channels_are_clamped() {
    assert_eq!(Rgb([-0.5, 2.0, 1.0]).to_dot(), "#00ffff");
}

#[test]
fn theme_deserializes_partially() {
    let theme: Theme = serde_json::from_str(r#"{ "wire": [1.0, 1.0, 1.0, 1.0] }"#).unwrap();
    assert_eq!(theme.wire.to_dot(), "#ffffffff");
    assert_eq!(theme.text, Theme::default().text);
}
