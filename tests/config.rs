use playbook_pdf::Error;
use playbook_pdf::config::{AnnotStyle, Features, ListMode, Options, Region, Rgb};

#[test]
fn parses_long_and_short_hex_colors() {
    let c = Rgb::parse_hex("#ff8000").unwrap();
    assert_eq!((c.r, c.g, c.b), (1.0, 128.0 / 255.0, 0.0));

    let short = Rgb::parse_hex("#f80").unwrap();
    assert_eq!(short, Rgb::parse_hex("#ff8800").unwrap());
}

#[test]
fn rejects_malformed_colors() {
    for raw in ["202020", "#20202", "#gggggg", "#", "#2020200", "#é00"] {
        assert!(
            matches!(Rgb::parse_hex(raw), Err(Error::InvalidColor(_))),
            "{raw} should be rejected"
        );
    }
}

#[test]
fn default_style_matches_the_playbook_layout() {
    let style = AnnotStyle::default();
    assert_eq!(style.header_army, Region::new(0.0, 477.0, 157.0, 61.0));
    assert_eq!(style.top, Region::new(157.0, 445.0, 200.0, 93.0));
    assert_eq!(style.bottom, Region::new(157.0, 175.0, 200.0, 93.0));
    assert_eq!(style.font_face, "Helvetica");
    assert_eq!(style.color_fg, Rgb::parse_hex("#202020").unwrap());
    assert_eq!(style.color_bg, Rgb::parse_hex("#e3e3e3").unwrap());
    assert!((style.line_height(style.font_size) - 14.4).abs() < 1e-4);
    assert!((style.line_height(18.0) - 21.6).abs() < 1e-4);
    assert!(style.validate().is_ok());
}

#[test]
fn non_positive_sizes_are_rejected() {
    let mut style = AnnotStyle::default();
    style.font_size = 0.0;
    assert!(matches!(style.validate(), Err(Error::InvalidOption(_))));

    let mut style = AnnotStyle::default();
    style.line_spacing = f32::NAN;
    assert!(matches!(style.validate(), Err(Error::InvalidOption(_))));

    let mut style = AnnotStyle::default();
    style.font_face = "  ".into();
    assert!(matches!(style.validate(), Err(Error::InvalidOption(_))));
}

#[test]
fn list_modes_parse() {
    assert_eq!("full".parse::<ListMode>().unwrap(), ListMode::Full);
    assert_eq!("just_header".parse::<ListMode>().unwrap(), ListMode::JustHeader);
    assert_eq!("nothing".parse::<ListMode>().unwrap(), ListMode::Nothing);
    assert!(matches!("all".parse::<ListMode>(), Err(Error::InvalidOption(_))));
}

#[test]
fn default_features() {
    let f = Features::default();
    assert!(f.with_army_rule);
    assert!(f.with_detachment_rule);
    assert!(f.with_detachment_stratagems);
    assert!(f.with_detachment_enhancements);
    assert!(f.with_armoury);
    assert!(!f.with_armoury_padding);
    assert!(!f.with_unit_comp);
    assert!(f.with_unit_annot);
    assert_eq!(f.list_mode, ListMode::Full);

    let options = Options::default();
    assert!(options.library.index_dir.ends_with("data/pdf_index"));
}
