use chartframe::core::{OrdinalScale, Scale};
use chartframe::error::ChartError;

#[test]
fn linear_scale_round_trip_within_tolerance() {
    let scale = Scale::linear(10.0, 110.0)
        .expect("valid scale")
        .with_range(0.0, 1000.0)
        .expect("valid range");

    let original = 42.5;
    let px = scale.scale(original).expect("to device");
    let recovered = scale.invert(px).expect("from device");

    assert!((px - 325.0).abs() <= 1e-9);
    assert!((recovered - original).abs() <= 1e-9);
}

#[test]
fn vertical_range_runs_upward() {
    let scale = Scale::linear(0.0, 100.0)
        .expect("valid scale")
        .with_range(500.0, 100.0)
        .expect("valid range");

    assert!((scale.scale(0.0).expect("bottom") - 500.0).abs() <= 1e-9);
    assert!((scale.scale(75.0).expect("upper") - 200.0).abs() <= 1e-9);
}

#[test]
fn log_scale_spaces_decades_evenly() {
    let scale = Scale::log(1.0, 1000.0, 10.0)
        .expect("valid scale")
        .with_range(0.0, 300.0)
        .expect("valid range");

    assert!((scale.scale(10.0).expect("10") - 100.0).abs() <= 1e-9);
    assert!((scale.scale(100.0).expect("100") - 200.0).abs() <= 1e-9);
    assert!((scale.invert(150.0).expect("invert") - 10f64.powf(1.5)).abs() <= 1e-9);
}

#[test]
fn log_scale_rejects_non_positive_values() {
    assert!(matches!(
        Scale::log(0.0, 10.0, 10.0),
        Err(ChartError::Domain(_))
    ));
    let scale = Scale::log(1.0, 10.0, 10.0).expect("valid scale");
    assert!(matches!(scale.scale(-1.0), Err(ChartError::Domain(_))));
    assert!(Scale::log(1.0, 10.0, 1.0).is_err());
}

#[test]
fn zero_width_domain_maps_to_range_start() {
    let scale = Scale::linear(5.0, 5.0)
        .expect("valid scale")
        .with_range(20.0, 80.0)
        .expect("valid range");
    assert_eq!(scale.scale(123.0).expect("degenerate"), 20.0);
}

#[test]
fn normalize_is_clamped() {
    let scale = Scale::linear(0.0, 10.0).expect("valid scale");
    assert_eq!(scale.normalize(-5.0).expect("below"), 0.0);
    assert_eq!(scale.normalize(2.5).expect("inside"), 0.25);
    assert_eq!(scale.normalize(50.0).expect("above"), 1.0);
}

#[test]
fn non_finite_inputs_are_rejected() {
    assert!(Scale::linear(f64::NAN, 1.0).is_err());
    let scale = Scale::linear(0.0, 1.0).expect("valid scale");
    assert!(scale.scale(f64::INFINITY).is_err());
    assert!(scale.invert(f64::NAN).is_err());
}

#[test]
fn ordinal_scale_places_categories_on_slots() {
    let scale = Scale::ordinal(["north", "south", "east"])
        .expect("valid scale")
        .with_range(0.0, 300.0)
        .expect("valid range");

    assert_eq!(scale.domain(), (-0.5, 2.5));
    assert!((scale.scale_key("north").expect("north") - 50.0).abs() <= 1e-9);
    assert!((scale.scale_key("east").expect("east") - 250.0).abs() <= 1e-9);
    assert!(matches!(scale.scale_key("west"), Err(ChartError::Domain(_))));
    assert!(Scale::linear(0.0, 1.0).expect("linear").scale_key("north").is_err());
}

#[test]
fn ordinal_palette_recycles_outputs() {
    let mut palette = OrdinalScale::new(vec!["red", "green"])
        .with_implicit(true)
        .with_recycle(true);

    assert_eq!(palette.scale(&"a").expect("a"), "red");
    assert_eq!(palette.scale(&"b").expect("b"), "green");
    assert_eq!(palette.scale(&"c").expect("c"), "red");
    assert_eq!(palette.get(&"b").expect("known"), "green");
    assert!(palette.get(&"z").is_err());
}

#[test]
fn strict_ordinal_rejects_unknown_keys() {
    let mut mapper = OrdinalScale::new(vec![1, 2]);
    assert!(mapper.scale(&"missing").is_err());
}

#[test]
fn exhausted_outputs_do_not_consume_slots() {
    let mut palette = OrdinalScale::new(vec!["red", "green"]).with_implicit(true);
    assert_eq!(palette.scale(&"a").expect("a"), "red");
    assert_eq!(palette.scale(&"b").expect("b"), "green");
    assert!(matches!(palette.scale(&"c"), Err(ChartError::Domain(_))));
    assert!(palette.scale(&"d").is_err());
    assert_eq!(palette.len(), 2);

    let mut palette = palette.with_recycle(true);
    assert_eq!(palette.scale(&"e").expect("e"), "red");
    assert_eq!(palette.scale(&"f").expect("f"), "green");
}

#[test]
fn ordinal_scales_compare_by_slots_and_outputs() {
    let build = || {
        OrdinalScale::new(vec![0.0, 1.0])
            .with_domain(["low".to_owned(), "high".to_owned()])
            .expect("domain")
    };
    assert_eq!(build(), build());
    assert_ne!(build(), OrdinalScale::new(vec![0.0, 1.0]));
}
