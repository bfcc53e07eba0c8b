use chartframe::core::Scale;
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_scale_round_trip_property(
        start in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        value_factor in 0.0f64..1.0,
        device_span in 1.0f64..4096.0
    ) {
        let end = start + span;
        let value = start + value_factor * span;

        let scale = Scale::linear(start, end)
            .expect("valid scale")
            .with_range(0.0, device_span)
            .expect("valid range");

        let px = scale.scale(value).expect("to device");
        let recovered = scale.invert(px).expect("from device");

        prop_assert!((recovered - value).abs() <= 1e-7 * span.max(1.0));
    }

    #[test]
    fn log_scale_round_trip_property(
        start_exp in -6.0f64..6.0,
        decades in 0.5f64..8.0,
        value_factor in 0.0f64..1.0,
        base in prop::sample::select(vec![2.0f64, std::f64::consts::E, 10.0])
    ) {
        let start = 10f64.powf(start_exp);
        let end = 10f64.powf(start_exp + decades);
        let value = 10f64.powf(start_exp + value_factor * decades);

        let scale = Scale::log(start, end, base)
            .expect("valid scale")
            .with_range(1024.0, 0.0)
            .expect("valid range");

        let px = scale.scale(value).expect("to device");
        let recovered = scale.invert(px).expect("from device");

        prop_assert!(((recovered - value) / value).abs() <= 1e-9);
    }

    #[test]
    fn normalize_stays_in_unit_interval(
        start in -1_000.0f64..1_000.0,
        span in -1_000.0f64..1_000.0,
        value in -10_000.0f64..10_000.0
    ) {
        let scale = Scale::linear(start, start + span).expect("valid scale");
        let t = scale.normalize(value).expect("normalize");
        prop_assert!((0.0..=1.0).contains(&t));
    }
}
