use chartframe::core::Ticker;
use proptest::prelude::*;

fn within(ticks: &[f64], lo: f64, hi: f64) -> bool {
    let epsilon = 1e-9 * (hi - lo).abs().max(1.0);
    ticks.iter().all(|tick| *tick >= lo - epsilon && *tick <= hi + epsilon)
}

proptest! {
    #[test]
    fn linear_ticks_stay_in_domain(
        start in -1_000_000.0f64..1_000_000.0,
        span in 0.000_1f64..1_000_000.0
    ) {
        let end = start + span;
        let mut ticker = Ticker::linear();
        ticker.set_domain(start, end);

        let majors = ticker.major_ticks();
        prop_assert!(within(&majors, start, end));
        prop_assert!(within(&ticker.minor_ticks(), start, end));
        prop_assert_eq!(ticker.labels().len(), majors.len());
    }

    #[test]
    fn log_ticks_stay_in_domain(
        start_exp in -5.0f64..5.0,
        decades in 0.1f64..10.0
    ) {
        let start = 10f64.powf(start_exp);
        let end = 10f64.powf(start_exp + decades);
        let mut ticker = Ticker::log(10.0);
        ticker.set_domain(start, end);

        let majors = ticker.major_ticks();
        prop_assert!(within(&majors, start, end));
        prop_assert!(within(&ticker.minor_ticks(), start, end));
        prop_assert_eq!(ticker.labels().len(), majors.len());
    }

    #[test]
    fn time_ticks_stay_in_domain(
        start in 0.0f64..2_000_000_000.0,
        span in 1.0f64..100_000_000.0
    ) {
        let end = start + span;
        let mut ticker = Ticker::time();
        ticker.set_domain(start, end);

        let majors = ticker.major_ticks();
        prop_assert!(within(&majors, start, end));
        prop_assert!(within(&ticker.minor_ticks(), start, end));
        prop_assert_eq!(ticker.labels().len(), majors.len());
    }
}
