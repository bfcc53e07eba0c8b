use serde::{Deserialize, Serialize};

use crate::core::format::{
    format_decimal, format_timestamp, magnitude_exponent, magnitude_suffix, precision_for_step,
};
use crate::core::scale::{Scale, ScaleKind};

const TICK_EPSILON: f64 = 1e-9;
const MAX_GENERATED_TICKS: f64 = 10_000.0;

const TIME_STEPS_SECONDS: [f64; 23] = [
    1.0,
    2.0,
    5.0,
    10.0,
    15.0,
    30.0,
    60.0,
    120.0,
    300.0,
    600.0,
    900.0,
    1_800.0,
    3_600.0,
    7_200.0,
    10_800.0,
    21_600.0,
    43_200.0,
    86_400.0,
    172_800.0,
    604_800.0,
    2_592_000.0,
    7_776_000.0,
    31_536_000.0,
];

/// Tick generation strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickerKind {
    /// "Nice" 1/2/5 x 10^n steps.
    Linear,
    /// Powers of `base`, with `m * base^k` minors.
    Log { base: f64 },
    /// Pre-supplied positions, optionally with parallel labels.
    Fixed {
        major: Vec<f64>,
        minor: Vec<f64>,
        labels: Option<Vec<String>>,
    },
    /// Unix-seconds domain with calendar-ish steps and UTC labels.
    Time,
}

/// Produces tick positions and labels for the current `start..end` domain.
///
/// The domain must be re-set before each query; results are derived on every
/// call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    kind: TickerKind,
    start: f64,
    end: f64,
    max_major_count: usize,
}

impl Ticker {
    #[must_use]
    pub fn new(kind: TickerKind) -> Self {
        Self {
            kind,
            start: 0.0,
            end: 1.0,
            max_major_count: 10,
        }
    }

    #[must_use]
    pub fn linear() -> Self {
        Self::new(TickerKind::Linear)
    }

    #[must_use]
    pub fn log(base: f64) -> Self {
        Self::new(TickerKind::Log { base })
    }

    #[must_use]
    pub fn time() -> Self {
        Self::new(TickerKind::Time)
    }

    #[must_use]
    pub fn fixed(major: Vec<f64>, minor: Vec<f64>) -> Self {
        Self::new(TickerKind::Fixed {
            major,
            minor,
            labels: None,
        })
    }

    /// Index ticker for categorical axes: majors on slots, minors between them.
    #[must_use]
    pub fn for_categories(labels: &[String]) -> Self {
        let major: Vec<f64> = (0..labels.len()).map(|i| i as f64).collect();
        let minor = if labels.is_empty() {
            Vec::new()
        } else {
            std::iter::once(-0.5)
                .chain(major.iter().map(|tick| tick + 0.5))
                .collect()
        };
        Self::new(TickerKind::Fixed {
            major,
            minor,
            labels: Some(labels.to_vec()),
        })
    }

    /// Attaches labels to a fixed ticker; ignored by other kinds.
    #[must_use]
    pub fn with_labels(mut self, new_labels: Vec<String>) -> Self {
        if let TickerKind::Fixed { labels, .. } = &mut self.kind {
            *labels = Some(new_labels);
        }
        self
    }

    #[must_use]
    pub fn with_max_major_count(mut self, count: usize) -> Self {
        self.max_major_count = count.max(2);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &TickerKind {
        &self.kind
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.kind {
            TickerKind::Linear => "linear",
            TickerKind::Log { .. } => "log",
            TickerKind::Fixed { .. } => "fixed",
            TickerKind::Time => "time",
        }
    }

    /// Whether this ticker can label the given scale.
    #[must_use]
    pub fn supports(&self, scale: &Scale) -> bool {
        match scale.kind() {
            ScaleKind::Linear => !matches!(self.kind, TickerKind::Log { .. }),
            ScaleKind::Log { .. } => {
                matches!(self.kind, TickerKind::Log { .. } | TickerKind::Fixed { .. })
            }
            ScaleKind::Ordinal(_) => matches!(self.kind, TickerKind::Fixed { .. }),
        }
    }

    pub fn set_domain(&mut self, start: f64, end: f64) {
        self.start = start;
        self.end = end;
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn major_ticks(&self) -> Vec<f64> {
        let (lo, hi) = self.bounds();
        if !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        match &self.kind {
            TickerKind::Linear => linear_ticks(lo, hi, self.linear_step()),
            TickerKind::Log { base } => {
                let majors = log_majors(lo, hi, *base, self.max_major_count);
                if majors.len() < 2 {
                    linear_ticks(lo, hi, self.linear_step())
                } else {
                    majors
                }
            }
            TickerKind::Fixed { major, .. } => filter_to_domain(major, lo, hi),
            TickerKind::Time => linear_ticks(lo, hi, self.time_step()),
        }
    }

    #[must_use]
    pub fn minor_ticks(&self) -> Vec<f64> {
        let (lo, hi) = self.bounds();
        if !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        match &self.kind {
            TickerKind::Linear => {
                let step = self.linear_step();
                linear_minor_ticks(lo, hi, step, minor_divisions(step))
            }
            TickerKind::Log { base } => {
                if log_majors(lo, hi, *base, self.max_major_count).len() < 2 {
                    let step = self.linear_step();
                    linear_minor_ticks(lo, hi, step, minor_divisions(step))
                } else {
                    log_minors(lo, hi, *base)
                }
            }
            TickerKind::Fixed { minor, .. } => filter_to_domain(minor, lo, hi),
            TickerKind::Time => {
                let step = self.time_step();
                let minor_step = TIME_STEPS_SECONDS
                    .iter()
                    .rev()
                    .copied()
                    .find(|candidate| *candidate < step && is_multiple(step, *candidate))
                    .unwrap_or(step / 2.0);
                linear_minor_ticks(lo, hi, step, (step / minor_step).round() as usize)
            }
        }
    }

    /// Labels parallel to [`Ticker::major_ticks`].
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let majors = self.major_ticks();
        match &self.kind {
            TickerKind::Fixed {
                major,
                labels: Some(labels),
                ..
            } => majors
                .iter()
                .map(|tick| fixed_label(*tick, major, labels))
                .collect(),
            _ => majors.iter().map(|tick| self.format(*tick)).collect(),
        }
    }

    /// Magnitude suffix shared by every label, empty when none applies.
    #[must_use]
    pub fn suffix(&self) -> String {
        match self.kind {
            TickerKind::Linear => magnitude_suffix(magnitude_exponent(self.start, self.end)),
            _ => String::new(),
        }
    }

    /// Formats a single value the way labels for the current domain are
    /// formatted, without the suffix.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match &self.kind {
            TickerKind::Linear => {
                let exponent = magnitude_exponent(self.start, self.end);
                let factor = 10f64.powi(exponent);
                let precision = precision_for_step(self.linear_step() / factor);
                format_decimal(value / factor, precision)
            }
            TickerKind::Log { .. } => format_log_value(value),
            TickerKind::Fixed {
                major,
                labels: Some(labels),
                ..
            } => fixed_label(value, major, labels),
            TickerKind::Fixed { major, .. } => {
                let precision = major
                    .iter()
                    .map(|tick| precision_for_step(tick.abs()))
                    .max()
                    .unwrap_or(0)
                    .min(6);
                format_decimal(value, precision)
            }
            TickerKind::Time => format_timestamp(value, time_pattern(self.time_step())),
        }
    }

    fn bounds(&self) -> (f64, f64) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    fn linear_step(&self) -> f64 {
        let (lo, hi) = self.bounds();
        nice_step(lo, hi, self.max_major_count)
    }

    fn time_step(&self) -> f64 {
        let (lo, hi) = self.bounds();
        let limit = self.max_major_count as f64;
        for step in TIME_STEPS_SECONDS {
            if tick_count(lo, hi, step) <= limit {
                return step;
            }
        }
        let year = TIME_STEPS_SECONDS[TIME_STEPS_SECONDS.len() - 1];
        nice_step(lo / year, hi / year, self.max_major_count).max(1.0) * year
    }
}

fn nice_step(lo: f64, hi: f64, max_count: usize) -> f64 {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    let raw = span / (max_count.max(2) - 1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    for mantissa in [1.0, 2.0, 5.0, 10.0] {
        let step = mantissa * magnitude;
        if tick_count(lo, hi, step) <= max_count as f64 {
            return step;
        }
    }
    10.0 * magnitude
}

fn minor_divisions(step: f64) -> usize {
    if step <= 0.0 {
        return 1;
    }
    let mantissa = step / 10f64.powf(step.log10().floor());
    if (mantissa - 2.0).abs() < 1e-6 { 4 } else { 5 }
}

fn tick_count(lo: f64, hi: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return f64::INFINITY;
    }
    (hi / step + TICK_EPSILON).floor() - (lo / step - TICK_EPSILON).ceil() + 1.0
}

fn linear_ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 {
        return if lo == hi { vec![lo] } else { Vec::new() };
    }
    let first = (lo / step - TICK_EPSILON).ceil();
    let last = (hi / step + TICK_EPSILON).floor();
    if last - first > MAX_GENERATED_TICKS {
        return Vec::new();
    }
    let tolerance = step * TICK_EPSILON;
    let mut ticks = Vec::new();
    let mut index = first;
    while index <= last {
        let mut value = index * step;
        if value.abs() < tolerance {
            value = 0.0;
        }
        ticks.push(value.clamp(lo, hi));
        index += 1.0;
    }
    ticks
}

fn linear_minor_ticks(lo: f64, hi: f64, step: f64, divisions: usize) -> Vec<f64> {
    if step <= 0.0 || divisions < 2 {
        return Vec::new();
    }
    let minor_step = step / divisions as f64;
    linear_ticks(lo, hi, minor_step)
        .into_iter()
        .filter(|tick| !is_multiple(*tick, step))
        .collect()
}

fn is_multiple(value: f64, step: f64) -> bool {
    let ratio = value / step;
    (ratio - ratio.round()).abs() < 1e-6
}

fn log_majors(lo: f64, hi: f64, base: f64, max_count: usize) -> Vec<f64> {
    if lo <= 0.0 || base <= 1.0 {
        return Vec::new();
    }
    let first = (lo.log(base) - TICK_EPSILON).ceil() as i32;
    let last = (hi.log(base) + TICK_EPSILON).floor() as i32;
    if last < first {
        return Vec::new();
    }
    let count = (last - first + 1) as usize;
    let stride = count.div_ceil(max_count.max(2)).max(1);
    (first..=last)
        .step_by(stride)
        .map(|power| base.powi(power).clamp(lo, hi))
        .collect()
}

fn log_minors(lo: f64, hi: f64, base: f64) -> Vec<f64> {
    let whole_base = base.round();
    if (base - whole_base).abs() > 1e-9 || whole_base < 3.0 {
        return Vec::new();
    }
    let first = lo.log(base).floor() as i32;
    let last = hi.log(base).ceil() as i32;
    let tolerance = hi * TICK_EPSILON;
    let mut ticks = Vec::new();
    for power in first..=last {
        let decade = base.powi(power);
        for multiplier in 2..(whole_base as u32) {
            let value = f64::from(multiplier) * decade;
            if value >= lo - tolerance && value <= hi + tolerance {
                ticks.push(value.clamp(lo, hi));
            }
        }
    }
    ticks
}

fn filter_to_domain(values: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    let tolerance = (hi - lo).abs().max(1.0) * TICK_EPSILON;
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite() && *value >= lo - tolerance && *value <= hi + tolerance)
        .collect()
}

fn fixed_label(value: f64, major: &[f64], labels: &[String]) -> String {
    major
        .iter()
        .position(|tick| (tick - value).abs() < 0.5)
        .and_then(|index| labels.get(index))
        .cloned()
        .unwrap_or_else(|| format_decimal(value, precision_for_step(value.abs()).min(6)))
}

fn format_log_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e6).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format_decimal(value, precision_for_step(magnitude).min(6))
    }
}

fn time_pattern(step: f64) -> &'static str {
    if step < 60.0 {
        "%H:%M:%S"
    } else if step < 86_400.0 {
        "%H:%M"
    } else if step < 2_592_000.0 {
        "%Y-%m-%d"
    } else {
        "%Y-%m"
    }
}

#[cfg(test)]
mod tests {
    use super::{Ticker, nice_step};

    #[test]
    fn nice_step_uses_one_two_five_ladder() {
        assert_eq!(nice_step(0.0, 10.0, 10), 2.0);
        assert_eq!(nice_step(0.0, 100.0, 10), 20.0);
        assert!((nice_step(0.0, 1.0, 10) - 0.2).abs() <= 1e-12);
    }

    #[test]
    fn log_ticker_falls_back_to_linear_in_narrow_domain() {
        let mut ticker = Ticker::log(10.0);
        ticker.set_domain(2.0, 8.0);
        let majors = ticker.major_ticks();
        assert!(majors.len() >= 2);
        assert!(majors.iter().all(|tick| (2.0..=8.0).contains(tick)));
    }

    #[test]
    fn category_ticker_labels_slots() {
        let labels = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let mut ticker = Ticker::for_categories(&labels);
        ticker.set_domain(-0.5, 2.5);
        assert_eq!(ticker.labels(), labels);
        assert_eq!(ticker.minor_ticks(), vec![-0.5, 0.5, 1.5, 2.5]);
    }
}
