use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};

/// Mapping variant of a [`Scale`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleKind {
    Linear,
    Log { base: f64 },
    /// Category labels mapped to integer slots, laid out linearly on
    /// `(-0.5, n - 0.5)`.
    Ordinal(OrdinalScale<String, f64>),
}

/// Numeric mapping between a data domain and a device range.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
    kind: ScaleKind,
}

impl Scale {
    pub fn linear(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        let mut scale = Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
            kind: ScaleKind::Linear,
        };
        scale.set_domain(domain_start, domain_end)?;
        Ok(scale)
    }

    pub fn log(domain_start: f64, domain_end: f64, base: f64) -> ChartResult<Self> {
        if !base.is_finite() || base <= 1.0 {
            return Err(ChartError::InvalidConfig(
                "log scale base must be finite and > 1".to_owned(),
            ));
        }
        let mut scale = Self {
            domain: (1.0, base),
            range: (0.0, 1.0),
            kind: ScaleKind::Log { base },
        };
        scale.set_domain(domain_start, domain_end)?;
        Ok(scale)
    }

    /// Creates a categorical scale whose labels occupy consecutive integer slots.
    pub fn ordinal<I, S>(labels: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let count = labels.len();
        let outputs = (0..count).map(|index| index as f64).collect();
        let mapper = OrdinalScale::new(outputs).with_domain(labels)?;
        let end = if count == 0 { 0.5 } else { count as f64 - 0.5 };
        Ok(Self {
            domain: (-0.5, end),
            range: (0.0, 1.0),
            kind: ScaleKind::Ordinal(mapper),
        })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        self.set_range(range_start, range_end)?;
        Ok(self)
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn kind(&self) -> &ScaleKind {
        &self.kind
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.kind {
            ScaleKind::Linear => "linear",
            ScaleKind::Log { .. } => "log",
            ScaleKind::Ordinal(_) => "ordinal",
        }
    }

    /// Category labels of an ordinal scale, in slot order.
    #[must_use]
    pub fn labels(&self) -> Option<Vec<String>> {
        match &self.kind {
            ScaleKind::Ordinal(mapper) => Some(mapper.domain().cloned().collect()),
            _ => None,
        }
    }

    pub fn set_domain(&mut self, start: f64, end: f64) -> ChartResult<()> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if matches!(self.kind, ScaleKind::Log { .. }) && (start <= 0.0 || end <= 0.0) {
            return Err(ChartError::Domain(format!(
                "log scale domain must be strictly positive, got ({start}, {end})"
            )));
        }
        self.domain = (start, end);
        Ok(())
    }

    pub fn set_range(&mut self, start: f64, end: f64) -> ChartResult<()> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        self.range = (start, end);
        Ok(())
    }

    /// Maps a data value to device units.
    ///
    /// A zero-width domain maps every value to the range start.
    pub fn scale(&self, value: f64) -> ChartResult<f64> {
        let t = self.fraction(value)?;
        Ok(self.range.0 + t * (self.range.1 - self.range.0))
    }

    /// Maps device units back to a data value.
    pub fn invert(&self, coord: f64) -> ChartResult<f64> {
        if !coord.is_finite() {
            return Err(ChartError::InvalidData(
                "device coordinate must be finite".to_owned(),
            ));
        }
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return Ok(self.domain.0);
        }
        let t = (coord - self.range.0) / span;
        let lo = self.transform(self.domain.0);
        let hi = self.transform(self.domain.1);
        Ok(self.untransform(lo + t * (hi - lo)))
    }

    /// Position of `value` within the domain, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> ChartResult<f64> {
        Ok(self.fraction(value)?.clamp(0.0, 1.0))
    }

    /// Maps an ordinal category to device units.
    pub fn scale_key(&self, key: &str) -> ChartResult<f64> {
        match &self.kind {
            ScaleKind::Ordinal(mapper) => self.scale(mapper.get(&key.to_owned())?),
            _ => Err(ChartError::Domain(format!(
                "{} scale has no category `{key}`",
                self.name()
            ))),
        }
    }

    fn fraction(&self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }
        if matches!(self.kind, ScaleKind::Log { .. }) && value <= 0.0 {
            return Err(ChartError::Domain(format!(
                "log scale cannot map non-positive value {value}"
            )));
        }
        let lo = self.transform(self.domain.0);
        let hi = self.transform(self.domain.1);
        let span = hi - lo;
        if span == 0.0 {
            return Ok(0.0);
        }
        Ok((self.transform(value) - lo) / span)
    }

    fn transform(&self, value: f64) -> f64 {
        match self.kind {
            ScaleKind::Log { .. } => value.ln(),
            _ => value,
        }
    }

    fn untransform(&self, value: f64) -> f64 {
        match self.kind {
            ScaleKind::Log { .. } => value.exp(),
            _ => value,
        }
    }
}

/// Discrete mapping from keys to an output sequence.
///
/// With `implicit` enabled unknown keys get the next free slot; otherwise they
/// fail with [`ChartError::Domain`]. With `recycle` enabled slots freed by
/// [`OrdinalScale::remove`] are reused and slots past the end of the output
/// sequence wrap around.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale<K: Eq + Hash, V> {
    slots: IndexMap<K, usize>,
    outputs: Vec<V>,
    implicit: bool,
    recycle: bool,
    freed: Vec<usize>,
    next_slot: usize,
}

impl<K, V> OrdinalScale<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    #[must_use]
    pub fn new(outputs: Vec<V>) -> Self {
        Self {
            slots: IndexMap::new(),
            outputs,
            implicit: false,
            recycle: false,
            freed: Vec::new(),
            next_slot: 0,
        }
    }

    /// Registers explicit keys in order. Duplicates are rejected.
    pub fn with_domain<I>(mut self, keys: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            if self.slots.contains_key(&key) {
                return Err(ChartError::InvalidConfig(format!(
                    "duplicate ordinal key {key:?}"
                )));
            }
            let slot = self.next_slot;
            self.next_slot += 1;
            self.slots.insert(key, slot);
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_implicit(mut self, implicit: bool) -> Self {
        self.implicit = implicit;
        self
    }

    #[must_use]
    pub fn with_recycle(mut self, recycle: bool) -> Self {
        self.recycle = recycle;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn domain(&self) -> impl Iterator<Item = &K> {
        self.slots.keys()
    }

    /// Looks a key up without allocating a slot.
    pub fn get(&self, key: &K) -> ChartResult<V> {
        match self.slots.get(key) {
            Some(slot) => self.output(*slot),
            None => Err(ChartError::Domain(format!("unknown ordinal key {key:?}"))),
        }
    }

    /// Looks a key up, allocating a slot for unknown keys when implicit.
    pub fn scale(&mut self, key: &K) -> ChartResult<V> {
        if let Some(slot) = self.slots.get(key) {
            return self.output(*slot);
        }
        if !self.implicit {
            return Err(ChartError::Domain(format!("unknown ordinal key {key:?}")));
        }

        let slot = self.free_slot();
        let value = self.output(slot)?;
        self.claim_slot(slot);
        self.slots.insert(key.clone(), slot);
        Ok(value)
    }

    pub fn remove(&mut self, key: &K) -> bool {
        match self.slots.shift_remove(key) {
            Some(slot) => {
                if self.recycle {
                    self.freed.push(slot);
                }
                true
            }
            None => false,
        }
    }

    /// Slot the next unknown key would take; nothing is reserved yet.
    fn free_slot(&self) -> usize {
        if self.recycle {
            if let Some(slot) = self.freed.iter().min() {
                return *slot;
            }
        }
        self.next_slot
    }

    fn claim_slot(&mut self, slot: usize) {
        if let Some(index) = self.freed.iter().position(|freed| *freed == slot) {
            self.freed.swap_remove(index);
        } else {
            self.next_slot = self.next_slot.max(slot + 1);
        }
    }

    fn output(&self, slot: usize) -> ChartResult<V> {
        if self.outputs.is_empty() {
            return Err(ChartError::Domain(
                "ordinal scale has no output values".to_owned(),
            ));
        }
        if let Some(value) = self.outputs.get(slot) {
            return Ok(value.clone());
        }
        if self.recycle {
            return Ok(self.outputs[slot % self.outputs.len()].clone());
        }
        Err(ChartError::Domain(format!(
            "ordinal slot {slot} exceeds {} output values",
            self.outputs.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::{OrdinalScale, Scale};

    #[test]
    fn zero_width_domain_maps_to_range_start() {
        let scale = Scale::linear(3.0, 3.0)
            .and_then(|s| s.with_range(10.0, 110.0))
            .expect("scale");
        assert_eq!(scale.scale(3.0).expect("map"), 10.0);
        assert_eq!(scale.scale(99.0).expect("map"), 10.0);
    }

    #[test]
    fn implicit_ordinal_allocates_stable_slots() {
        let mut scale = OrdinalScale::new(vec!["red", "green"])
            .with_implicit(true)
            .with_recycle(true);
        assert_eq!(scale.scale(&"A").expect("a"), "red");
        assert_eq!(scale.scale(&"B").expect("b"), "green");
        assert_eq!(scale.scale(&"C").expect("c"), "red");
        assert_eq!(scale.scale(&"A").expect("a again"), "red");
    }

    #[test]
    fn recycle_reuses_removed_slot() {
        let mut scale = OrdinalScale::new(vec![1, 2, 3])
            .with_implicit(true)
            .with_recycle(true);
        scale.scale(&"x").expect("x");
        scale.scale(&"y").expect("y");
        assert!(scale.remove(&"x"));
        assert_eq!(scale.scale(&"z").expect("z"), 1);
    }

    #[test]
    fn explicit_ordinal_rejects_unknown_key() {
        let mut scale = OrdinalScale::new(vec![0.0, 1.0])
            .with_domain(["a", "b"])
            .expect("domain");
        assert!(scale.scale(&"c").is_err());
    }

    #[test]
    fn exhausted_outputs_fail_without_recycle() {
        let mut scale = OrdinalScale::new(vec![1]).with_implicit(true);
        scale.scale(&"a").expect("a");
        assert!(scale.scale(&"b").is_err());
    }
}
