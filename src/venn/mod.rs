//! Two- and three-set Venn diagrams.
//!
//! [`solver`] places circles for the requested proportionality mode,
//! [`regions`] traces the seven set-combination regions over a circle
//! arrangement and [`diagram`] wraps both as an in-frame chart graphic.

pub mod diagram;
pub mod geometry;
pub mod regions;
pub mod solver;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub use diagram::{VennCircle, VennDiagram, VennRegion, VennSolution};
pub use geometry::{Circle, lens_area};
pub use regions::{ArcSegment, Region, RegionShape, make_regions, region_areas};
pub use solver::{VennSolverConfig, calc_bbox, calc_coords, calc_distance, calc_venn, fit_into};

/// How strictly circle and overlap areas follow the input values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VennMode {
    /// Equal fixed circles; only presence of the third set matters.
    None,
    /// Circle areas are proportional, overlaps are only placed plausibly.
    #[default]
    Semi,
    /// Circle and overlap areas are matched numerically.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircleKey {
    A,
    B,
    C,
}

impl CircleKey {
    pub const ALL: [CircleKey; 3] = [CircleKey::A, CircleKey::B, CircleKey::C];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            CircleKey::A => 0,
            CircleKey::B => 1,
            CircleKey::C => 2,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CircleKey::A => "A",
            CircleKey::B => "B",
            CircleKey::C => "C",
        }
    }
}

/// One of the seven set combinations, named by its member circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKey {
    A,
    B,
    AB,
    C,
    AC,
    BC,
    ABC,
}

impl RegionKey {
    pub const ALL: [RegionKey; 7] = [
        RegionKey::A,
        RegionKey::B,
        RegionKey::AB,
        RegionKey::C,
        RegionKey::AC,
        RegionKey::BC,
        RegionKey::ABC,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RegionKey::A => "a",
            RegionKey::B => "b",
            RegionKey::AB => "ab",
            RegionKey::C => "c",
            RegionKey::AC => "ac",
            RegionKey::BC => "bc",
            RegionKey::ABC => "abc",
        }
    }

    /// Membership flags in A, B, C order.
    #[must_use]
    pub const fn members(self) -> [bool; 3] {
        match self {
            RegionKey::A => [true, false, false],
            RegionKey::B => [false, true, false],
            RegionKey::AB => [true, true, false],
            RegionKey::C => [false, false, true],
            RegionKey::AC => [true, false, true],
            RegionKey::BC => [false, true, true],
            RegionKey::ABC => [true, true, true],
        }
    }

    #[must_use]
    pub const fn contains(self, circle: CircleKey) -> bool {
        self.members()[circle.index()]
    }

    /// Region whose membership flags match, `None` for the outside.
    #[must_use]
    pub fn from_members(members: [bool; 3]) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.members() == members)
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Item counts unique to each region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VennValues {
    pub a: f64,
    pub b: f64,
    pub ab: f64,
    pub c: f64,
    pub ac: f64,
    pub bc: f64,
    pub abc: f64,
}

impl VennValues {
    pub fn new(a: f64, b: f64, ab: f64, c: f64, ac: f64, bc: f64, abc: f64) -> ChartResult<Self> {
        let values = Self {
            a,
            b,
            ab,
            c,
            ac,
            bc,
            abc,
        };
        values.validate()?;
        Ok(values)
    }

    pub fn two_sets(a: f64, b: f64, ab: f64) -> ChartResult<Self> {
        Self::new(a, b, ab, 0.0, 0.0, 0.0, 0.0)
    }

    /// Accepts `[a, b, ab]` or `[a, b, ab, c, ac, bc, abc]`.
    pub fn from_slice(values: &[f64]) -> ChartResult<Self> {
        match *values {
            [a, b, ab] => Self::two_sets(a, b, ab),
            [a, b, ab, c, ac, bc, abc] => Self::new(a, b, ab, c, ac, bc, abc),
            _ => Err(ChartError::VennInput {
                expected: "3 or 7",
                actual: values.len(),
            }),
        }
    }

    fn validate(&self) -> ChartResult<()> {
        for key in RegionKey::ALL {
            let value = self.get(key);
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "venn value `{key}` must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn get(&self, key: RegionKey) -> f64 {
        match key {
            RegionKey::A => self.a,
            RegionKey::B => self.b,
            RegionKey::AB => self.ab,
            RegionKey::C => self.c,
            RegionKey::AC => self.ac,
            RegionKey::BC => self.bc,
            RegionKey::ABC => self.abc,
        }
    }

    /// Sum of every region inside `circle`.
    #[must_use]
    pub fn circle_total(&self, circle: CircleKey) -> f64 {
        RegionKey::ALL
            .into_iter()
            .filter(|key| key.contains(circle))
            .map(|key| self.get(key))
            .sum()
    }

    /// Shared count of two circles, including the triple overlap.
    #[must_use]
    pub fn pair_overlap(&self, first: CircleKey, second: CircleKey) -> f64 {
        RegionKey::ALL
            .into_iter()
            .filter(|key| key.contains(first) && key.contains(second))
            .map(|key| self.get(key))
            .sum()
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        RegionKey::ALL.into_iter().map(|key| self.get(key)).sum()
    }

    #[must_use]
    pub fn has_third_set(&self) -> bool {
        self.circle_total(CircleKey::C) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{CircleKey, RegionKey, VennValues};

    #[test]
    fn circle_totals_sum_member_regions() {
        let values = VennValues::new(10.0, 8.0, 22.0, 6.0, 9.0, 4.0, 2.0).expect("values");
        assert_eq!(values.circle_total(CircleKey::A), 43.0);
        assert_eq!(values.circle_total(CircleKey::B), 36.0);
        assert_eq!(values.circle_total(CircleKey::C), 21.0);
        assert_eq!(values.pair_overlap(CircleKey::A, CircleKey::B), 24.0);
        assert_eq!(values.total(), 61.0);
    }

    #[test]
    fn slice_length_is_checked() {
        assert!(VennValues::from_slice(&[1.0, 2.0, 3.0]).is_ok());
        assert!(VennValues::from_slice(&[1.0, 2.0]).is_err());
        assert!(VennValues::from_slice(&[1.0, 2.0, 3.0, -1.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn region_membership_round_trips() {
        for key in RegionKey::ALL {
            assert_eq!(RegionKey::from_members(key.members()), Some(key));
        }
        assert_eq!(RegionKey::from_members([false, false, false]), None);
    }
}
