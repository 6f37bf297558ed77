//! Unsigned constant-range domain.
//!
//! An element is a wrap-free unsigned interval `[lo, hi]` of `BW`-bit values.
//! Any pair with `lo > hi` denotes `⊥` and is kept in the canonical form
//! `[max, 0]`.

use std::cmp::{max, min};
use std::fmt;
use std::ops::Index;

use num_bigint::BigUint;
use rand::Rng;

use crate::apint::ApInt;
use crate::domain::{expect_parts, AbstractDomain, DomainFamily};

/// Family marker for [`ConstRange`].
#[derive(Debug, Clone, Copy)]
pub struct ConstRangeDomain;

impl DomainFamily for ConstRangeDomain {
    type Of<const BW: usize> = ConstRange<BW>;
}

/// Unsigned interval at width `BW`. Components: `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstRange<const BW: usize> {
    bounds: [ApInt<BW>; 2],
}

impl<const BW: usize> ConstRange<BW> {
    /// Creates the interval `[lo, hi]`, truncating both bounds to `BW` bits.
    pub fn new(lo: u64, hi: u64) -> Self {
        Self::from_bounds(ApInt::new(lo), ApInt::new(hi))
    }

    fn from_bounds(lo: ApInt<BW>, hi: ApInt<BW>) -> Self {
        if lo > hi {
            return Self::bottom();
        }
        Self { bounds: [lo, hi] }
    }

    pub fn lo(&self) -> ApInt<BW> {
        self.bounds[0]
    }

    pub fn hi(&self) -> ApInt<BW> {
        self.bounds[1]
    }

    /// Returns `true` if `v` lies inside the interval.
    pub fn contains(&self, v: ApInt<BW>) -> bool {
        self.lo() <= v && v <= self.hi()
    }
}

impl<const BW: usize> Index<usize> for ConstRange<BW> {
    type Output = ApInt<BW>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bounds[index]
    }
}

impl<const BW: usize> AbstractDomain<BW> for ConstRange<BW> {
    const ARITY: usize = 2;
    const NAME: &'static str = "ConstRange";

    fn from_parts(parts: &[ApInt<BW>]) -> Self {
        expect_parts::<BW, Self>(parts);
        Self::from_bounds(parts[0], parts[1])
    }

    /// Two independent uniform values, sorted.
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let a = ApInt::random(rng);
        let b = ApInt::random(rng);
        Self::from_bounds(min(a, b), max(a, b))
    }

    fn bottom() -> Self {
        Self {
            bounds: [ApInt::all_ones(), ApInt::zero()],
        }
    }

    fn top() -> Self {
        Self {
            bounds: [ApInt::zero(), ApInt::all_ones()],
        }
    }

    fn enum_lattice() -> Vec<Self> {
        let mut elems = vec![Self::bottom()];
        for lo in ApInt::<BW>::all() {
            for hi in (lo.zext()..=ApInt::<BW>::MASK).map(ApInt::new) {
                elems.push(Self { bounds: [lo, hi] });
            }
        }
        elems
    }

    fn from_concrete(v: ApInt<BW>) -> Self {
        Self { bounds: [v, v] }
    }

    fn max_dist() -> f64 {
        2.0 * ApInt::<BW>::MASK as f64
    }

    fn is_top(&self) -> bool {
        *self == Self::top()
    }

    fn is_bottom(&self) -> bool {
        self.lo() > self.hi()
    }

    fn meet(&self, other: &Self) -> Self {
        Self::from_bounds(max(self.lo(), other.lo()), min(self.hi(), other.hi()))
    }

    fn join(&self, other: &Self) -> Self {
        if self.is_bottom() {
            return *other;
        }
        if other.is_bottom() {
            return *self;
        }
        Self::from_bounds(min(self.lo(), other.lo()), max(self.hi(), other.hi()))
    }

    fn to_concrete(&self) -> Vec<ApInt<BW>> {
        if self.is_bottom() {
            return Vec::new();
        }
        (self.lo().zext()..=self.hi().zext()).map(ApInt::new).collect()
    }

    fn distance(&self, other: &Self) -> u64 {
        let lo = self.lo().zext().abs_diff(other.lo().zext());
        let hi = self.hi().zext().abs_diff(other.hi().zext());
        lo.saturating_add(hi)
    }

    fn sample_concrete<R: Rng + ?Sized>(&self, rng: &mut R) -> ApInt<BW> {
        assert!(!self.is_bottom(), "cannot sample a concrete value from ⊥");
        ApInt::new(rng.random_range(self.lo().zext()..=self.hi().zext()))
    }

    fn concrete_size(&self) -> BigUint {
        if self.is_bottom() {
            return BigUint::from(0u8);
        }
        BigUint::from(self.hi().zext() - self.lo().zext()) + 1u8
    }
}

impl<const BW: usize> fmt::Display for ConstRange<BW> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bottom() {
            write!(f, "⊥")
        } else {
            write!(f, "[{}, {}]", self.lo(), self.hi())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tests::check_domain_laws;

    use test_log::test;

    #[test]
    fn test_range_laws() {
        check_domain_laws::<1, ConstRange<1>>();
        check_domain_laws::<3, ConstRange<3>>();
        check_domain_laws::<4, ConstRange<4>>();
    }

    #[test]
    fn test_range_lattice_size() {
        // 2^BW * (2^BW + 1) / 2 proper intervals plus bottom
        assert_eq!(ConstRange::<3>::enum_lattice().len(), 8 * 9 / 2 + 1);
        assert_eq!(ConstRange::<4>::enum_lattice().len(), 16 * 17 / 2 + 1);
    }

    #[test]
    fn test_range_join_meet() {
        let a = ConstRange::<8>::new(3, 10);
        let b = ConstRange::<8>::new(7, 20);
        assert_eq!(a.join(&b), ConstRange::new(3, 20));
        assert_eq!(a.meet(&b), ConstRange::new(7, 10));
        assert!(a.meet(&ConstRange::new(11, 12)).is_bottom());
    }

    #[test]
    fn test_range_truncates() {
        let r = ConstRange::<4>::new(17, 18);
        assert_eq!(r, ConstRange::new(1, 2));
        assert_eq!(r.to_string(), "[1, 2]");
    }

    #[test]
    fn test_range_distance() {
        let a = ConstRange::<4>::new(0, 15);
        let b = ConstRange::<4>::new(3, 5);
        assert_eq!(a.distance(&b), 3 + 10);
        assert_eq!(ConstRange::<4>::max_dist(), 30.0);
        assert_eq!(ConstRange::<4>::bottom().distance(&ConstRange::top()), 30);
    }

    #[test]
    fn test_range_concrete_size_wide() {
        assert_eq!(ConstRange::<64>::top().concrete_size(), BigUint::from(1u8) << 64u32);
        assert_eq!(ConstRange::<64>::new(10, 19).concrete_size(), BigUint::from(10u8));
    }
}
