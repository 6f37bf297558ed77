//! Known-bits abstract domain.
//!
//! Each bit of a value is either known to be `0`, known to be `1`, or unknown.
//! An element is a pair of masks `(zero, one)`: bit `i` set in `zero` means the
//! bit is known to be `0`, set in `one` means it is known to be `1`.
//!
//! # Elements
//!
//! - `⊤`: both masks empty, every bit unknown
//! - `⊥`: any pair with a bit set in both masks (a contradiction), kept in the
//!   canonical form `(all_ones, all_ones)`
//! - constants: `zero = !v`, `one = v`
//!
//! The lattice has `3^BW + 1` elements.

use std::fmt;
use std::ops::Index;

use num_bigint::BigUint;
use rand::Rng;

use crate::apint::ApInt;
use crate::domain::{expect_parts, AbstractDomain, DomainFamily};

/// Family marker for [`KnownBits`].
#[derive(Debug, Clone, Copy)]
pub struct KnownBitsDomain;

impl DomainFamily for KnownBitsDomain {
    type Of<const BW: usize> = KnownBits<BW>;
}

/// Known-bits element at width `BW`. Components: `[zero, one]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KnownBits<const BW: usize> {
    masks: [ApInt<BW>; 2],
}

impl<const BW: usize> KnownBits<BW> {
    /// Creates an element from its masks, canonicalizing contradictions to `⊥`.
    pub fn new(zero: ApInt<BW>, one: ApInt<BW>) -> Self {
        if (zero & one) != ApInt::zero() {
            return Self::bottom();
        }
        Self { masks: [zero, one] }
    }

    /// Bits known to be zero.
    pub fn zero(&self) -> ApInt<BW> {
        self.masks[0]
    }

    /// Bits known to be one.
    pub fn one(&self) -> ApInt<BW> {
        self.masks[1]
    }

    /// Bits that are not known.
    pub fn unknown(&self) -> ApInt<BW> {
        !(self.zero() | self.one())
    }

    /// Returns the constant value if every bit is known.
    pub fn as_constant(&self) -> Option<ApInt<BW>> {
        if !self.is_bottom() && self.unknown() == ApInt::zero() {
            Some(self.one())
        } else {
            None
        }
    }
}

impl<const BW: usize> Index<usize> for KnownBits<BW> {
    type Output = ApInt<BW>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.masks[index]
    }
}

impl<const BW: usize> AbstractDomain<BW> for KnownBits<BW> {
    const ARITY: usize = 2;
    const NAME: &'static str = "KnownBits";

    fn from_parts(parts: &[ApInt<BW>]) -> Self {
        expect_parts::<BW, Self>(parts);
        Self::new(parts[0], parts[1])
    }

    /// Every bit is independently known-zero, known-one or unknown, with equal probability.
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut zero = 0u64;
        let mut one = 0u64;
        for i in 0..BW {
            match rng.random_range(0..3u8) {
                0 => zero |= 1 << i,
                1 => one |= 1 << i,
                _ => {}
            }
        }
        Self::new(ApInt::new(zero), ApInt::new(one))
    }

    fn bottom() -> Self {
        Self {
            masks: [ApInt::all_ones(), ApInt::all_ones()],
        }
    }

    fn top() -> Self {
        Self {
            masks: [ApInt::zero(), ApInt::zero()],
        }
    }

    fn enum_lattice() -> Vec<Self> {
        let mut elems = vec![Self::bottom()];
        let count = 3u64.pow(BW as u32);
        for code in 0..count {
            let mut rest = code;
            let mut zero = 0u64;
            let mut one = 0u64;
            for i in 0..BW {
                match rest % 3 {
                    0 => zero |= 1 << i,
                    1 => one |= 1 << i,
                    _ => {}
                }
                rest /= 3;
            }
            elems.push(Self::new(ApInt::new(zero), ApInt::new(one)));
        }
        elems
    }

    fn from_concrete(v: ApInt<BW>) -> Self {
        Self { masks: [!v, v] }
    }

    fn max_dist() -> f64 {
        (2 * BW) as f64
    }

    fn is_top(&self) -> bool {
        self.zero() == ApInt::zero() && self.one() == ApInt::zero()
    }

    fn is_bottom(&self) -> bool {
        (self.zero() & self.one()) != ApInt::zero()
    }

    fn meet(&self, other: &Self) -> Self {
        Self::new(self.zero() | other.zero(), self.one() | other.one())
    }

    fn join(&self, other: &Self) -> Self {
        if self.is_bottom() {
            return *other;
        }
        if other.is_bottom() {
            return *self;
        }
        Self::new(self.zero() & other.zero(), self.one() & other.one())
    }

    fn to_concrete(&self) -> Vec<ApInt<BW>> {
        if self.is_bottom() {
            return Vec::new();
        }

        let unknown = self.unknown().zext();
        let one = self.one().zext();
        let mut values = Vec::with_capacity(1 << unknown.count_ones().min(16));

        // Walk the submasks of `unknown` in ascending order.
        let mut sub = 0u64;
        loop {
            values.push(ApInt::new(one | sub));
            if sub == unknown {
                break;
            }
            sub = (sub | !unknown).wrapping_add(1) & unknown;
        }
        values
    }

    fn distance(&self, other: &Self) -> u64 {
        ((self.zero() ^ other.zero()).count_ones() + (self.one() ^ other.one()).count_ones()) as u64
    }

    fn sample_concrete<R: Rng + ?Sized>(&self, rng: &mut R) -> ApInt<BW> {
        assert!(!self.is_bottom(), "cannot sample a concrete value from ⊥");
        (ApInt::random(rng) & self.unknown()) | self.one()
    }

    fn concrete_size(&self) -> BigUint {
        if self.is_bottom() {
            return BigUint::from(0u8);
        }
        BigUint::from(1u8) << self.unknown().count_ones()
    }
}

impl<const BW: usize> fmt::Display for KnownBits<BW> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bottom() {
            return write!(f, "⊥");
        }
        for i in (0..BW).rev() {
            let bit = 1u64 << i;
            let c = if self.zero().zext() & bit != 0 {
                '0'
            } else if self.one().zext() & bit != 0 {
                '1'
            } else {
                '?'
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
