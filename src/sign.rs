//! Flat sign domain over two's complement bit-vectors.
//!
//! The sign domain tracks whether a `BW`-bit value, read as a signed integer,
//! is negative, zero or positive. Unlike a powerset of signs, the lattice is
//! flat: any two distinct signs join to `⊤`.
//!
//! # Elements
//!
//! - `⊥` (Bottom): no values
//! - `-` (Neg): `[-2^(BW-1), -1]`
//! - `0` (Zero): exactly zero
//! - `+` (Pos): `[1, 2^(BW-1) - 1]`
//! - `⊤` (Top): any value
//!
//! # Lattice Structure
//!
//! ```text
//!       ⊤
//!     / | \
//!    -  0  +
//!     \ | /
//!       ⊥
//! ```
//!
//! An element is stored as the signed bounds of the range it denotes, so it has
//! the same two components as a signed interval. Requires `BW >= 2`, otherwise
//! `+` would be empty.

use std::fmt;
use std::ops::Index;

use num_bigint::BigUint;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::apint::ApInt;
use crate::domain::{expect_parts, AbstractDomain, DomainFamily};

/// Family marker for [`Sign`].
#[derive(Debug, Clone, Copy)]
pub struct SignDomain;

impl DomainFamily for SignDomain {
    type Of<const BW: usize> = Sign<BW>;
}

/// The five points of the flat sign lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignKind {
    Bottom,
    Neg,
    Zero,
    Pos,
    Top,
}

impl SignKind {
    /// Sign of a concrete signed value.
    pub fn of(v: i64) -> Self {
        match v.cmp(&0) {
            std::cmp::Ordering::Less => SignKind::Neg,
            std::cmp::Ordering::Equal => SignKind::Zero,
            std::cmp::Ordering::Greater => SignKind::Pos,
        }
    }

    /// Height in the lattice: `⊥` is 0, the signs are 1, `⊤` is 2.
    fn height(self) -> u64 {
        match self {
            SignKind::Bottom => 0,
            SignKind::Neg | SignKind::Zero | SignKind::Pos => 1,
            SignKind::Top => 2,
        }
    }

    fn join(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (SignKind::Bottom, s) | (s, SignKind::Bottom) => s,
            _ => SignKind::Top,
        }
    }

    fn meet(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (SignKind::Top, s) | (s, SignKind::Top) => s,
            _ => SignKind::Bottom,
        }
    }
}

/// Sign element at width `BW`. Components: signed `[lo, hi]` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sign<const BW: usize> {
    bounds: [ApInt<BW>; 2],
}

impl<const BW: usize> Sign<BW> {
    const VALID_WIDTH: () = assert!(BW >= 2, "sign domain requires at least 2 bits");

    /// Creates the element for a lattice point.
    pub fn new(kind: SignKind) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WIDTH;
        let (lo, hi) = match kind {
            SignKind::Bottom => (1, 0),
            SignKind::Neg => (ApInt::<BW>::signed_min(), -1),
            SignKind::Zero => (0, 0),
            SignKind::Pos => (1, ApInt::<BW>::signed_max()),
            SignKind::Top => (ApInt::<BW>::signed_min(), ApInt::<BW>::signed_max()),
        };
        Self {
            bounds: [ApInt::from_signed(lo), ApInt::from_signed(hi)],
        }
    }

    pub fn lo(&self) -> i64 {
        self.bounds[0].sext()
    }

    pub fn hi(&self) -> i64 {
        self.bounds[1].sext()
    }

    /// The lattice point this element denotes.
    pub fn kind(&self) -> SignKind {
        Self::classify(self.lo(), self.hi())
    }

    /// The tightest sign covering the signed range `[lo, hi]`.
    fn classify(lo: i64, hi: i64) -> SignKind {
        if lo > hi {
            return SignKind::Bottom;
        }
        SignKind::of(lo).join(SignKind::of(hi))
    }
}

impl<const BW: usize> From<SignKind> for Sign<BW> {
    fn from(kind: SignKind) -> Self {
        Self::new(kind)
    }
}

impl<const BW: usize> Index<usize> for Sign<BW> {
    type Output = ApInt<BW>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bounds[index]
    }
}

impl<const BW: usize> AbstractDomain<BW> for Sign<BW> {
    const ARITY: usize = 2;
    const NAME: &'static str = "Sign";

    /// Arbitrary signed bounds are widened to the tightest covering sign.
    fn from_parts(parts: &[ApInt<BW>]) -> Self {
        expect_parts::<BW, Self>(parts);
        Self::new(Self::classify(parts[0].sext(), parts[1].sext()))
    }

    /// Uniform over the four non-bottom points.
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
        const CHOICES: [SignKind; 4] = [SignKind::Neg, SignKind::Zero, SignKind::Pos, SignKind::Top];
        let kind = CHOICES.choose(rng).copied().unwrap_or(SignKind::Top);
        Self::new(kind)
    }

    fn bottom() -> Self {
        Self::new(SignKind::Bottom)
    }

    fn top() -> Self {
        Self::new(SignKind::Top)
    }

    fn enum_lattice() -> Vec<Self> {
        [SignKind::Bottom, SignKind::Neg, SignKind::Zero, SignKind::Pos, SignKind::Top]
            .into_iter()
            .map(Self::new)
            .collect()
    }

    fn from_concrete(v: ApInt<BW>) -> Self {
        Self::new(SignKind::of(v.sext()))
    }

    fn max_dist() -> f64 {
        2.0
    }

    fn is_top(&self) -> bool {
        self.kind() == SignKind::Top
    }

    fn is_bottom(&self) -> bool {
        self.kind() == SignKind::Bottom
    }

    fn meet(&self, other: &Self) -> Self {
        Self::new(self.kind().meet(other.kind()))
    }

    fn join(&self, other: &Self) -> Self {
        Self::new(self.kind().join(other.kind()))
    }

    fn to_concrete(&self) -> Vec<ApInt<BW>> {
        if self.is_bottom() {
            return Vec::new();
        }
        (self.lo()..=self.hi()).map(ApInt::from_signed).collect()
    }

    /// Path length in the Hasse diagram.
    fn distance(&self, other: &Self) -> u64 {
        let (a, b) = (self.kind(), other.kind());
        if a == b {
            0
        } else if a.height() == 1 && b.height() == 1 {
            2
        } else {
            a.height().abs_diff(b.height())
        }
    }

    fn sample_concrete<R: Rng + ?Sized>(&self, rng: &mut R) -> ApInt<BW> {
        assert!(!self.is_bottom(), "cannot sample a concrete value from ⊥");
        ApInt::from_signed(rng.random_range(self.lo()..=self.hi()))
    }

    fn concrete_size(&self) -> BigUint {
        if self.is_bottom() {
            return BigUint::from(0u8);
        }
        BigUint::from(self.hi().abs_diff(self.lo())) + 1u8
    }
}

impl fmt::Display for SignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignKind::Bottom => write!(f, "⊥"),
            SignKind::Neg => write!(f, "-"),
            SignKind::Zero => write!(f, "0"),
            SignKind::Pos => write!(f, "+"),
            SignKind::Top => write!(f, "⊤"),
        }
    }
}

impl<const BW: usize> fmt::Display for Sign<BW> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}
