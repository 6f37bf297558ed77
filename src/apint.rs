//! Fixed-width bit-vector values.
//!
//! [`ApInt<BW>`] is the concrete value type every abstract domain is built from.
//! It stores the value zero-extended in a machine word, so widths are limited
//! to `1..=64` bits. All constructors truncate to the width.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use rand::Rng;

/// An unsigned integer of exactly `BW` bits.
///
/// # Invariants
///
/// - `1 <= BW <= 64`
/// - Bits above `BW` in the underlying word are always zero
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ApInt<const BW: usize>(u64);

impl<const BW: usize> ApInt<BW> {
    const VALID_WIDTH: () = assert!(BW >= 1 && BW <= 64, "bit-width must be in the range 1..=64");

    /// Mask covering the low `BW` bits.
    pub const MASK: u64 = if BW >= 64 { u64::MAX } else { (1u64 << BW) - 1 };

    /// Creates a value from a machine word, truncating to `BW` bits.
    pub fn new(value: u64) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WIDTH;
        ApInt(value & Self::MASK)
    }

    /// The all-zeros value.
    pub fn zero() -> Self {
        Self::new(0)
    }

    /// The all-ones value, i.e. the unsigned maximum.
    pub fn all_ones() -> Self {
        Self::new(u64::MAX)
    }

    /// Creates a value from a two's complement signed integer, truncating to `BW` bits.
    pub fn from_signed(value: i64) -> Self {
        Self::new(value as u64)
    }

    /// Zero-extends the value to a machine word.
    pub fn zext(self) -> u64 {
        self.0
    }

    /// Sign-extends the value to a machine word, interpreted as `i64`.
    pub fn sext(self) -> i64 {
        let shift = 64 - BW as u32;
        ((self.0 << shift) as i64) >> shift
    }

    /// Smallest signed value: `-2^(BW-1)`.
    pub fn signed_min() -> i64 {
        Self::new(1 << (BW - 1)).sext()
    }

    /// Largest signed value: `2^(BW-1) - 1`.
    pub fn signed_max() -> i64 {
        (Self::MASK >> 1) as i64
    }

    pub fn count_ones(self) -> u32 {
        self.0.count_ones()
    }

    /// Draws a value uniformly over all `2^BW` bit patterns.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random::<u64>())
    }

    /// Iterates over every value of this width in ascending unsigned order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MASK).map(Self::new)
    }
}

impl<const BW: usize> From<ApInt<BW>> for u64 {
    fn from(value: ApInt<BW>) -> Self {
        value.0
    }
}

impl<const BW: usize> fmt::Display for ApInt<BW> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const BW: usize> fmt::Binary for ApInt<BW> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.0, width = BW)
    }
}

impl<const BW: usize> Not for ApInt<BW> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::new(!self.0)
    }
}

impl<const BW: usize> BitAnd for ApInt<BW> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        ApInt(self.0 & rhs.0)
    }
}

impl<const BW: usize> BitOr for ApInt<BW> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        ApInt(self.0 | rhs.0)
    }
}

impl<const BW: usize> BitXor for ApInt<BW> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        ApInt(self.0 ^ rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_new_truncates() {
        assert_eq!(ApInt::<4>::new(0x1f).zext(), 0xf);
        assert_eq!(ApInt::<4>::new(16).zext(), 0);
        assert_eq!(ApInt::<64>::new(u64::MAX).zext(), u64::MAX);
    }

    #[test]
    fn test_signed() {
        assert_eq!(ApInt::<4>::new(0b1111).sext(), -1);
        assert_eq!(ApInt::<4>::new(0b1000).sext(), -8);
        assert_eq!(ApInt::<4>::new(0b0111).sext(), 7);
        assert_eq!(ApInt::<4>::from_signed(-3).zext(), 0b1101);
        assert_eq!(ApInt::<4>::signed_min(), -8);
        assert_eq!(ApInt::<4>::signed_max(), 7);
        assert_eq!(ApInt::<64>::signed_min(), i64::MIN);
        assert_eq!(ApInt::<64>::signed_max(), i64::MAX);
    }

    #[test]
    fn test_all() {
        let values: Vec<u64> = ApInt::<3>::all().map(ApInt::zext).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_bit_ops() {
        let a = ApInt::<4>::new(0b1100);
        let b = ApInt::<4>::new(0b1010);
        assert_eq!((a & b).zext(), 0b1000);
        assert_eq!((a | b).zext(), 0b1110);
        assert_eq!((a ^ b).zext(), 0b0110);
        assert_eq!((!a).zext(), 0b0011);
    }

    #[test]
    fn test_binary_format() {
        assert_eq!(format!("{:b}", ApInt::<5>::new(3)), "00011");
    }
}
