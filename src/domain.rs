//! The abstract domain contract.
//!
//! An abstract domain family (known bits, unsigned ranges, signs, ...) is a
//! type constructor `D<BW>` indexed by a bit-width. Every instantiation is a
//! finite bounded lattice whose elements are composed of [`AbstractDomain::ARITY`]
//! component bit-vectors of width `BW`.
//!
//! # Lattice Properties
//!
//! An implementation must satisfy, for all `a`, `b` of the same type:
//! - Commutativity: `a ⊔ b = b ⊔ a`, `a ⊓ b = b ⊓ a`
//! - Idempotence: `a ⊔ a = a`, `a ⊓ a = a`
//! - Absorption by extremes: `a ⊔ ⊤ = ⊤`, `a ⊓ ⊥ = ⊥`
//! - Galois consistency: `γ(⊥) = ∅`, `γ(⊤) = {0 .. 2^BW}`, and
//!   `a ⊓ b = b` implies `γ(b) ⊆ γ(a)`
//!
//! None of these laws are checked at runtime. The shared checker in
//! [`tests::check_domain_laws`] verifies them exhaustively at small widths.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::Index;

use num_bigint::BigUint;
use rand::Rng;

use crate::apint::ApInt;

/// Smallest admissible number of components in a domain element.
pub const MIN_ARITY: usize = 2;
/// Largest admissible number of components in a domain element.
pub const MAX_ARITY: usize = 6;

/// Abstract domain interface at a fixed bit-width `BW`.
///
/// Elements are immutable values: every lattice operation returns a new element.
/// Equality must be structural, i.e. agree with pairwise equality of the
/// [`ARITY`][Self::ARITY] components obtained through indexing.
pub trait AbstractDomain<const BW: usize>:
    Clone + Debug + Display + Eq + Hash + Send + Sync + Index<usize, Output = ApInt<BW>> + 'static
{
    /// Number of component bit-vectors composing an element, in `2..=6`.
    const ARITY: usize;

    /// Human-readable name of the domain family.
    const NAME: &'static str;

    /// Builds an element directly from its components.
    ///
    /// # Panics
    ///
    /// Panics if `parts.len() != Self::ARITY`.
    fn from_parts(parts: &[ApInt<BW>]) -> Self;

    /// Draws an element from a domain-specific distribution over the lattice.
    ///
    /// The distribution is meant to hit "interesting" points, it is not uniform
    /// over the lattice. See [`Sampling`][crate::config::Sampling] for alternatives.
    fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// The least element (`⊥`): no concrete values.
    fn bottom() -> Self;

    /// The greatest element (`⊤`): every value of width `BW`.
    fn top() -> Self;

    /// Every distinct element of the lattice, in a stable order.
    fn enum_lattice() -> Vec<Self>;

    /// The most precise element containing the single concrete value `v`.
    fn from_concrete(v: ApInt<BW>) -> Self;

    /// Upper bound on [`distance`][Self::distance] between any two elements.
    fn max_dist() -> f64;

    fn is_top(&self) -> bool;

    fn is_bottom(&self) -> bool;

    /// Meet (`⊓`): greatest lower bound.
    fn meet(&self, other: &Self) -> Self;

    /// Join (`⊔`): least upper bound.
    fn join(&self, other: &Self) -> Self;

    /// Concretization (`γ`): the finite set of values represented by this element.
    fn to_concrete(&self) -> Vec<ApInt<BW>>;

    /// Precision score between two elements.
    ///
    /// Symmetric and zero exactly on equal elements. The triangle inequality
    /// is not required.
    fn distance(&self, other: &Self) -> u64;

    /// Draws one value from the concretization of this element.
    ///
    /// # Panics
    ///
    /// The concretization must be non-empty: callers must never sample `⊥`.
    fn sample_concrete<R: Rng + ?Sized>(&self, rng: &mut R) -> ApInt<BW>;

    /// Size of the concretization, `|γ(self)|`.
    ///
    /// The default enumerates [`to_concrete`][Self::to_concrete]; domains with a
    /// closed form should override it.
    fn concrete_size(&self) -> BigUint {
        BigUint::from(self.to_concrete().len())
    }

    /// The components of this element, in index order.
    fn parts(&self) -> Vec<ApInt<BW>> {
        (0..Self::ARITY).map(|i| self[i]).collect()
    }
}

/// A family of abstract domains, one per bit-width.
///
/// Families are usually zero-sized markers:
///
/// ```rust
/// use xfer_enum::domain::{AbstractDomain, DomainFamily};
/// use xfer_enum::knownbits::{KnownBits, KnownBitsDomain};
///
/// fn lattice_size<F: DomainFamily, const BW: usize>() -> usize {
///     <F::Of<BW> as AbstractDomain<BW>>::enum_lattice().len()
/// }
///
/// assert_eq!(lattice_size::<KnownBitsDomain, 2>(), 10);
/// ```
pub trait DomainFamily: Send + Sync + 'static {
    /// The family member at width `BW`.
    type Of<const BW: usize>: AbstractDomain<BW>;
}

/// Compile-time arity bound, implemented for every domain.
trait ValidArity<const BW: usize>: AbstractDomain<BW> {
    const VALID_ARITY: () = assert!(
        Self::ARITY >= MIN_ARITY && Self::ARITY <= MAX_ARITY,
        "domain arity must be in the range 2..=6"
    );
}

impl<const BW: usize, D: AbstractDomain<BW>> ValidArity<BW> for D {}

/// Validates the arity of a domain instantiation.
///
/// The check is evaluated at compile time: instantiating it for a domain whose
/// `ARITY` is outside `2..=6` is a build error.
///
/// ```compile_fail
/// use std::fmt;
/// use std::ops::Index;
///
/// use rand::Rng;
/// use xfer_enum::domain::{check_arity, AbstractDomain};
/// use xfer_enum::ApInt;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Single([ApInt<4>; 1]);
///
/// impl Index<usize> for Single {
///     type Output = ApInt<4>;
///     fn index(&self, i: usize) -> &ApInt<4> {
///         &self.0[i]
///     }
/// }
///
/// impl fmt::Display for Single {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}", self.0[0])
///     }
/// }
///
/// impl AbstractDomain<4> for Single {
///     const ARITY: usize = 1;
///     const NAME: &'static str = "Single";
///     fn from_parts(parts: &[ApInt<4>]) -> Self { Single([parts[0]]) }
///     fn rand<R: Rng + ?Sized>(_: &mut R) -> Self { Self::top() }
///     fn bottom() -> Self { Single([ApInt::zero()]) }
///     fn top() -> Self { Single([ApInt::all_ones()]) }
///     fn enum_lattice() -> Vec<Self> { vec![Self::bottom(), Self::top()] }
///     fn from_concrete(_: ApInt<4>) -> Self { Self::top() }
///     fn max_dist() -> f64 { 1.0 }
///     fn is_top(&self) -> bool { *self == Self::top() }
///     fn is_bottom(&self) -> bool { *self == Self::bottom() }
///     fn meet(&self, other: &Self) -> Self { Single([self.0[0] & other.0[0]]) }
///     fn join(&self, other: &Self) -> Self { Single([self.0[0] | other.0[0]]) }
///     fn to_concrete(&self) -> Vec<ApInt<4>> {
///         if self.is_bottom() { Vec::new() } else { ApInt::all().collect() }
///     }
///     fn distance(&self, other: &Self) -> u64 { (self != other) as u64 }
///     fn sample_concrete<R: Rng + ?Sized>(&self, rng: &mut R) -> ApInt<4> { ApInt::random(rng) }
/// }
///
/// check_arity::<4, Single>();
/// ```
pub fn check_arity<const BW: usize, D: AbstractDomain<BW>>() {
    #[allow(clippy::let_unit_value)]
    let () = <D as ValidArity<BW>>::VALID_ARITY;
}

/// Checks that `parts` has exactly `D::ARITY` components.
///
/// # Panics
///
/// Panics on length mismatch.
pub fn expect_parts<const BW: usize, D: AbstractDomain<BW>>(parts: &[ApInt<BW>]) {
    assert_eq!(
        parts.len(),
        D::ARITY,
        "domain {} expects {} components, got {}",
        D::NAME,
        D::ARITY,
        parts.len()
    );
}

#[cfg(test)]
pub mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::knownbits::KnownBits;
    use crate::lattice::is_superset;

    use test_log::test;

    /// Test helper: exhaustively validate the domain contract over `enum_lattice()`.
    ///
    /// Only usable at widths where both the lattice and every concretization
    /// are small.
    pub fn check_domain_laws<const BW: usize, D: AbstractDomain<BW>>() {
        check_arity::<BW, D>();

        let lattice = D::enum_lattice();
        let bottom = D::bottom();
        let top = D::top();

        let distinct: HashSet<_> = lattice.iter().cloned().collect();
        assert_eq!(distinct.len(), lattice.len(), "enum_lattice has duplicates");
        assert!(distinct.contains(&bottom), "enum_lattice is missing bottom");
        assert!(distinct.contains(&top), "enum_lattice is missing top");
        assert_eq!(D::enum_lattice(), lattice, "enum_lattice order is not stable");

        assert!(bottom.is_bottom() && !bottom.is_top());
        assert!(top.is_top() && !top.is_bottom());
        assert!(bottom.to_concrete().is_empty(), "bottom concretizes to a value");
        let full: HashSet<_> = ApInt::<BW>::all().collect();
        let top_set: HashSet<_> = top.to_concrete().into_iter().collect();
        assert_eq!(top_set, full, "top does not concretize to every value");

        for v in ApInt::<BW>::all() {
            let a = D::from_concrete(v);
            assert!(a.to_concrete().contains(&v), "from_concrete({}) = {} loses {}", v, a, v);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for a in &lattice {
            // Structural equality through components
            assert_eq!(&D::from_parts(&a.parts()), a, "from_parts does not round-trip {}", a);
            assert_eq!(a.is_bottom(), a == &bottom);
            assert_eq!(a.is_top(), a == &top);

            let gamma = a.to_concrete();
            assert_eq!(a.concrete_size(), BigUint::from(gamma.len()), "concrete_size of {}", a);
            if !a.is_bottom() {
                for _ in 0..8 {
                    let v = a.sample_concrete(&mut rng);
                    assert!(gamma.contains(&v), "sample {} not in γ({})", v, a);
                }
            }

            assert_eq!(&a.join(a), a, "join idempotence failed for {}", a);
            assert_eq!(&a.meet(a), a, "meet idempotence failed for {}", a);
            assert_eq!(a.join(&top), top, "join with top failed for {}", a);
            assert_eq!(a.meet(&bottom), bottom, "meet with bottom failed for {}", a);
            assert_eq!(&a.join(&bottom), a, "join with bottom failed for {}", a);
            assert_eq!(&a.meet(&top), a, "meet with top failed for {}", a);
        }

        for a in &lattice {
            let ga: HashSet<_> = a.to_concrete().into_iter().collect();
            for b in &lattice {
                assert_eq!(a.join(b), b.join(a), "join commutativity failed for {}, {}", a, b);
                assert_eq!(a.meet(b), b.meet(a), "meet commutativity failed for {}, {}", a, b);

                let gb: HashSet<_> = b.to_concrete().into_iter().collect();
                assert_eq!(
                    is_superset::<BW, D>(a, b),
                    gb.is_subset(&ga),
                    "superset consistency failed for {}, {}",
                    a,
                    b
                );

                let d = a.distance(b);
                assert_eq!(d, b.distance(a), "distance is not symmetric for {}, {}", a, b);
                assert_eq!(d == 0, a == b, "distance zero iff equal failed for {}, {}", a, b);
                assert!(d as f64 <= D::max_dist(), "distance exceeds max_dist for {}, {}", a, b);
            }
        }

        check_bounds_and_associativity::<BW, D>(&lattice);
    }

    /// Join is the least upper bound, meet the greatest lower bound, and both associate.
    ///
    /// Works on index tables so every triple of the lattice stays cheap.
    fn check_bounds_and_associativity<const BW: usize, D: AbstractDomain<BW>>(lattice: &[D]) {
        let n = lattice.len();
        let pos: HashMap<&D, usize> = lattice.iter().enumerate().map(|(i, a)| (a, i)).collect();
        let index_of = |d: &D| match pos.get(d) {
            Some(&i) => i,
            None => panic!("{} is not in enum_lattice", d),
        };

        // le[i][j] iff lattice[i] ⊑ lattice[j]
        let le: Vec<Vec<bool>> = lattice
            .iter()
            .map(|a| lattice.iter().map(|b| is_superset::<BW, D>(b, a)).collect())
            .collect();
        let join: Vec<Vec<usize>> = lattice
            .iter()
            .map(|a| lattice.iter().map(|b| index_of(&a.join(b))).collect())
            .collect();
        let meet: Vec<Vec<usize>> = lattice
            .iter()
            .map(|a| lattice.iter().map(|b| index_of(&a.meet(b))).collect())
            .collect();

        for a in 0..n {
            for b in 0..n {
                let (j, m) = (join[a][b], meet[a][b]);
                assert!(
                    le[a][j] && le[b][j],
                    "join({}, {}) = {} is not an upper bound",
                    lattice[a],
                    lattice[b],
                    lattice[j]
                );
                assert!(
                    le[m][a] && le[m][b],
                    "meet({}, {}) = {} is not a lower bound",
                    lattice[a],
                    lattice[b],
                    lattice[m]
                );
                for c in 0..n {
                    if le[a][c] && le[b][c] {
                        assert!(
                            le[j][c],
                            "join({}, {}) = {} is not the least upper bound, {} is smaller",
                            lattice[a],
                            lattice[b],
                            lattice[j],
                            lattice[c]
                        );
                    }
                    if le[c][a] && le[c][b] {
                        assert!(
                            le[c][m],
                            "meet({}, {}) = {} is not the greatest lower bound, {} is larger",
                            lattice[a],
                            lattice[b],
                            lattice[m],
                            lattice[c]
                        );
                    }
                    assert_eq!(
                        join[j][c], join[a][join[b][c]],
                        "join associativity failed for {}, {}, {}",
                        lattice[a], lattice[b], lattice[c]
                    );
                    assert_eq!(
                        meet[m][c], meet[a][meet[b][c]],
                        "meet associativity failed for {}, {}, {}",
                        lattice[a], lattice[b], lattice[c]
                    );
                }
            }
        }
    }

    /// Known bits with a join that gives up on any two distinct values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct CoarseJoin<const BW: usize>(KnownBits<BW>);

    impl<const BW: usize> Index<usize> for CoarseJoin<BW> {
        type Output = ApInt<BW>;

        fn index(&self, index: usize) -> &Self::Output {
            &self.0[index]
        }
    }

    impl<const BW: usize> Display for CoarseJoin<BW> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl<const BW: usize> AbstractDomain<BW> for CoarseJoin<BW> {
        const ARITY: usize = 2;
        const NAME: &'static str = "CoarseJoin";

        fn from_parts(parts: &[ApInt<BW>]) -> Self {
            Self(KnownBits::from_parts(parts))
        }

        fn rand<R: Rng + ?Sized>(rng: &mut R) -> Self {
            Self(KnownBits::rand(rng))
        }

        fn bottom() -> Self {
            Self(KnownBits::bottom())
        }

        fn top() -> Self {
            Self(KnownBits::top())
        }

        fn enum_lattice() -> Vec<Self> {
            KnownBits::enum_lattice().into_iter().map(Self).collect()
        }

        fn from_concrete(v: ApInt<BW>) -> Self {
            Self(KnownBits::from_concrete(v))
        }

        fn max_dist() -> f64 {
            KnownBits::<BW>::max_dist()
        }

        fn is_top(&self) -> bool {
            self.0.is_top()
        }

        fn is_bottom(&self) -> bool {
            self.0.is_bottom()
        }

        fn meet(&self, other: &Self) -> Self {
            Self(self.0.meet(&other.0))
        }

        fn join(&self, other: &Self) -> Self {
            if self == other || other.is_bottom() {
                *self
            } else if self.is_bottom() {
                *other
            } else {
                Self::top()
            }
        }

        fn to_concrete(&self) -> Vec<ApInt<BW>> {
            self.0.to_concrete()
        }

        fn distance(&self, other: &Self) -> u64 {
            self.0.distance(&other.0)
        }

        fn sample_concrete<R: Rng + ?Sized>(&self, rng: &mut R) -> ApInt<BW> {
            self.0.sample_concrete(rng)
        }
    }

    #[test]
    #[should_panic(expected = "is not the least upper bound")]
    fn test_laws_reject_non_least_join() {
        check_domain_laws::<3, CoarseJoin<3>>();
    }

    #[test]
    fn test_check_arity_accepts_reference_domains() {
        check_arity::<1, KnownBits<1>>();
        check_arity::<64, KnownBits<64>>();
        check_arity::<8, crate::range::ConstRange<8>>();
        check_arity::<2, crate::sign::Sign<2>>();
    }
}
