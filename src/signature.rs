//! Operand width signatures.
//!
//! A signature lists the bit-width of every operand of a concrete operation as
//! a tuple of [`Bw`] markers, e.g. `(Bw<8>, Bw<4>)` for a binary operation
//! whose first operand is 8 bits wide and second is 4 bits wide. For a domain
//! family `F`, the signature fixes the tuple type of abstract arguments and
//! the operand word array, and provides the per-position operations the
//! engine needs on heterogeneous argument tuples.

use std::fmt::Debug;
use std::hash::Hash;

use num_bigint::BigUint;
use rand::Rng;

use crate::domain::{check_arity, AbstractDomain, DomainFamily};
use crate::example::ArgList;
use crate::func::Words;

/// Marker for an operand of width `N`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bw<const N: usize>;

/// Operand widths of an `N`-ary operation over domain family `F`.
///
/// Implemented for tuples of two to six [`Bw`] markers, and as an extension
/// for single-operand tuples `(Bw<N>,)`, so that unary operations such as
/// truncation or extension can be enumerated too:
///
/// ```rust
/// use xfer_enum::{Bw, ConstRange, ConstRangeDomain, Enumerator};
///
/// let trunc = Enumerator::<ConstRangeDomain, 2, (Bw<4>,)>::new(|&[a]: &[u64; 1]| a);
/// assert_eq!(trunc.best_abstraction(&(ConstRange::new(4, 5),)), ConstRange::new(0, 1));
/// ```
pub trait Signature<F: DomainFamily>: 'static {
    /// Concrete operand words, `[u64; N]`.
    type Words: Words;
    /// Abstract arguments, `(F::Of<W0>, F::Of<W1>, ...)`.
    type Args: Clone + Debug + Eq + Hash + ArgList + Send + Sync;
    /// Enumerated lattices, one per operand.
    type Lattices: Send + Sync;

    /// Bit-width of every operand, in order.
    fn widths() -> Vec<usize>;

    /// Validates the domain arity at every operand width, at compile time.
    ///
    /// See [`check_arity`].
    fn check_arities();

    fn lattices() -> Self::Lattices;

    /// Size of every operand's lattice.
    fn lattice_lens(lattices: &Self::Lattices) -> Vec<usize>;

    /// The argument tuple at index vector `idx` of the lattice product.
    fn lattice_args(lattices: &Self::Lattices, idx: &[usize]) -> Self::Args;

    /// Uniform draw from each operand's lattice.
    fn pick_args<R: Rng + ?Sized>(lattices: &Self::Lattices, rng: &mut R) -> Self::Args;

    /// Draw using each operand domain's own distribution.
    fn rand_args<R: Rng + ?Sized>(rng: &mut R) -> Self::Args;

    /// Zero-extended concretization of every argument.
    fn concrete_sets(args: &Self::Args) -> Vec<Vec<u64>>;

    /// Concretization size of every argument.
    fn concrete_sizes(args: &Self::Args) -> Vec<BigUint>;

    /// For every operand, the summed concretization size over its whole lattice.
    fn lattice_weights(lattices: &Self::Lattices) -> Vec<BigUint>;

    /// One concrete operand tuple drawn from the arguments' concretizations.
    ///
    /// # Panics
    ///
    /// No argument may be `⊥`.
    fn sample_words<R: Rng + ?Sized>(args: &Self::Args, rng: &mut R) -> Self::Words;

    /// Returns `true` if any argument is `⊥`.
    fn any_bottom(args: &Self::Args) -> bool;
}

macro_rules! impl_signature {
    ($n:literal; $($w:ident $i:tt),+) => {
        impl<F: DomainFamily, $(const $w: usize),+> Signature<F> for ($(Bw<$w>,)+) {
            type Words = [u64; $n];
            type Args = ($(F::Of<$w>,)+);
            type Lattices = ($(Vec<F::Of<$w>>,)+);

            fn widths() -> Vec<usize> {
                vec![$($w),+]
            }

            fn check_arities() {
                $(check_arity::<$w, F::Of<$w>>();)+
            }

            fn lattices() -> Self::Lattices {
                ($(<F::Of<$w> as AbstractDomain<$w>>::enum_lattice(),)+)
            }

            fn lattice_lens(lattices: &Self::Lattices) -> Vec<usize> {
                vec![$(lattices.$i.len()),+]
            }

            fn lattice_args(lattices: &Self::Lattices, idx: &[usize]) -> Self::Args {
                ($(lattices.$i[idx[$i]].clone(),)+)
            }

            fn pick_args<R: Rng + ?Sized>(lattices: &Self::Lattices, rng: &mut R) -> Self::Args {
                ($(lattices.$i[rng.random_range(0..lattices.$i.len())].clone(),)+)
            }

            fn rand_args<R: Rng + ?Sized>(rng: &mut R) -> Self::Args {
                ($(<F::Of<$w> as AbstractDomain<$w>>::rand(rng),)+)
            }

            fn concrete_sets(args: &Self::Args) -> Vec<Vec<u64>> {
                vec![$(args.$i.to_concrete().into_iter().map(|v| v.zext()).collect()),+]
            }

            fn concrete_sizes(args: &Self::Args) -> Vec<BigUint> {
                vec![$(args.$i.concrete_size()),+]
            }

            fn lattice_weights(lattices: &Self::Lattices) -> Vec<BigUint> {
                vec![$(lattices.$i.iter().map(|d| d.concrete_size()).sum()),+]
            }

            fn sample_words<R: Rng + ?Sized>(args: &Self::Args, rng: &mut R) -> Self::Words {
                [$(args.$i.sample_concrete(rng).zext()),+]
            }

            fn any_bottom(args: &Self::Args) -> bool {
                false $(|| args.$i.is_bottom())+
            }
        }
    };
}

// Unary signatures extend the usual two to six operands
impl_signature!(1; W0 0);
impl_signature!(2; W0 0, W1 1);
impl_signature!(3; W0 0, W1 1, W2 2);
impl_signature!(4; W0 0, W1 1, W2 2, W3 3);
impl_signature!(5; W0 0, W1 1, W2 2, W3 3, W4 4);
impl_signature!(6; W0 0, W1 1, W2 2, W3 3, W4 4, W5 5);
