//! Example generation engine.
//!
//! An [`Enumerator`] wraps the concrete semantics of an `N`-ary operation and
//! produces labeled examples `(args, result)` for a domain family `F`, where
//! `args` are abstract values at the operand widths of the signature `W` and
//! `result` is the abstract output at width `RES` induced by the semantics.
//!
//! # Best Abstraction
//!
//! For an argument tuple `(a1, ..., aN)`, the best abstraction is
//!
//! ```text
//! ⊔ { α(op(c1, ..., cN)) | ci ∈ γ(ai), guard(c1, ..., cN) }
//! ```
//!
//! computed by expanding the full Cartesian product of the concretizations.
//! Its cost is the product of the concretization sizes.
//!
//! # Strategies
//!
//! | Strategy | Arguments | Result | Cost |
//! |----------|-----------|--------|------|
//! | [`gen_lows`][Enumerator::gen_lows] | whole lattice product | exact | `Π Σ γ` over lattices |
//! | [`gen_mids`][Enumerator::gen_mids] | sampled, non-`⊥` results only | exact | per example: `Π γ` |
//! | [`gen_highs`][Enumerator::gen_highs] | sampled | sampled under-approximation | per example: `conc` evaluations |
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use xfer_enum::{AbstractDomain, Bw, Enumerator, SignDomain};
//!
//! // Unsigned 4-bit addition over the sign domain
//! let add = Enumerator::<SignDomain, 4, (Bw<4>, Bw<4>)>::new(|&[a, b]: &[u64; 2]| a + b);
//!
//! let lows = add.gen_lows();
//! assert_eq!(lows.len(), 5 * 5);
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mids = add.gen_mids(10, &mut rng);
//! assert!(mids.iter().all(|ex| !ex.result.is_bottom()));
//! ```

use std::fmt;
use std::marker::PhantomData;

use log::{debug, info, trace};
use num_bigint::BigUint;
use rand::Rng;

use crate::apint::ApInt;
use crate::config::{EnumConfig, Sampling};
use crate::domain::{check_arity, AbstractDomain, DomainFamily};
use crate::example::Example;
use crate::func::{ConcreteOp, Guard, Words};
use crate::product;
use crate::signature::Signature;

/// Abstract result type of an enumerator over family `F` at result width `RES`.
pub type ResultOf<F, const RES: usize> = <F as DomainFamily>::Of<RES>;

/// Example type produced by an `Enumerator<F, RES, W>`.
pub type ExampleOf<F, const RES: usize, W> =
    Example<<W as Signature<F>>::Args, <F as DomainFamily>::Of<RES>>;

/// Generator of labeled examples for one concrete operation.
///
/// Holds the concrete operation, an optional applicability guard, and the
/// generation settings. All strategies take `&self`: an enumerator can be
/// shared between threads, each using its own random stream.
pub struct Enumerator<F, const RES: usize, W>
where
    F: DomainFamily,
    W: Signature<F>,
{
    op: ConcreteOp<W::Words>,
    guard: Option<Guard<W::Words>>,
    config: EnumConfig,
    _marker: PhantomData<fn() -> (F, W)>,
}

impl<F, const RES: usize, W> Enumerator<F, RES, W>
where
    F: DomainFamily,
    W: Signature<F>,
{
    /// Creates an enumerator for the concrete operation `op`.
    ///
    /// The domain arity at the result width and at every operand width must be
    /// in `2..=6`. This is checked at compile time.
    pub fn new<Op>(op: Op) -> Self
    where
        Op: Fn(&W::Words) -> u64 + Send + Sync + 'static,
    {
        Self::from_fns(ConcreteOp::new(op), None)
    }

    /// Creates an enumerator from already wrapped functions.
    pub fn from_fns(op: ConcreteOp<W::Words>, guard: Option<Guard<W::Words>>) -> Self {
        check_arity::<RES, ResultOf<F, RES>>();
        W::check_arities();
        Self {
            op,
            guard,
            config: EnumConfig::default(),
            _marker: PhantomData,
        }
    }

    /// Creates an enumerator from raw function addresses.
    ///
    /// A guard returning zero marks the operand tuple as not applicable.
    ///
    /// # Safety
    ///
    /// `op_addr` and `guard_addr` must be addresses of `extern "C"` functions
    /// taking exactly `N` `u64` arguments and returning `u64`, valid for the
    /// whole lifetime of the enumerator. See [`ConcreteOp::from_addr`].
    pub unsafe fn from_addrs(op_addr: usize, guard_addr: Option<usize>) -> Self {
        let op = unsafe { ConcreteOp::<W::Words>::from_addr(op_addr) };
        let guard = guard_addr.map(|addr| unsafe { Guard::<W::Words>::from_addr(addr) });
        Self::from_fns(op, guard)
    }

    /// Restricts the operation to operand tuples accepted by `guard`.
    pub fn with_guard<G>(mut self, guard: G) -> Self
    where
        G: Fn(&W::Words) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(guard));
        self
    }

    pub fn with_config(mut self, config: EnumConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.config.sampling = sampling;
        self
    }

    pub fn config(&self) -> &EnumConfig {
        &self.config
    }

    /// Applies the concrete operation to one operand tuple, or `None` if the guard rejects it.
    pub fn apply(&self, words: &W::Words) -> Option<u64> {
        if let Some(guard) = &self.guard {
            if !guard.call(words) {
                return None;
            }
        }
        Some(self.op.call(words))
    }

    /// Abstraction of the operation's result on one operand tuple (`⊥` if rejected).
    fn abstract_apply(&self, words: &W::Words) -> ResultOf<F, RES> {
        match self.apply(words) {
            Some(out) => ResultOf::<F, RES>::from_concrete(ApInt::new(out)),
            None => ResultOf::<F, RES>::bottom(),
        }
    }

    /// The exact induced abstract result for one argument tuple.
    ///
    /// Joins the abstraction of the operation's result over every applicable
    /// combination of concrete arguments. Returns `⊥` if any argument is `⊥`
    /// or the guard rejects every combination.
    pub fn best_abstraction(&self, args: &W::Args) -> ResultOf<F, RES> {
        let sets = W::concrete_sets(args);
        let lens: Vec<usize> = sets.iter().map(Vec::len).collect();

        let mut res = ResultOf::<F, RES>::bottom();
        let mut words = W::Words::default();
        product::for_each_index(&lens, |idx| {
            for (i, &j) in idx.iter().enumerate() {
                words.as_mut()[i] = sets[i][j];
            }
            if let Some(out) = self.apply(&words) {
                res = res.join(&ResultOf::<F, RES>::from_concrete(ApInt::new(out)));
            }
        });
        res
    }

    /// Number of concrete evaluations [`best_abstraction`][Self::best_abstraction] performs on `args`.
    pub fn best_abstraction_cost(&self, args: &W::Args) -> BigUint {
        W::concrete_sizes(args).into_iter().product()
    }

    /// Number of concrete evaluations [`gen_lows`][Self::gen_lows] performs.
    pub fn lows_cost(&self) -> BigUint {
        W::lattice_weights(&W::lattices()).into_iter().product()
    }

    /// Exhaustive lattice sweep.
    ///
    /// Returns one example per tuple of the Cartesian product of the operand
    /// lattices, in lexicographic order of [`enum_lattice`][AbstractDomain::enum_lattice]
    /// positions, each labeled with its exact best abstraction.
    ///
    /// # Panics
    ///
    /// Panics if the number of lattice tuples overflows `usize`.
    pub fn gen_lows(&self) -> Vec<ExampleOf<F, RES, W>> {
        let lattices = W::lattices();
        let lens = W::lattice_lens(&lattices);
        let total = Self::lattice_total(&lens);
        debug!(
            "gen_lows(domain = {}, widths = {:?} -> {}): {} tuples, {} concrete evaluations",
            ResultOf::<F, RES>::NAME,
            W::widths(),
            RES,
            total,
            W::lattice_weights(&lattices).into_iter().product::<BigUint>()
        );

        let mut examples = Vec::with_capacity(total);
        for idx in product::Cartesian::new(&lens) {
            let args = W::lattice_args(&lattices, &idx);
            let result = self.best_abstraction(&args);
            examples.push(Example::new(args, result));
        }

        info!("gen_lows: {} examples", examples.len());
        examples
    }

    /// Lattice-sampled examples with exact results.
    ///
    /// Draws argument tuples according to [`EnumConfig::sampling`] until `count`
    /// of them have a non-`⊥` best abstraction. Tuples whose result is `⊥` carry
    /// no information and are resampled.
    ///
    /// Does not terminate if no drawable tuple has a non-`⊥` result (e.g. a guard
    /// that rejects everything).
    pub fn gen_mids<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<ExampleOf<F, RES, W>> {
        debug!("gen_mids(count = {}, sampling = {:?})", count, self.config.sampling);
        let lattices = self.sampling_lattices();
        let (examples, rejected) = self.mids_with(count, lattices.as_ref(), rng);
        info!("gen_mids: {} examples, {} ⊥ draws resampled", examples.len(), rejected);
        examples
    }

    /// Doubly-sampled examples.
    ///
    /// For each of `lat_samples` sampled argument tuples, joins the abstraction
    /// of the operation's result over `conc_samples` concrete operand tuples
    /// drawn from the arguments' concretizations, skipping tuples rejected by the
    /// guard. The result is below (or equal to) the exact best abstraction.
    ///
    /// Tuples with a `⊥` argument (only drawn under [`Sampling::UniformLattice`])
    /// are kept with a `⊥` result, which is also their exact best abstraction.
    pub fn gen_highs<R: Rng + ?Sized>(
        &self,
        lat_samples: usize,
        conc_samples: usize,
        rng: &mut R,
    ) -> Vec<ExampleOf<F, RES, W>> {
        debug!(
            "gen_highs(lat_samples = {}, conc_samples = {}, sampling = {:?})",
            lat_samples, conc_samples, self.config.sampling
        );
        let lattices = self.sampling_lattices();
        let examples = self.highs_with(lat_samples, conc_samples, lattices.as_ref(), rng);
        info!("gen_highs: {} examples", examples.len());
        examples
    }

    pub(crate) fn lattice_total(lens: &[usize]) -> usize {
        match product::total(lens) {
            Some(total) => total,
            None => panic!("lattice product {:?} overflows usize", lens),
        }
    }

    /// Lattices to draw from, when the sampling mode needs them.
    pub(crate) fn sampling_lattices(&self) -> Option<W::Lattices> {
        match self.config.sampling {
            Sampling::Native => None,
            Sampling::UniformLattice => Some(W::lattices()),
        }
    }

    fn draw_args<R: Rng + ?Sized>(&self, lattices: Option<&W::Lattices>, rng: &mut R) -> W::Args {
        match lattices {
            Some(lattices) => W::pick_args(lattices, rng),
            None => W::rand_args(rng),
        }
    }

    /// Core of `gen_mids`. Returns the examples and the number of `⊥` draws.
    pub(crate) fn mids_with<R: Rng + ?Sized>(
        &self,
        count: usize,
        lattices: Option<&W::Lattices>,
        rng: &mut R,
    ) -> (Vec<ExampleOf<F, RES, W>>, usize) {
        let mut examples = Vec::with_capacity(count);
        let mut rejected = 0;
        while examples.len() < count {
            let args = self.draw_args(lattices, rng);
            let result = self.best_abstraction(&args);
            if result.is_bottom() {
                trace!("gen_mids: resampling {:?}", args);
                rejected += 1;
                continue;
            }
            examples.push(Example::new(args, result));
        }
        (examples, rejected)
    }

    /// Core of `gen_highs`.
    pub(crate) fn highs_with<R: Rng + ?Sized>(
        &self,
        lat_samples: usize,
        conc_samples: usize,
        lattices: Option<&W::Lattices>,
        rng: &mut R,
    ) -> Vec<ExampleOf<F, RES, W>> {
        let mut examples = Vec::with_capacity(lat_samples);
        for _ in 0..lat_samples {
            let args = self.draw_args(lattices, rng);
            let mut result = ResultOf::<F, RES>::bottom();
            if !W::any_bottom(&args) {
                for _ in 0..conc_samples {
                    let words = W::sample_words(&args, rng);
                    result = result.join(&self.abstract_apply(&words));
                }
            }
            examples.push(Example::new(args, result));
        }
        examples
    }
}

impl<F, const RES: usize, W> fmt::Debug for Enumerator<F, RES, W>
where
    F: DomainFamily,
    W: Signature<F>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerator")
            .field("domain", &ResultOf::<F, RES>::NAME)
            .field("result_width", &RES)
            .field("arg_widths", &W::widths())
            .field("arity", &<W::Words as Words>::ARITY)
            .field("guarded", &self.guard.is_some())
            .field("config", &self.config)
            .finish()
    }
}
