//! # xfer-enum: Labeled Examples for Abstract Transformers
//!
//! **`xfer-enum`** generates training and evaluation data for *abstract transformers* over fixed-width bit-vector abstract domains.
//! Given the concrete semantics of an operation (e.g. 8-bit addition), it produces examples `(abstract args) -> abstract result`,
//! where the result is the most precise abstraction of everything the operation can compute on the arguments' concretizations.
//!
//! ## What is a Best Abstraction?
//!
//! An abstract domain describes sets of bit-vectors by abstract values, ordered by set inclusion.
//! For an operation `op` and abstract arguments `a1, ..., aN`, the *best abstraction* is the join
//! of `α(op(c1, ..., cN))` over every `ci` in `γ(ai)`. Any sound transformer must return a superset of it;
//! a transformer returning exactly it is optimal.
//!
//! ## Key Features
//!
//! - **Width-Generic Domains**: Domains are families of types indexed by bit-width ([`DomainFamily`]), so operands and the result
//!   can have different widths, checked at compile time.
//! - **Three Strategies**: exhaustive ([`gen_lows`][Enumerator::gen_lows]), sampled arguments with exact results
//!   ([`gen_mids`][Enumerator::gen_mids]), and doubly sampled ([`gen_highs`][Enumerator::gen_highs]).
//! - **Parallel**: every strategy has a rayon-backed counterpart with reproducible output ([`parallel`]).
//! - **Reference Domains**: [known bits][knownbits], [constant ranges][range] and [signs][sign].
//!
//! ## Basic Usage
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use xfer_enum::{ApInt, Bw, Enumerator, KnownBits, KnownBitsDomain};
//!
//! // 1. Describe the operation: 4-bit multiplication over known bits
//! let mul = Enumerator::<KnownBitsDomain, 4, (Bw<4>, Bw<4>)>::new(|&[a, b]: &[u64; 2]| a * b);
//!
//! // 2. Ask for a single best abstraction: ???0 * ???1 = ???0
//! let even = KnownBits::<4>::new(ApInt::new(0b0001), ApInt::new(0b0000));
//! let odd = KnownBits::<4>::new(ApInt::new(0b0000), ApInt::new(0b0001));
//! assert_eq!(mul.best_abstraction(&(even, odd)).to_string(), "???0");
//!
//! // 3. Generate a sampled dataset
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let data = mul.gen_mids(100, &mut rng);
//! assert_eq!(data.len(), 100);
//! ```
//!
//! ## Core Components
//!
//! - **[`domain`]**: The abstract domain contract and the [`DomainFamily`] indirection.
//! - **[`engine`]**: The [`Enumerator`] and its generation strategies.
//! - **[`eval`]**: Scoring candidate transformers against generated examples.

pub mod apint;
pub mod config;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod example;
pub mod func;
pub mod knownbits;
pub mod lattice;
pub mod parallel;
pub mod product;
pub mod range;
pub mod sign;
pub mod signature;

pub use apint::ApInt;
pub use config::{EnumConfig, Sampling};
pub use domain::{AbstractDomain, DomainFamily};
pub use engine::Enumerator;
pub use eval::Evaluation;
pub use example::Example;
pub use knownbits::{KnownBits, KnownBitsDomain};
pub use range::{ConstRange, ConstRangeDomain};
pub use sign::{Sign, SignDomain, SignKind};
pub use signature::Bw;
