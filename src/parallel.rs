//! Data-parallel generation strategies.
//!
//! The parallel strategies produce the same kind of output as their sequential
//! counterparts, with every example computed independently on the rayon pool.
//!
//! - [`par_gen_lows`][Enumerator::par_gen_lows] returns exactly the output of
//!   [`gen_lows`][Enumerator::gen_lows], in the same order.
//! - [`par_gen_mids`][Enumerator::par_gen_mids] and
//!   [`par_gen_highs`][Enumerator::par_gen_highs] split the requested count into
//!   chunks of [`EnumConfig::par_chunk`][crate::config::EnumConfig::par_chunk]
//!   iterations. Chunk `k` draws from a ChaCha8 stream `k` seeded with `seed`,
//!   and chunks are concatenated in order, so the output is reproducible for a
//!   given seed and chunk size regardless of the number of threads.

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::domain::{AbstractDomain, DomainFamily};
use crate::engine::{Enumerator, ExampleOf, ResultOf};
use crate::example::Example;
use crate::product;
use crate::signature::Signature;

/// Random stream of chunk `k`.
fn chunk_rng(seed: u64, k: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(k as u64);
    rng
}

/// Sizes of the chunks covering `count` iterations.
fn chunk_sizes(count: usize, chunk: usize) -> Vec<usize> {
    let chunk = chunk.max(1);
    (0..count.div_ceil(chunk))
        .map(|k| chunk.min(count - k * chunk))
        .collect()
}

impl<F, const RES: usize, W> Enumerator<F, RES, W>
where
    F: DomainFamily,
    W: Signature<F>,
{
    /// Parallel [`gen_lows`][Self::gen_lows], with identical output.
    pub fn par_gen_lows(&self) -> Vec<ExampleOf<F, RES, W>> {
        let lattices = W::lattices();
        let lens = W::lattice_lens(&lattices);
        let total = Self::lattice_total(&lens);
        debug!(
            "par_gen_lows(domain = {}, widths = {:?} -> {}): {} tuples",
            ResultOf::<F, RES>::NAME,
            W::widths(),
            RES,
            total
        );

        let examples: Vec<_> = (0..total)
            .into_par_iter()
            .map(|rank| {
                let idx = product::unrank(&lens, rank);
                let args = W::lattice_args(&lattices, &idx);
                let result = self.best_abstraction(&args);
                Example::new(args, result)
            })
            .collect();

        info!("par_gen_lows: {} examples", examples.len());
        examples
    }

    /// Parallel [`gen_mids`][Self::gen_mids], reproducible for a given `seed`.
    pub fn par_gen_mids(&self, count: usize, seed: u64) -> Vec<ExampleOf<F, RES, W>> {
        let sizes = chunk_sizes(count, self.config().par_chunk);
        debug!(
            "par_gen_mids(count = {}, seed = {}, chunks = {}, sampling = {:?})",
            count,
            seed,
            sizes.len(),
            self.config().sampling
        );
        let lattices = self.sampling_lattices();

        let chunks: Vec<_> = sizes
            .par_iter()
            .enumerate()
            .map(|(k, &size)| {
                let mut rng = chunk_rng(seed, k);
                self.mids_with(size, lattices.as_ref(), &mut rng)
            })
            .collect();

        let rejected: usize = chunks.iter().map(|(_, rejected)| rejected).sum();
        let examples: Vec<_> = chunks.into_iter().flat_map(|(examples, _)| examples).collect();
        info!("par_gen_mids: {} examples, {} ⊥ draws resampled", examples.len(), rejected);
        examples
    }

    /// Parallel [`gen_highs`][Self::gen_highs], reproducible for a given `seed`.
    pub fn par_gen_highs(&self, lat_samples: usize, conc_samples: usize, seed: u64) -> Vec<ExampleOf<F, RES, W>> {
        let sizes = chunk_sizes(lat_samples, self.config().par_chunk);
        debug!(
            "par_gen_highs(lat_samples = {}, conc_samples = {}, seed = {}, chunks = {})",
            lat_samples,
            conc_samples,
            seed,
            sizes.len()
        );
        let lattices = self.sampling_lattices();

        let chunks: Vec<_> = sizes
            .par_iter()
            .enumerate()
            .map(|(k, &size)| {
                let mut rng = chunk_rng(seed, k);
                self.highs_with(size, conc_samples, lattices.as_ref(), &mut rng)
            })
            .collect();

        let examples: Vec<_> = chunks.into_iter().flatten().collect();
        info!("par_gen_highs: {} examples", examples.len());
        examples
    }
}
