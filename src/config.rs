//! Generation settings.

/// How the lattice-sampled strategies draw abstract arguments.
///
/// The distribution decides which regions of the lattice end up in the
/// generated data, so it is a setting rather than a fixed choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Each argument domain's own [`rand`][crate::domain::AbstractDomain::rand].
    #[default]
    Native,
    /// Uniform over each argument domain's [`enum_lattice`][crate::domain::AbstractDomain::enum_lattice].
    ///
    /// The lattices are enumerated once per generation call, so this is only
    /// practical for small lattices. `⊥` is drawn like any other element.
    UniformLattice,
}

/// Settings of an [`Enumerator`][crate::engine::Enumerator].
#[derive(Debug, Clone)]
pub struct EnumConfig {
    /// Distribution of the argument tuples in `gen_mids` and `gen_highs`.
    pub sampling: Sampling,
    /// Outer iterations per parallel work item in `par_gen_mids` and `par_gen_highs`.
    ///
    /// Chunk `k` draws from its own random stream, so the output of the parallel
    /// strategies depends on this value (but not on the number of threads).
    pub par_chunk: usize,
}

impl Default for EnumConfig {
    fn default() -> Self {
        Self {
            sampling: Sampling::Native,
            par_chunk: 64,
        }
    }
}
