//! Generic lattice reductions over domain elements.

use crate::domain::AbstractDomain;

/// Partial order test: `b ⊑ a`, i.e. `γ(b) ⊆ γ(a)`.
///
/// Derived from meet and equality only: `a ⊓ b = b`.
pub fn is_superset<const BW: usize, D: AbstractDomain<BW>>(a: &D, b: &D) -> bool {
    &a.meet(b) == b
}

/// Joins every element. Returns `⊥` for an empty collection.
pub fn join_all<const BW: usize, D, I>(values: I) -> D
where
    D: AbstractDomain<BW>,
    I: IntoIterator<Item = D>,
{
    values.into_iter().reduce(|acc, d| acc.join(&d)).unwrap_or_else(D::bottom)
}

/// Meets every element. Returns `⊤` for an empty collection.
pub fn meet_all<const BW: usize, D, I>(values: I) -> D
where
    D: AbstractDomain<BW>,
    I: IntoIterator<Item = D>,
{
    values.into_iter().reduce(|acc, d| acc.meet(&d)).unwrap_or_else(D::top)
}
