//! Index-vector iteration over Cartesian products.
//!
//! Both the lattice sweep and the concrete-set expansion visit every
//! combination of `N` independent sequences. The combinations are identified
//! by index vectors in lexicographic order, the last position varying fastest.

/// Calls `body` with every index vector of the product of sequences with lengths `lens`.
///
/// Visits nothing if any length is zero, and a single empty vector if `lens` is empty.
pub fn for_each_index<F>(lens: &[usize], mut body: F)
where
    F: FnMut(&[usize]),
{
    if lens.contains(&0) {
        return;
    }

    let mut idx = vec![0; lens.len()];
    loop {
        body(&idx);

        // Odometer increment
        let mut i = lens.len();
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            idx[i] += 1;
            if idx[i] < lens[i] {
                break;
            }
            idx[i] = 0;
        }
    }
}

/// Number of combinations, or `None` on overflow.
pub fn total(lens: &[usize]) -> Option<usize> {
    lens.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

/// The `rank`-th index vector in the order of [`for_each_index`].
///
/// # Panics
///
/// Panics if `rank` is out of range.
pub fn unrank(lens: &[usize], mut rank: usize) -> Vec<usize> {
    assert!(
        total(lens).is_some_and(|t| rank < t),
        "rank {} out of range for product of {:?}",
        rank,
        lens
    );
    let mut idx = vec![0; lens.len()];
    for i in (0..lens.len()).rev() {
        idx[i] = rank % lens[i];
        rank /= lens[i];
    }
    idx
}

/// Iterator over the index vectors of a Cartesian product.
///
/// Allocates one vector per item; prefer [`for_each_index`] in hot loops.
#[derive(Debug, Clone)]
pub struct Cartesian {
    lens: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl Cartesian {
    pub fn new(lens: &[usize]) -> Self {
        let next = if lens.contains(&0) {
            None
        } else {
            Some(vec![0; lens.len()])
        };
        Self {
            lens: lens.to_vec(),
            next,
        }
    }
}

impl Iterator for Cartesian {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut succ = current.clone();
        let mut i = self.lens.len();
        while i > 0 {
            i -= 1;
            succ[i] += 1;
            if succ[i] < self.lens[i] {
                self.next = Some(succ);
                break;
            }
            succ[i] = 0;
        }

        Some(current)
    }
}
