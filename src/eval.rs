//! Scoring candidate transformers against generated examples.
//!
//! A candidate abstract transformer maps argument tuples to an abstract
//! result. Against examples labeled with the best (or a sampled
//! under-approximated) abstraction, a candidate is
//!
//! - **sound** on an example if its output contains the label,
//! - **exact** if its output equals the label,
//!
//! and its imprecision is the summed [`distance`][AbstractDomain::distance]
//! between its outputs and the labels.

use std::fmt;

use log::debug;

use crate::domain::{AbstractDomain, DomainFamily};
use crate::engine::{Enumerator, ResultOf};
use crate::example::Example;
use crate::lattice::is_superset;
use crate::signature::Signature;

/// Scores of one candidate transformer over a set of examples.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Result bit-width.
    pub bw: usize,
    /// Number of examples scored.
    pub cases: usize,
    /// Examples on which the candidate is sound.
    pub sound: usize,
    /// Examples on which the candidate is exact.
    pub exact: usize,
    /// Summed distance between candidate outputs and labels.
    pub dist: f64,
    /// Summed distance, each term divided by the domain's maximal distance.
    pub norm_dist: f64,
}

impl Evaluation {
    fn pct(part: usize, cases: usize) -> f64 {
        if cases == 0 {
            100.0
        } else {
            100.0 * part as f64 / cases as f64
        }
    }

    /// Percentage of sound cases (100 when there are none).
    pub fn sound_pct(&self) -> f64 {
        Self::pct(self.sound, self.cases)
    }

    /// Percentage of exact cases (100 when there are none).
    pub fn exact_pct(&self) -> f64 {
        Self::pct(self.exact, self.cases)
    }

    pub fn is_sound(&self) -> bool {
        self.sound == self.cases
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bw: {}, cases: {}, dist: {:.2}, sound%: {:.4}, exact%: {:.4}",
            self.bw,
            self.cases,
            self.dist,
            self.sound_pct(),
            self.exact_pct()
        )
    }
}

/// Scores `xfer` on every example.
pub fn evaluate<const BW: usize, A, R, X>(examples: &[Example<A, R>], xfer: X) -> Evaluation
where
    R: AbstractDomain<BW>,
    X: Fn(&A) -> R,
{
    let mut eval = Evaluation {
        bw: BW,
        cases: examples.len(),
        sound: 0,
        exact: 0,
        dist: 0.0,
        norm_dist: 0.0,
    };
    for ex in examples {
        let out = xfer(&ex.args);
        if is_superset::<BW, R>(&out, &ex.result) {
            eval.sound += 1;
        }
        if out == ex.result {
            eval.exact += 1;
        }
        let d = out.distance(&ex.result) as f64;
        eval.dist += d;
        eval.norm_dist += d / R::max_dist();
    }
    debug!("evaluate({}): {}", R::NAME, eval);
    eval
}

/// Scores the transformer that always answers `⊤`.
pub fn evaluate_top<const BW: usize, A, R>(examples: &[Example<A, R>]) -> Evaluation
where
    R: AbstractDomain<BW>,
{
    evaluate::<BW, A, R, _>(examples, |_| R::top())
}

impl<F, const RES: usize, W> Enumerator<F, RES, W>
where
    F: DomainFamily,
    W: Signature<F>,
{
    /// Scores a candidate transformer for this operation on `examples`.
    pub fn evaluate<X>(&self, examples: &[Example<W::Args, ResultOf<F, RES>>], xfer: X) -> Evaluation
    where
        X: Fn(&W::Args) -> ResultOf<F, RES>,
    {
        evaluate::<RES, _, _, _>(examples, xfer)
    }

    /// Scores the `⊤` baseline on `examples`.
    pub fn evaluate_top(&self, examples: &[Example<W::Args, ResultOf<F, RES>>]) -> Evaluation {
        evaluate_top::<RES, _, _>(examples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::{Sign, SignDomain, SignKind};
    use crate::signature::Bw;

    use test_log::test;

    type SignAdd = Enumerator<SignDomain, 4, (Bw<4>, Bw<4>)>;

    fn sign_add() -> SignAdd {
        SignAdd::new(|&[a, b]: &[u64; 2]| a + b)
    }

    /// Textbook sign addition, which ignores wrap-around.
    fn naive_add(args: &(Sign<4>, Sign<4>)) -> Sign<4> {
        use SignKind::*;
        let kind = match (args.0.kind(), args.1.kind()) {
            (Bottom, _) | (_, Bottom) => Bottom,
            (Zero, k) | (k, Zero) => k,
            (Pos, Pos) => Pos,
            (Neg, Neg) => Neg,
            _ => Top,
        };
        Sign::new(kind)
    }

    #[test]
    fn test_best_is_exact() {
        let add = sign_add();
        let lows = add.gen_lows();
        let eval = add.evaluate(&lows, |args| add.best_abstraction(args));
        assert_eq!(eval.cases, 25);
        assert_eq!(eval.sound, 25);
        assert_eq!(eval.exact, 25);
        assert_eq!(eval.dist, 0.0);
        assert_eq!(eval.to_string(), "bw: 4, cases: 25, dist: 0.00, sound%: 100.0000, exact%: 100.0000");
    }

    #[test]
    fn test_top_is_sound() {
        let add = sign_add();
        let lows = add.gen_lows();
        let eval = add.evaluate_top(&lows);
        assert!(eval.is_sound());
        // ⊤ is exact only where the best abstraction is ⊤ too
        assert!(eval.exact < eval.cases);
        assert!(eval.norm_dist > 0.0);
    }

    #[test]
    fn test_naive_add_unsound() {
        let add = sign_add();
        let lows = add.gen_lows();
        let eval = add.evaluate(&lows, naive_add);
        // (+, +) and (-, -) wrap around at 4 bits
        assert_eq!(eval.cases - eval.sound, 2);
        assert!(!eval.is_sound());
    }

    #[test]
    fn test_empty() {
        let eval = evaluate_top::<4, (Sign<4>,), Sign<4>>(&[]);
        assert_eq!(eval.cases, 0);
        assert_eq!(eval.sound_pct(), 100.0);
        assert_eq!(eval.exact_pct(), 100.0);
    }

    #[test]
    fn test_display_percentages() {
        let eval = Evaluation {
            bw: 4,
            cases: 25,
            sound: 25,
            exact: 22,
            dist: 3.0,
            norm_dist: 1.5,
        };
        assert_eq!(eval.to_string(), "bw: 4, cases: 25, dist: 3.00, sound%: 100.0000, exact%: 88.0000");
    }
}
