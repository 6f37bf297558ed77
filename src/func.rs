//! Concrete operations of statically known arity.
//!
//! The ground-truth semantics of an operation takes `N` machine words and
//! returns one. Operands are passed as an array `[u64; N]`, so the arity of a
//! closure is checked by the type system. Functions produced outside Rust (for
//! example by a JIT) can be wrapped from their raw address.

use std::fmt;
use std::sync::Arc;

/// Operand words of an `N`-ary operation: `[u64; N]` for `N` in `1..=6`.
pub trait Words:
    Copy + Default + fmt::Debug + AsRef<[u64]> + AsMut<[u64]> + Send + Sync + 'static
{
    /// Number of operands.
    const ARITY: usize;

    /// Calls the `extern "C"` function at `addr` with the operands spread as arguments.
    ///
    /// # Safety
    ///
    /// `addr` must be the address of a live `extern "C" fn(u64, ..., u64) -> u64`
    /// taking exactly [`ARITY`][Self::ARITY] arguments.
    unsafe fn call_addr(addr: usize, words: &Self) -> u64;
}

macro_rules! word {
    ($i:tt) => {
        u64
    };
}

macro_rules! impl_words {
    ($n:literal; $($i:tt),+) => {
        impl Words for [u64; $n] {
            const ARITY: usize = $n;

            unsafe fn call_addr(addr: usize, words: &Self) -> u64 {
                // SAFETY: the caller guarantees `addr` points to a function of this exact signature.
                let f = unsafe { std::mem::transmute::<usize, extern "C" fn($(word!($i)),+) -> u64>(addr) };
                f($(words[$i]),+)
            }
        }
    };
}

impl_words!(1; 0);
impl_words!(2; 0, 1);
impl_words!(3; 0, 1, 2);
impl_words!(4; 0, 1, 2, 3);
impl_words!(5; 0, 1, 2, 3, 4);
impl_words!(6; 0, 1, 2, 3, 4, 5);

/// A shareable `N`-ary function over machine words with output `O`.
///
/// Cloning is cheap, and the function may be called concurrently.
pub struct NaryFn<W: Words, O> {
    f: Arc<dyn Fn(&W) -> O + Send + Sync>,
}

/// The concrete semantics being abstracted.
pub type ConcreteOp<W> = NaryFn<W, u64>;

/// Applicability predicate: which concrete operand tuples are valid.
pub type Guard<W> = NaryFn<W, bool>;

impl<W: Words, O> NaryFn<W, O> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&W) -> O + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    #[inline]
    pub fn call(&self, words: &W) -> O {
        (self.f)(words)
    }
}

impl<W: Words> NaryFn<W, u64> {
    /// Wraps a concrete operation given by its raw address.
    ///
    /// # Safety
    ///
    /// `addr` must be the address of an `extern "C" fn` taking exactly `W::ARITY`
    /// `u64` arguments and returning `u64`, and it must stay valid for as long
    /// as the returned value (or any clone of it) is alive.
    pub unsafe fn from_addr(addr: usize) -> Self {
        Self::new(move |words: &W| unsafe { W::call_addr(addr, words) })
    }
}

impl<W: Words> NaryFn<W, bool> {
    /// Wraps a predicate given by its raw address. A zero result means "not applicable".
    ///
    /// # Safety
    ///
    /// Same contract as [`ConcreteOp::from_addr`].
    pub unsafe fn from_addr(addr: usize) -> Self {
        Self::new(move |words: &W| {
            let flag = unsafe { W::call_addr(addr, words) };
            flag != 0
        })
    }
}

impl<W: Words, O> Clone for NaryFn<W, O> {
    fn clone(&self) -> Self {
        Self { f: Arc::clone(&self.f) }
    }
}

impl<W: Words, O> fmt::Debug for NaryFn<W, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaryFn").field("arity", &W::ARITY).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    extern "C" fn sub3(a: u64, b: u64, c: u64) -> u64 {
        a.wrapping_sub(b).wrapping_sub(c)
    }

    extern "C" fn nonzero(a: u64, b: u64) -> u64 {
        (b != 0 || a == 0) as u64
    }

    #[test]
    fn test_closure_op() {
        let op = ConcreteOp::new(|&[a, b]: &[u64; 2]| a * b);
        assert_eq!(op.call(&[6, 7]), 42);
        let cloned = op.clone();
        assert_eq!(cloned.call(&[2, 3]), 6);
    }

    #[test]
    fn test_raw_op() {
        let op = unsafe { ConcreteOp::<[u64; 3]>::from_addr(sub3 as usize) };
        assert_eq!(op.call(&[10, 3, 2]), 5);
    }

    #[test]
    fn test_raw_guard() {
        let guard = unsafe { Guard::<[u64; 2]>::from_addr(nonzero as usize) };
        assert!(guard.call(&[5, 1]));
        assert!(!guard.call(&[5, 0]));
        assert!(guard.call(&[0, 0]));
    }

    #[test]
    fn test_arity() {
        assert_eq!(<[u64; 1] as Words>::ARITY, 1);
        assert_eq!(<[u64; 6] as Words>::ARITY, 6);
    }
}
