//! Labeled examples produced by the generation strategies.

use std::fmt;

/// One generated datum: abstract arguments and the abstract result they induce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Example<A, R> {
    /// Abstract arguments, one per operand.
    pub args: A,
    /// Abstract result at the result width.
    pub result: R,
}

impl<A, R> Example<A, R> {
    pub fn new(args: A, result: R) -> Self {
        Self { args, result }
    }
}

/// A tuple of displayable arguments, rendered as `(a, b, ...)`.
pub trait ArgList {
    fn fmt_list(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! impl_arg_list {
    ($($t:ident $i:tt),+) => {
        impl<$($t: fmt::Display),+> ArgList for ($($t,)+) {
            fn fmt_list(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let parts = [$(self.$i.to_string()),+];
                write!(f, "({})", parts.join(", "))
            }
        }
    };
}

impl_arg_list!(A 0);
impl_arg_list!(A 0, B 1);
impl_arg_list!(A 0, B 1, C 2);
impl_arg_list!(A 0, B 1, C 2, D 3);
impl_arg_list!(A 0, B 1, C 2, D 3, E 4);
impl_arg_list!(A 0, B 1, C 2, D 3, E 4, G 5);

impl<A: ArgList, R: fmt::Display> fmt::Display for Example<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.args.fmt_list(f)?;
        write!(f, " -> {}", self.result)
    }
}
