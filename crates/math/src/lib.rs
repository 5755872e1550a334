//! Pure integer/rational math with no knowledge of LP oracles, instances, or completion loops:
//! the [`binomial`] vector representation and the [`monomial_order`] total order over it.
//!
//! Everything here is a value type with no I/O and no fallible collaborator calls (save for the
//! overflow checks in [`ipgb_utils::checked_arithmetics`]), independent of the solver and hardware
//! layers above it.

pub mod binomial;
pub mod monomial_order;

pub use binomial::{Binomial, BinomialLike, GradedBinomial, PlainBinomial};
pub use monomial_order::MonomialOrder;
