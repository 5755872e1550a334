//! Generic, domain-agnostic utilities shared by every crate in the workspace: the typed error
//! enum, overflow-checked arithmetic, and the fixed-width [`bitset::BitSet`].
//!
//! Nothing in this crate knows what a binomial or a monomial order is.

pub mod bitset;
pub mod checked_arithmetics;
pub mod error;

pub use bitset::BitSet;
pub use error::{Error, Result};
