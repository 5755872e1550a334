//! The hardware/collaborator abstraction layer: the `LPOracle` and `HermiteOracle` traits the
//! core calls against, plus a reference implementation of each good enough to drive this
//! workspace's own tests and demos.
//!
//! A thin contract crate with no knowledge of binomials, monomial orders, or the completion loop,
//! sitting between `ipgb_math` and `ipgb_core`. Neither oracle trait is an external-process
//! binding — both collaborators are in-process here, but the trait boundary is real: a production
//! deployment is expected to swap in an implementation backed by a real MIP/LP solver without
//! `ipgb_core` changing a line.

pub mod hermite_oracle;
pub mod lp_oracle;
pub mod reference;

pub use hermite_oracle::HermiteOracle;
pub use lp_oracle::{LpModel, LPOracle, VarType};
pub use reference::{ReferenceHermiteOracle, ReferenceLpOracle};
