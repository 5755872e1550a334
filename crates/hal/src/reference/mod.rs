//! Reference implementations of [`crate::LPOracle`] and [`crate::HermiteOracle`] (§6.1, §6.2):
//! good enough to drive this workspace's own tests and demos, not a production solver.

mod hermite;
mod integer_linalg;
mod lp;
mod rational;
mod simplex;

pub use hermite::ReferenceHermiteOracle;
pub use lp::ReferenceLpOracle;
