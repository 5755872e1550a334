//! `ipgb_core`: Gröbner bases of toric ideals and Markov bases of integer kernels for integer
//! linear programs (§1, §2).
//!
//! The pipeline a caller drives:
//! 1. Describe the problem as a [`ip_instance::RawInstance`] and normalize it with
//!    [`ip_instance::IPInstance::normalize`] (§4.11).
//! 2. Obtain a generating set of `ker(A) ∩ ℤⁿ` — either [`api::simple_markov_basis`] when it
//!    applies, or [`api::project_and_lift`]/[`project_and_lift::ProjectAndLift`] otherwise (§4.10).
//! 3. Complete it to a test set under a [`ipgb_math::MonomialOrder`] with [`api::compute_gb`]
//!    (§4.9), or do both at once with [`api::markov_basis`].
//! 4. Reduce any feasible point to a local optimum with [`api::optimize_with`].

pub mod api;
pub mod binomial_set;
pub mod buchberger;
pub mod config;
pub mod ip_instance;
pub mod pair_queue;
pub mod project_and_lift;
pub mod reducer;
pub mod support_tree;
pub mod truncator;

pub use api::{
	build_monomial_order, compute_gb, markov_basis, optimize_with, project_and_lift, simple_markov_basis,
	MarkovAlgorithm,
};
pub use binomial_set::BinomialSet;
pub use buchberger::Buchberger;
pub use config::{AutoReducePolicy, Config, ModelKind, PairStrategyKind, TruncationMode};
pub use ip_instance::{ConstraintSense, IPInstance, RawInstance};
pub use pair_queue::{Pair, PairQueue};
pub use project_and_lift::{ProjectAndLift, ProjectAndLiftOutcome};
pub use support_tree::SupportTree;
pub use truncator::Truncator;
