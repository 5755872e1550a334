/// The typed error kinds surfaced by every public entry point in the workspace.
///
/// No component recovers from these locally (§7): a zero reduction, a
/// truncated S-binomial, or a pair discarded by the GCD criterion are all expected outcomes of
/// the completion loop, not errors. Only arithmetic and collaborator failures reach this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// Matrix/vector shapes disagree, or a declared variable type is unsupported.
	#[error("invalid input: {reason}")]
	InputInvalid { reason: String },

	/// The feasibility model's objective for the selected variable has no upper bound, and
	/// project-and-lift did not find a covering ray.
	#[error("instance is unbounded")]
	Unbounded,

	/// Arithmetic on problem integers exceeded 64 bits.
	#[error("integer overflow in problem data")]
	Overflow,

	/// The external LP/HNF oracle returned an unexpected status.
	#[error("oracle failure: {reason}")]
	OracleFailure { reason: String },

	/// `enumerate_solutions` was asked to enumerate an unbounded polytope.
	#[error("feasible region is not a bounded polytope")]
	NotBoundedPolytope,

	/// `Config::max_iterations` was exceeded by the Buchberger loop.
	#[error("iteration limit exceeded")]
	IterationLimitExceeded,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns early from the enclosing function with `Err($err.into())`.
///
/// Mirrors the early-return helper used throughout this workspace so call sites read as a
/// single statement rather than an explicit `return Err(...)`.
#[macro_export]
macro_rules! bail {
	($err:expr) => {
		return Err($err.into())
	};
}
