//! The `LPOracle` collaborator contract (§6.1): boundedness tests, feasibility tests, and optimal
//! bases needed by [`ipgb_core`]'s truncator, monomial-order construction, and project-and-lift.

use ipgb_utils::Result;

/// The domain a built [`LpModel`]'s variables range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
	Real,
	Integer,
}

/// A feasibility/optimization model built by [`LPOracle::build_model`] (§6.1 `jump_model`).
///
/// Variables are indexed `0..n` in the order of the columns of `a`; constraints are indexed
/// `0..a.len()`. This is the in-process equivalent of an opaque `(model, variables, constraints)`
/// triple built against an external solver's modeling layer — reused verbatim by
/// [`LPOracle::set_normalized_rhs`] so a [`crate::reference::ReferenceLpOracle`] caller (in
/// particular `ipgb_core`'s truncator) can mutate the right-hand side of a prebuilt model instead
/// of rebuilding it per binomial.
#[derive(Debug, Clone)]
pub struct LpModel {
	pub a: Vec<Vec<i64>>,
	pub b: Vec<i64>,
	pub u: Vec<Option<i64>>,
	pub nonneg: Vec<bool>,
	pub var_type: VarType,
}

impl LpModel {
	pub fn n_vars(&self) -> usize {
		self.a.first().map_or(0, Vec::len)
	}

	pub fn n_constraints(&self) -> usize {
		self.a.len()
	}
}

/// The external LP/MIP solver collaborator (§6.1). Every method receives its matrices explicitly
/// and retains no state across calls (§5): a [`LpModel`] is plain data, not a handle into solver
/// state, so an implementation is free to solve from scratch on every call.
///
/// `#[auto_impl]` so a caller holding `&dyn LPOracle` or a boxed oracle (e.g. a driver crate
/// choosing between the reference implementation and an external solver at runtime) can pass it
/// anywhere an `impl LPOracle` is expected, the same as the concrete type.
#[auto_impl::auto_impl(&, Box)]
pub trait LPOracle {
	/// `max Σxⱼ s.t. Ax=b, x≥0`; returns `Aᵀ·dual`, a strictly-positive row-span vector when one
	/// exists. Used by [`ipgb_math::MonomialOrder`] construction to repair a cost row with a
	/// negative entry (§4.3 step 2).
	fn positive_row_span(&self, a: &[Vec<i64>], b: &[i64]) -> Result<Vec<f64>>;

	/// Builds an LP/IP feasibility-or-optimization model over `Ax=b`, `l ≤ x ≤ u`, with the given
	/// per-variable non-negativity pattern and variable domain.
	fn build_model(
		&self,
		a: &[Vec<i64>],
		b: &[i64],
		u: &[Option<i64>],
		nonneg: &[bool],
		var_type: VarType,
	) -> Result<LpModel>;

	/// Whether `model` (as currently parameterized) has a feasible point.
	fn is_feasible(&self, model: &LpModel) -> Result<bool>;

	/// Whether maximizing `variable` over `model` is bounded from above.
	fn is_bounded(&self, model: &LpModel, variable: usize) -> Result<bool>;

	/// In-place right-hand-side mutation (§6.1): reuses a prebuilt model instead of rebuilding it,
	/// the hot path for [`ipgb_core`]'s `Model` truncation mode.
	fn set_normalized_rhs(&self, model: &mut LpModel, new_rhs: &[i64]);

	/// Searches for an integer unboundedness certificate for variable `i`: a `u ∈ ker(a)` with
	/// `u[i] > 0` and `u[j] ≥ 0` for every other `j` in `nonneg`. Returns `None` when no such ray
	/// exists (variable `i` is actually bounded given the current relaxation).
	fn unboundedness_ray(&self, a: &[Vec<i64>], nonneg: &[bool], i: usize) -> Result<Option<Vec<i64>>>;

	/// After solving `model`, which variables are basic in an optimal basis.
	fn optimal_basis(&self, model: &LpModel) -> Result<Vec<bool>>;
}
