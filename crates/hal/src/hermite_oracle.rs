//! The `HermiteOracle` collaborator contract (§6.2): integer-linear-algebra routines treated as
//! an external collaborator — HNF, kernel basis, and solving `Ax=b` over ℤ.

use ipgb_utils::Result;

/// Exact integer linear algebra over `A` (§6.2). Implementations must never fall back to
/// floating point internally: every result here is fed straight into binomials, whose entries are
/// exact integers by construction (§3).
///
/// `#[auto_impl]` mirrors [`crate::lp_oracle::LPOracle`]: usable through `&dyn HermiteOracle` or a
/// box, not just a concrete owned type.
#[auto_impl::auto_impl(&, Box)]
pub trait HermiteOracle {
	/// A row basis of `ker(A)`, in upper Hermite normal form, plus the rank of `A`.
	fn hnf_lattice_basis(&self, a: &[Vec<i64>]) -> Result<(Vec<Vec<i64>>, usize)>;

	/// Normalizes `h` in place so every entry above a pivot is non-positive and strictly smaller
	/// in magnitude than the pivot (§4.10 step "Initialization").
	fn normalize_hnf(&self, h: &mut [Vec<i64>]);

	/// An integer `x` with `Ax=b`, if one exists.
	fn solve(&self, a: &[Vec<i64>], b: &[i64]) -> Result<Option<Vec<i64>>>;
}
