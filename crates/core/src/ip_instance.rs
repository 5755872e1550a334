//! `IPInstance` normalization (§3, §4.11): turns a raw `(A,b,C,u,nonneg)` problem description into
//! the normalized form the rest of the crate operates on — every inequality replaced by an
//! equality with a slack, every explicit upper bound replaced by an equality with a "reflection"
//! variable, variables permuted into `[bounded-nonneg | unbounded-nonneg | unrestricted]`, and the
//! HNF lattice basis of the permuted kernel cached alongside a fiber point.

use getset::Getters;
use ipgb_hal::{HermiteOracle, LpModel, VarType, LPOracle};
use ipgb_utils::checked_arithmetics::checked_dot;
use ipgb_utils::{Error, Result};

/// Whether a raw constraint row is an equality or a `≤` that needs a slack (§4.11 step 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
	Equality,
	LessOrEqual,
}

/// The caller-facing, un-normalized problem description: `min/max C·x s.t. Ax {=,≤} b`,
/// `0 ≤ x ≤ u` (or `x` free where `nonneg[j]` is false), `x ∈ ℤⁿ`.
#[derive(Debug, Clone)]
pub struct RawInstance {
	pub a: Vec<Vec<i64>>,
	pub senses: Vec<ConstraintSense>,
	pub b: Vec<i64>,
	/// One or more cost rows (row 1 is the primary objective; further rows support a
	/// multi-objective tiebreak — §4.2, §9).
	pub cost: Vec<Vec<i64>>,
	pub u: Vec<Option<i64>>,
	pub nonneg: Vec<bool>,
	pub minimize: bool,
}

/// The normalized problem (§3): every row an equality, every explicit bound an equality, columns
/// permuted into `[bounded-nonneg | unbounded-nonneg | unrestricted]`.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct IPInstance {
	a: Vec<Vec<i64>>,
	b: Vec<i64>,
	/// Cost rows, sign-adjusted so index-0 is always a *minimization* objective (§4.11 step 3).
	cost: Vec<Vec<i64>>,
	u: Vec<Option<i64>>,
	nonneg: Vec<bool>,
	bounded_end: usize,
	nonnegative_end: usize,
	/// `permutation[new_index] = original_index`.
	permutation: Vec<usize>,
	/// `inverse_permutation[original_index] = new_index`.
	inverse_permutation: Vec<usize>,
	kernel_basis: Vec<Vec<i64>>,
	kernel_rank: usize,
	fiber_solution: Vec<i64>,
	/// True when every row came from a `≤` constraint with its own dedicated slack column —
	/// exactly the precondition under which the `Simple` Markov-basis shortcut (§1 scenario 4)
	/// applies.
	every_row_has_dedicated_slack: bool,
}

impl IPInstance {
	pub fn n_vars(&self) -> usize {
		self.a.first().map_or(0, Vec::len)
	}

	pub fn n_constraints(&self) -> usize {
		self.a.len()
	}

	/// Builds the normalized instance from a [`RawInstance`] (§4.11 steps 1-6).
	pub fn normalize(
		raw: &RawInstance,
		lp: &impl LPOracle,
		hermite: &impl HermiteOracle,
	) -> Result<Self> {
		validate_shapes(raw)?;

		// Step 1: A x <= b -> A x + s = b.
		let n_le = raw.senses.iter().filter(|&&s| s == ConstraintSense::LessOrEqual).count();
		let mut a = augment_with_slacks(&raw.a, &raw.senses);
		let mut u: Vec<Option<i64>> = raw.u.clone();
		u.extend(std::iter::repeat(None).take(n_le));
		let mut nonneg = raw.nonneg.clone();
		nonneg.extend(std::iter::repeat(true).take(n_le));
		let mut cost: Vec<Vec<i64>> = raw.cost.iter().map(|row| {
			let mut row = row.clone();
			row.extend(std::iter::repeat(0).take(n_le));
			row
		}).collect();
		let mut b = raw.b.clone();
		let every_row_has_dedicated_slack = n_le == raw.a.len();

		// Step 2: x_j <= u_j -> x_j + t_j = u_j.
		let bounded_cols: Vec<usize> = (0..u.len()).filter(|&j| u[j].is_some()).collect();
		for &j in &bounded_cols {
			let mut row = vec![0i64; a.first().map_or(0, Vec::len)];
			row[j] = 1;
			row.push(1); // the reflection variable t_j.
			for existing in &mut a {
				existing.push(0);
			}
			a.push(row);
			b.push(u[j].expect("bounded_cols only contains Some entries"));
			u.push(None);
			nonneg.push(true);
			for c in &mut cost {
				c.push(0);
			}
		}

		// Step 3: sign-normalize the objective to a minimization convention.
		if !raw.minimize {
			for row in &mut cost {
				for entry in row.iter_mut() {
					*entry = -*entry;
				}
			}
		}

		finish(a, b, cost, u, nonneg, lp, hermite, every_row_has_dedicated_slack)
	}

	/// Rebuilds a fresh [`IPInstance`] over the *same* `a`/`b`/`cost`/`u` as `self` (steps 4-6 of
	/// §4.11 only — no re-augmentation), but with the non-negativity constraint on every index in
	/// `relaxed` lifted (treated as a free variable) regardless of `self`'s own pattern there.
	/// This is project-and-lift's "relaxation" (§4.10): `self` stays fixed throughout a lift, and
	/// each iteration asks for an independent re-permutation of the same columns under a
	/// progressively smaller relaxed set, translating vectors between the two permutations via
	/// [`IPInstance::permute_vector`]/[`IPInstance::invert_vector`] (both always expressed in
	/// terms of `self`'s own column order, never chained across iterations).
	pub fn relax(
		&self,
		relaxed: &std::collections::HashSet<usize>,
		lp: &impl LPOracle,
		hermite: &impl HermiteOracle,
	) -> Result<Self> {
		let nonneg: Vec<bool> = self
			.nonneg
			.iter()
			.enumerate()
			.map(|(j, &was_nonneg)| was_nonneg && !relaxed.contains(&j))
			.collect();
		finish(
			self.a.clone(),
			self.b.clone(),
			self.cost.clone(),
			self.u.clone(),
			nonneg,
			lp,
			hermite,
			self.every_row_has_dedicated_slack,
		)
	}

	/// Translates a vector indexed in the original (pre-permutation) variable order into this
	/// instance's permuted order.
	pub fn permute_vector(&self, v: &[i64]) -> Vec<i64> {
		permute_row(v, &self.permutation)
	}

	/// Translates a vector indexed in this instance's permuted order back to the original order
	/// (§8 round-trip law: `inverse_permutation ∘ permutation` is the identity).
	pub fn invert_vector(&self, v: &[i64]) -> Vec<i64> {
		permute_row(v, &self.inverse_permutation)
	}

	/// The row-1 (primary) cost of `v` under this instance's (already sign-normalized) objective.
	pub fn cost_of(&self, v: &[i64]) -> Result<Vec<i64>> {
		self.cost.iter().map(|row| checked_dot(row, v)).collect()
	}

	/// The unit-vector seed generators `e_i - slacks` (§1 scenario 4, §4.9 init's "Simple" shape):
	/// valid only when every row is `≤`-derived with a dedicated slack, since only then does
	/// `e_i` minus that row's slack contribution lie in `ker(A)` for every structural variable
	/// `i` regardless of the sign pattern of `A`.
	pub fn simple_markov_generators(&self) -> Option<Vec<Vec<i64>>> {
		if !self.every_row_has_dedicated_slack {
			return None;
		}
		let n = self.n_vars();
		let m = self.n_constraints();
		// Slack (and, if any, bound-reflection) columns were appended directly after the
		// structural columns, in the same order as their originating rows, before the
		// permutation was applied; row indices are untouched by permutation (only columns are
		// reordered), so row `k` here is still constraint row `k`.
		let orig_n_structural = n - m;
		let mut generators = Vec::with_capacity(orig_n_structural);
		for orig_i in 0..orig_n_structural {
			let mut g = vec![0i64; n];
			let pos_i = self.inverse_permutation[orig_i];
			g[pos_i] = 1;
			for row in 0..m {
				let orig_slack = orig_n_structural + row;
				let pos_slack = self.inverse_permutation[orig_slack];
				g[pos_slack] -= self.a[row][pos_i];
			}
			generators.push(g);
		}
		Some(generators)
	}
}

/// Steps 4-6 of §4.11: feasibility/boundedness, the stable permutation, and the kernel basis +
/// fiber point. Shared by [`IPInstance::normalize`] (after steps 1-3) and [`IPInstance::relax`]
/// (which only ever varies `nonneg`).
fn finish(
	a: Vec<Vec<i64>>,
	b: Vec<i64>,
	cost: Vec<Vec<i64>>,
	u: Vec<Option<i64>>,
	nonneg: Vec<bool>,
	lp: &impl LPOracle,
	hermite: &impl HermiteOracle,
	every_row_has_dedicated_slack: bool,
) -> Result<IPInstance> {
	let n_total = a.first().map_or(0, Vec::len);
	let feasibility_model = lp.build_model(&a, &b, &u, &nonneg, VarType::Real)?;
	if !lp.is_feasible(&feasibility_model)? {
		return Err(Error::InputInvalid { reason: "instance is infeasible".to_string() });
	}
	let mut bounded = vec![false; n_total];
	for (j, bounded_j) in bounded.iter_mut().enumerate() {
		*bounded_j = lp.is_bounded(&feasibility_model, j)?;
	}

	let mut permutation: Vec<usize> = Vec::with_capacity(n_total);
	permutation.extend((0..n_total).filter(|&j| bounded[j] && nonneg[j]));
	let bounded_end = permutation.len();
	permutation.extend((0..n_total).filter(|&j| !bounded[j] && nonneg[j]));
	let nonnegative_end = permutation.len();
	permutation.extend((0..n_total).filter(|&j| !nonneg[j]));
	let mut inverse_permutation = vec![0usize; n_total];
	for (new_idx, &orig_idx) in permutation.iter().enumerate() {
		inverse_permutation[orig_idx] = new_idx;
	}

	let a = permute_columns(&a, &permutation);
	let cost = cost.iter().map(|row| permute_row(row, &permutation)).collect();
	let u = permute_row(&u, &permutation);
	let nonneg = permute_row(&nonneg, &permutation);

	let (mut kernel_basis, kernel_rank) = hermite.hnf_lattice_basis(&a)?;
	hermite.normalize_hnf(&mut kernel_basis);
	let fiber_solution = hermite
		.solve(&a, &b)?
		.ok_or_else(|| Error::InputInvalid { reason: "no integer solution to A x = b".to_string() })?;

	Ok(IPInstance {
		a,
		b,
		cost,
		u,
		nonneg,
		bounded_end,
		nonnegative_end,
		permutation,
		inverse_permutation,
		kernel_basis,
		kernel_rank,
		fiber_solution,
		every_row_has_dedicated_slack,
	})
}

fn validate_shapes(raw: &RawInstance) -> Result<()> {
	let n = raw.a.first().map_or(0, Vec::len);
	if raw.a.iter().any(|row| row.len() != n) {
		return Err(Error::InputInvalid { reason: "A has ragged rows".to_string() });
	}
	if raw.a.len() != raw.b.len() || raw.a.len() != raw.senses.len() {
		return Err(Error::InputInvalid { reason: "A, b, and senses have mismatched row counts".to_string() });
	}
	if raw.u.len() != n || raw.nonneg.len() != n {
		return Err(Error::InputInvalid { reason: "u or nonneg has the wrong length".to_string() });
	}
	if raw.cost.iter().any(|row| row.len() != n) {
		return Err(Error::InputInvalid { reason: "a cost row has the wrong length".to_string() });
	}
	if raw.cost.is_empty() {
		return Err(Error::InputInvalid { reason: "at least one cost row is required".to_string() });
	}
	Ok(())
}

fn augment_with_slacks(a: &[Vec<i64>], senses: &[ConstraintSense]) -> Vec<Vec<i64>> {
	let n_le = senses.iter().filter(|&&s| s == ConstraintSense::LessOrEqual).count();
	let mut slack_col = 0;
	a.iter()
		.zip(senses.iter())
		.map(|(row, &sense)| {
			let mut new_row = row.clone();
			new_row.extend(std::iter::repeat(0).take(n_le));
			if sense == ConstraintSense::LessOrEqual {
				new_row[row.len() + slack_col] = 1;
				slack_col += 1;
			}
			new_row
		})
		.collect()
}

fn permute_row<T: Clone>(row: &[T], permutation: &[usize]) -> Vec<T> {
	permutation.iter().map(|&j| row[j].clone()).collect()
}

fn permute_columns(a: &[Vec<i64>], permutation: &[usize]) -> Vec<Vec<i64>> {
	a.iter().map(|row| permute_row(row, permutation)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use ipgb_hal::{ReferenceHermiteOracle, ReferenceLpOracle};

	fn knapsack() -> RawInstance {
		RawInstance {
			a: vec![vec![3, 2, 1]],
			senses: vec![ConstraintSense::LessOrEqual],
			b: vec![4],
			cost: vec![vec![-5, -4, -3]],
			u: vec![None, None, None],
			nonneg: vec![true, true, true],
			minimize: true,
		}
	}

	#[test]
	fn normalize_adds_exactly_one_slack_for_the_knapsack() {
		let raw = knapsack();
		let instance = IPInstance::normalize(&raw, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap();
		assert_eq!(instance.n_vars(), 4);
		assert_eq!(instance.n_constraints(), 1);
		assert!(instance.every_row_has_dedicated_slack);
	}

	#[test]
	fn permutation_and_inverse_compose_to_identity() {
		let raw = knapsack();
		let instance = IPInstance::normalize(&raw, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap();
		let v: Vec<i64> = (0..instance.n_vars() as i64).collect();
		let roundtrip = instance.invert_vector(&instance.permute_vector(&v));
		assert_eq!(roundtrip, v);
	}

	#[test]
	fn fiber_solution_satisfies_a_x_equals_b() {
		let raw = knapsack();
		let instance = IPInstance::normalize(&raw, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap();
		for (row, &rhs) in instance.a.iter().zip(instance.b.iter()) {
			let dot: i64 = row.iter().zip(instance.fiber_solution.iter()).map(|(&a, &x)| a * x).sum();
			assert_eq!(dot, rhs);
		}
	}

	#[test]
	fn kernel_basis_is_actually_in_the_kernel() {
		let raw = knapsack();
		let instance = IPInstance::normalize(&raw, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap();
		for row in &instance.kernel_basis {
			for a_row in &instance.a {
				let dot: i64 = a_row.iter().zip(row.iter()).map(|(&a, &x)| a * x).sum();
				assert_eq!(dot, 0);
			}
		}
	}

	#[test]
	fn simple_markov_generators_lie_in_the_kernel() {
		let raw = knapsack();
		let instance = IPInstance::normalize(&raw, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap();
		let generators = instance.simple_markov_generators().expect("every row has a dedicated slack");
		assert_eq!(generators.len(), 3);
		for g in &generators {
			for a_row in &instance.a {
				let dot: i64 = a_row.iter().zip(g.iter()).map(|(&a, &x)| a * x).sum();
				assert_eq!(dot, 0);
			}
		}
	}

	#[test]
	fn relax_recomputes_a_fresh_kernel_basis_with_a_smaller_nonnegative_end() {
		let raw = knapsack();
		let instance = IPInstance::normalize(&raw, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap();
		let relaxed: std::collections::HashSet<usize> = [0].into_iter().collect();
		let relaxation = instance.relax(&relaxed, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap();
		assert!(*relaxation.nonnegative_end() <= *instance.nonnegative_end());
		for row in relaxation.kernel_basis() {
			for a_row in relaxation.a() {
				let dot: i64 = a_row.iter().zip(row.iter()).map(|(&a, &x)| a * x).sum();
				assert_eq!(dot, 0);
			}
		}
	}

	fn infeasible() -> RawInstance {
		RawInstance {
			a: vec![vec![1, 1], vec![1, 1]],
			senses: vec![ConstraintSense::Equality, ConstraintSense::Equality],
			b: vec![1, 5],
			cost: vec![vec![1, 1]],
			u: vec![None, None],
			nonneg: vec![true, true],
			minimize: true,
		}
	}

	#[test]
	fn infeasible_instance_is_rejected() {
		let raw = infeasible();
		let err = IPInstance::normalize(&raw, &ReferenceLpOracle, &ReferenceHermiteOracle).unwrap_err();
		assert!(matches!(err, Error::InputInvalid { .. }));
	}
}
