//! [`ReferenceLpOracle`]: an in-process implementation of [`LPOracle`] (§6.1) built on the dense
//! two-phase simplex in [`super::simplex`].
//!
//! Adequate for the modest instance sizes this workspace's own tests and demos exercise (§6.1),
//! not a substitute for a production MIP/LP solver.

use ipgb_utils::{Error, Result};
use tracing::debug;

use super::integer_linalg::{clear_denominators, rational_kernel_basis, rref};
use super::rational::Rational;
use super::simplex::{self, SimplexOutcome};
use crate::lp_oracle::{LpModel, VarType, LPOracle};

/// Lowers an [`LpModel`] into the `max c·x s.t. Ax=b, x≥0` standard form the simplex solver
/// expects: inequalities were already turned into equalities with slacks upstream (§4.11), so the
/// only remaining lowering here is (a) splitting a free (`!nonneg`) variable into the difference
/// of two non-negative columns and (b) turning a finite upper bound `u_j` into an extra equality
/// row `x_j + t_j = u_j`.
struct StandardForm {
	a: Vec<Vec<f64>>,
	b: Vec<f64>,
	/// For original variable `j`: `(positive_column, negative_column)`, the latter `Some` only
	/// for split free variables.
	columns: Vec<(usize, Option<usize>)>,
	n_std: usize,
}

fn to_standard_form(model: &LpModel) -> StandardForm {
	let n = model.n_vars();
	let mut columns = Vec::with_capacity(n);
	let mut next_col = 0;
	for &nonneg in &model.nonneg {
		let pos = next_col;
		next_col += 1;
		if nonneg {
			columns.push((pos, None));
		} else {
			let neg = next_col;
			next_col += 1;
			columns.push((pos, Some(neg)));
		}
	}
	let n_bound_rows = model.u.iter().filter(|u| u.is_some()).count();
	let n_slack = n_bound_rows;
	let n_std = next_col + n_slack;

	let mut a: Vec<Vec<f64>> = model
		.a
		.iter()
		.map(|row| {
			let mut std_row = vec![0.0; n_std];
			for (j, &coeff) in row.iter().enumerate() {
				let (pos, neg) = columns[j];
				std_row[pos] = coeff as f64;
				if let Some(neg) = neg {
					std_row[neg] = -(coeff as f64);
				}
			}
			std_row
		})
		.collect();
	let mut b: Vec<f64> = model.b.iter().map(|&x| x as f64).collect();

	let mut slack_col = next_col;
	for (j, bound) in model.u.iter().enumerate() {
		if let Some(u_j) = bound {
			let mut row = vec![0.0; n_std];
			let (pos, neg) = columns[j];
			row[pos] = 1.0;
			if let Some(neg) = neg {
				row[neg] = -1.0;
			}
			row[slack_col] = 1.0;
			a.push(row);
			b.push(*u_j as f64);
			slack_col += 1;
		}
	}

	StandardForm { a, b, columns, n_std }
}

/// Solves `B^T y = c_B` by Gaussian elimination with partial pivoting over `f64`.
fn solve_square_system(mut b_matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
	let m = rhs.len();
	for col in 0..m {
		let Some(pivot_row) = (col..m).max_by(|&r1, &r2| {
			b_matrix[r1][col].abs().partial_cmp(&b_matrix[r2][col].abs()).unwrap()
		}) else {
			return None;
		};
		if b_matrix[pivot_row][col].abs() < 1e-10 {
			return None;
		}
		b_matrix.swap(col, pivot_row);
		rhs.swap(col, pivot_row);
		let pivot_value = b_matrix[col][col];
		for c in col..m {
			b_matrix[col][c] /= pivot_value;
		}
		rhs[col] /= pivot_value;
		for row in 0..m {
			if row == col {
				continue;
			}
			let factor = b_matrix[row][col];
			if factor.abs() < 1e-12 {
				continue;
			}
			for c in col..m {
				b_matrix[row][c] -= factor * b_matrix[col][c];
			}
			rhs[row] -= factor * rhs[col];
		}
	}
	Some(rhs)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceLpOracle;

impl LPOracle for ReferenceLpOracle {
	fn positive_row_span(&self, a: &[Vec<i64>], b: &[i64]) -> Result<Vec<f64>> {
		let m = a.len();
		let n = a.first().map_or(0, Vec::len);
		let a_f64: Vec<Vec<f64>> = a.iter().map(|row| row.iter().map(|&x| x as f64).collect()).collect();
		let b_f64: Vec<f64> = b.iter().map(|&x| x as f64).collect();
		let c = vec![1.0; n];

		let outcome = simplex::solve(&a_f64, &b_f64, &c);
		debug!(?outcome, "positive_row_span: solved max sum(x) s.t. Ax=b, x>=0");
		let SimplexOutcome::Optimal { basis, .. } = outcome else {
			return Err(Error::OracleFailure {
				reason: "positive_row_span: max sum(x) s.t. Ax=b, x>=0 has no optimum".to_string(),
			});
		};
		if basis.len() != m || basis.iter().any(|&j| j >= n) {
			return Err(Error::OracleFailure {
				reason: "positive_row_span: final basis is degenerate (contains slack/artificial columns)"
					.to_string(),
			});
		}

		let b_matrix: Vec<Vec<f64>> = (0..m).map(|row| basis.iter().map(|&col| a_f64[row][col]).collect()).collect();
		// B^T y = c_B, c_B = all-ones since the objective maximizes the unweighted sum.
		let b_transpose: Vec<Vec<f64>> = (0..m).map(|i| (0..m).map(|j| b_matrix[j][i]).collect()).collect();
		let c_b = vec![1.0; m];
		let y = solve_square_system(b_transpose, c_b).ok_or_else(|| Error::OracleFailure {
			reason: "positive_row_span: optimal basis matrix is singular".to_string(),
		})?;

		let d: Vec<f64> = (0..n).map(|j| (0..m).map(|i| y[i] * a_f64[i][j]).sum()).collect();
		Ok(d)
	}

	fn build_model(
		&self,
		a: &[Vec<i64>],
		b: &[i64],
		u: &[Option<i64>],
		nonneg: &[bool],
		var_type: VarType,
	) -> Result<LpModel> {
		if a.iter().any(|row| row.len() != u.len() || row.len() != nonneg.len()) || a.len() != b.len() {
			return Err(Error::InputInvalid {
				reason: "build_model: A/b/u/nonneg shapes disagree".to_string(),
			});
		}
		Ok(LpModel {
			a: a.to_vec(),
			b: b.to_vec(),
			u: u.to_vec(),
			nonneg: nonneg.to_vec(),
			var_type,
		})
	}

	fn is_feasible(&self, model: &LpModel) -> Result<bool> {
		let std = to_standard_form(model);
		let c = vec![0.0; std.n_std];
		let outcome = simplex::solve(&std.a, &std.b, &c);
		Ok(matches!(outcome, SimplexOutcome::Optimal { .. }))
	}

	fn is_bounded(&self, model: &LpModel, variable: usize) -> Result<bool> {
		let std = to_standard_form(model);
		let (pos, neg) = std.columns[variable];
		let mut c = vec![0.0; std.n_std];
		c[pos] = 1.0;
		if let Some(neg) = neg {
			c[neg] = -1.0;
		}
		let outcome = simplex::solve(&std.a, &std.b, &c);
		match outcome {
			SimplexOutcome::Unbounded => Ok(false),
			SimplexOutcome::Optimal { .. } => Ok(true),
			SimplexOutcome::Infeasible => Err(Error::OracleFailure {
				reason: "is_bounded: model has no feasible point".to_string(),
			}),
		}
	}

	fn set_normalized_rhs(&self, model: &mut LpModel, new_rhs: &[i64]) {
		model.b = new_rhs.to_vec();
	}

	fn unboundedness_ray(&self, a: &[Vec<i64>], nonneg: &[bool], i: usize) -> Result<Option<Vec<i64>>> {
		let n = a.first().map_or(0, Vec::len);
		let rational: Vec<Vec<Rational>> =
			a.iter().map(|row| row.iter().map(|&x| Rational::from_int(x)).collect()).collect();
		let echelon = rref(&rational);
		let basis: Vec<Vec<i64>> =
			rational_kernel_basis(&echelon, n).iter().map(|v| clear_denominators(v)).collect();

		let satisfies = |v: &[i64]| -> bool {
			v[i] > 0 && (0..n).all(|j| j == i || !nonneg[j] || v[j] >= 0)
		};

		for v in &basis {
			if satisfies(v) {
				return Ok(Some(v.clone()));
			}
			let negated: Vec<i64> = v.iter().map(|&x| -x).collect();
			if satisfies(&negated) {
				return Ok(Some(negated));
			}
		}
		// Bounded search over pairwise integer combinations — a heuristic accelerant (§6.1); a
		// `None` here means project-and-lift falls back to the always-correct Buchberger branch.
		for (idx_a, va) in basis.iter().enumerate() {
			for vb in &basis[(idx_a + 1)..] {
				for ca in -2..=2i64 {
					for cb in -2..=2i64 {
						if ca == 0 && cb == 0 {
							continue;
						}
						let combo: Vec<i64> =
							va.iter().zip(vb.iter()).map(|(&x, &y)| ca * x + cb * y).collect();
						if satisfies(&combo) {
							return Ok(Some(combo));
						}
					}
				}
			}
		}
		Ok(None)
	}

	fn optimal_basis(&self, model: &LpModel) -> Result<Vec<bool>> {
		let std = to_standard_form(model);
		let c = vec![0.0; std.n_std];
		let outcome = simplex::solve(&std.a, &std.b, &c);
		let SimplexOutcome::Optimal { x, .. } = outcome else {
			return Err(Error::OracleFailure {
				reason: "optimal_basis: model has no feasible point".to_string(),
			});
		};
		Ok(std
			.columns
			.iter()
			.map(|&(pos, neg)| {
				x[pos].abs() > 1e-9 || neg.is_some_and(|neg| x[neg].abs() > 1e-9)
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn positive_row_span_finds_a_strictly_positive_vector() {
		let oracle = ReferenceLpOracle;
		let a = vec![vec![3, 2, 1, 1]];
		let b = vec![4];
		let d = oracle.positive_row_span(&a, &b).unwrap();
		assert!(d.iter().all(|&x| x > 0.0));
	}

	#[test]
	fn is_feasible_accepts_a_satisfiable_model() {
		let oracle = ReferenceLpOracle;
		let model = oracle
			.build_model(&[vec![1, 1]], &[2], &[None, None], &[true, true], VarType::Real)
			.unwrap();
		assert!(oracle.is_feasible(&model).unwrap());
	}

	#[test]
	fn is_feasible_rejects_an_infeasible_model() {
		let oracle = ReferenceLpOracle;
		let model = oracle
			.build_model(&[vec![1, 1], vec![1, 1]], &[1, 5], &[None, None], &[true, true], VarType::Real)
			.unwrap();
		assert!(!oracle.is_feasible(&model).unwrap());
	}

	#[test]
	fn is_bounded_detects_an_unbounded_variable() {
		let oracle = ReferenceLpOracle;
		// x1 = 1 is the only constraint; x0 is unconstrained above.
		let model = oracle
			.build_model(&[vec![0, 1]], &[1], &[None, None], &[true, true], VarType::Real)
			.unwrap();
		assert!(!oracle.is_bounded(&model, 0).unwrap());
		assert!(oracle.is_bounded(&model, 1).unwrap());
	}

	#[test]
	fn unboundedness_ray_finds_a_certificate_for_a_free_variable() {
		let oracle = ReferenceLpOracle;
		// A = [1, -1, 1]; ker(A) contains (1,1,0), a valid ray for variable 0.
		let a = vec![vec![1, -1, 1]];
		let nonneg = vec![true, true, false];
		let ray = oracle.unboundedness_ray(&a, &nonneg, 0).unwrap();
		assert!(ray.is_some());
		let ray = ray.unwrap();
		assert!(ray[0] > 0);
		assert!(ray[1] >= 0);
	}
}
