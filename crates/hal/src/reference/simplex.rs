//! A dense-tableau two-phase primal simplex over `f64`, the numeric engine behind
//! [`super::lp::ReferenceLpOracle`] (§6.1: "a primal simplex method over `f64` with a small
//! numeric tolerance"). Solves `max c·x s.t. Ax=b, x≥0` — callers needing variable upper bounds
//! or free (non-non-negative) variables lower this into that standard form first (see
//! `super::lp::to_standard_form`).

const EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub enum SimplexOutcome {
	Infeasible,
	Unbounded,
	Optimal { x: Vec<f64>, objective: f64, basis: Vec<usize> },
}

/// `max c·x` subject to `Ax = b`, `x ≥ 0`, where `c` has exactly `a[0].len()` entries (the
/// "structural" variables only — artificial variables are managed internally).
pub fn solve(a: &[Vec<f64>], b: &[f64], c: &[f64]) -> SimplexOutcome {
	let m = a.len();
	if m == 0 {
		return SimplexOutcome::Optimal { x: vec![0.0; c.len()], objective: 0.0, basis: vec![] };
	}
	let n = a[0].len();
	let n_total = n + m;

	// Tableau columns: [structural (n) | artificial (m) | rhs]. Row-normalize so rhs >= 0, so
	// the artificial identity block is a valid initial basic feasible solution.
	let mut tableau: Vec<Vec<f64>> = Vec::with_capacity(m);
	for i in 0..m {
		let sign = if b[i] < 0.0 { -1.0 } else { 1.0 };
		let mut row = vec![0.0; n_total + 1];
		for j in 0..n {
			row[j] = sign * a[i][j];
		}
		row[n + i] = 1.0; // artificial column always enters as +1, independent of the row's sign flip.
		row[n_total] = sign * b[i];
		tableau.push(row);
	}
	let mut basis: Vec<usize> = (0..m).map(|i| n + i).collect();

	// Phase 1: minimize the sum of artificials, i.e. maximize their negative sum.
	let mut phase1_cost = vec![0.0; n_total];
	for i in 0..m {
		phase1_cost[n + i] = -1.0;
	}
	let candidates: Vec<usize> = (0..n_total).collect();
	run_to_optimal(&mut tableau, &mut basis, &phase1_cost, &candidates, n_total);
	let (_, phase1_value) = reduced_costs(&tableau, &basis, &phase1_cost, n_total);
	if phase1_value.abs() > 1e-6 {
		return SimplexOutcome::Infeasible;
	}

	// Drive any artificial still in the basis (necessarily at value ~0) out, where possible.
	for row in 0..m {
		if basis[row] < n {
			continue;
		}
		if let Some(q) = (0..n).find(|&j| tableau[row][j].abs() > EPS) {
			pivot(&mut tableau, row, q);
			basis[row] = q;
		}
	}

	// Phase 2: optimize the caller's real objective, restricted to structural columns only —
	// artificials never re-enter the basis once driven to zero.
	let mut phase2_cost = vec![0.0; n_total];
	phase2_cost[..n].copy_from_slice(c);
	let structural: Vec<usize> = (0..n).collect();
	if !run_to_optimal(&mut tableau, &mut basis, &phase2_cost, &structural, n_total) {
		return SimplexOutcome::Unbounded;
	}

	let (_, objective) = reduced_costs(&tableau, &basis, &phase2_cost, n_total);
	let mut x = vec![0.0; n];
	for (row, &col) in basis.iter().enumerate() {
		if col < n {
			x[col] = tableau[row][n_total];
		}
	}
	SimplexOutcome::Optimal { x, objective, basis: basis.clone() }
}

/// Pivots until no candidate column has a negative reduced cost. Returns `false` if an improving
/// column exists with no limiting row (the LP is unbounded in the maximization direction).
fn run_to_optimal(
	tableau: &mut Vec<Vec<f64>>,
	basis: &mut [usize],
	cost: &[f64],
	candidates: &[usize],
	n_total: usize,
) -> bool {
	loop {
		let (reduced, _) = reduced_costs(tableau, basis, cost, n_total);
		let Some(&q) = candidates.iter().filter(|&&j| reduced[j] < -EPS).min_by(|&&a, &&b| {
			reduced[a].partial_cmp(&reduced[b]).unwrap_or(std::cmp::Ordering::Equal)
		}) else {
			return true;
		};

		let mut best_row = None;
		for row in 0..tableau.len() {
			if tableau[row][q] <= EPS {
				continue;
			}
			let ratio = tableau[row][n_total] / tableau[row][q];
			best_row = match best_row {
				None => Some((row, ratio)),
				Some((_, best_ratio)) if ratio < best_ratio - EPS => Some((row, ratio)),
				Some((best_r, best_ratio))
					if (ratio - best_ratio).abs() <= EPS && basis[row] < basis[best_r] =>
				{
					Some((row, ratio))
				}
				other => other,
			};
		}

		let Some((p, _)) = best_row else {
			return false;
		};
		pivot(tableau, p, q);
		basis[p] = q;
	}
}

fn reduced_costs(tableau: &[Vec<f64>], basis: &[usize], cost: &[f64], n_total: usize) -> (Vec<f64>, f64) {
	let c_b: Vec<f64> = basis.iter().map(|&j| cost[j]).collect();
	let mut reduced = vec![0.0; n_total];
	for (j, entry) in reduced.iter_mut().enumerate() {
		let z_j: f64 = c_b.iter().zip(tableau.iter()).map(|(&cb, row)| cb * row[j]).sum();
		*entry = z_j - cost[j];
	}
	let objective: f64 = c_b.iter().zip(tableau.iter()).map(|(&cb, row)| cb * row[n_total]).sum();
	(reduced, objective)
}

fn pivot(tableau: &mut [Vec<f64>], p: usize, q: usize) {
	let pivot_value = tableau[p][q];
	let n_cols = tableau[p].len();
	for col in 0..n_cols {
		tableau[p][col] /= pivot_value;
	}
	for row in 0..tableau.len() {
		if row == p {
			continue;
		}
		let factor = tableau[row][q];
		if factor.abs() < EPS {
			continue;
		}
		for col in 0..n_cols {
			tableau[row][col] -= factor * tableau[p][col];
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn solves_a_small_feasible_maximization() {
		// max x0 + x1 s.t. x0 + x1 + x2 = 2 (slack x2), x0,x1,x2 >= 0.
		let a = vec![vec![1.0, 1.0, 1.0]];
		let b = vec![2.0];
		let c = vec![1.0, 1.0, 0.0];
		match solve(&a, &b, &c) {
			SimplexOutcome::Optimal { objective, .. } => assert!((objective - 2.0).abs() < 1e-6),
			other => panic!("expected optimal, got {other:?}"),
		}
	}

	#[test]
	fn detects_infeasibility() {
		let a = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
		let b = vec![1.0, 5.0]; // x0+x1 = 1 and x0+x1 = 5 simultaneously: infeasible.
		let c = vec![0.0, 0.0];
		assert!(matches!(solve(&a, &b, &c), SimplexOutcome::Infeasible));
	}

	#[test]
	fn detects_unboundedness() {
		// max x0 s.t. x1 = 1 (x0 free to grow), x0,x1 >= 0.
		let a = vec![vec![0.0, 1.0]];
		let b = vec![1.0];
		let c = vec![1.0, 0.0];
		assert!(matches!(solve(&a, &b, &c), SimplexOutcome::Unbounded));
	}
}
