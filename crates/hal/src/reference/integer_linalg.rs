//! Exact rational Gaussian elimination over [`Rational`], the shared workhorse behind
//! [`super::hermite::ReferenceHermiteOracle`]'s kernel-basis and `solve` queries.

use super::rational::Rational;

/// Reduced row-echelon form of `matrix`, plus the column index of each row's pivot (rows with no
/// pivot, i.e. all-zero rows, are not represented in `pivots`).
pub struct Rref {
	pub rows: Vec<Vec<Rational>>,
	pub pivot_cols: Vec<usize>,
}

/// Full Gauss-Jordan elimination with partial pivoting on magnitude (exact, so any nonzero pivot
/// is as good as any other; we just prefer not to pivot on a zero row).
pub fn rref(matrix: &[Vec<Rational>]) -> Rref {
	let mut rows: Vec<Vec<Rational>> = matrix.to_vec();
	let n_rows = rows.len();
	let n_cols = if n_rows == 0 { 0 } else { rows[0].len() };
	let mut pivot_cols = Vec::new();
	let mut pivot_row = 0;

	for col in 0..n_cols {
		if pivot_row >= n_rows {
			break;
		}
		let Some(sel) = (pivot_row..n_rows).find(|&r| !rows[r][col].is_zero()) else {
			continue;
		};
		rows.swap(pivot_row, sel);

		let inv = rows[pivot_row][col].recip();
		for entry in &mut rows[pivot_row] {
			*entry = *entry * inv;
		}

		for r in 0..n_rows {
			if r == pivot_row || rows[r][col].is_zero() {
				continue;
			}
			let factor = rows[r][col];
			for c in 0..n_cols {
				let sub = rows[pivot_row][c] * factor;
				rows[r][c] = rows[r][c] - sub;
			}
		}

		pivot_cols.push(col);
		pivot_row += 1;
	}

	Rref { rows, pivot_cols }
}

/// A basis of `ker(a)` (over ℚ, represented as a per-basis-vector common integer scaling) given
/// `a`'s reduced row-echelon form: one vector per non-pivot ("free") column, built by the usual
/// back-substitution (set the free variable to one, every other free variable to zero, solve the
/// pivot variables from the echelon rows).
pub fn rational_kernel_basis(echelon: &Rref, n_cols: usize) -> Vec<Vec<Rational>> {
	let is_pivot: Vec<bool> = {
		let mut v = vec![false; n_cols];
		for &c in &echelon.pivot_cols {
			v[c] = true;
		}
		v
	};

	let mut basis = Vec::new();
	for free_col in 0..n_cols {
		if is_pivot[free_col] {
			continue;
		}
		let mut v = vec![Rational::ZERO; n_cols];
		v[free_col] = Rational::ONE;
		for (row_idx, &pivot_col) in echelon.pivot_cols.iter().enumerate() {
			// row `row_idx` reads `x[pivot_col] + sum_{free} echelon[row][free] * x[free] = 0`.
			v[pivot_col] = Rational::ZERO - echelon.rows[row_idx][free_col];
		}
		basis.push(v);
	}
	basis
}

/// Scales a rational vector by the LCM of its denominators, returning an equivalent integer
/// vector (every rational kernel vector built above has at most one nonzero, unit-valued entry
/// per component's own denominator chain, so this always terminates with exact integers).
pub fn clear_denominators(v: &[Rational]) -> Vec<i64> {
	let mut scale: i128 = 1;
	for &x in v {
		let (_, den) = x.as_parts();
		scale = lcm(scale, den);
	}
	v.iter()
		.map(|&x| {
			let scaled = x * Rational::from_ratio(scale, 1);
			scaled.to_i64().expect("scaling by the LCM of denominators must yield an integer")
		})
		.collect()
}

fn lcm(a: i128, b: i128) -> i128 {
	a / gcd128(a, b) * b
}

fn gcd128(a: i128, b: i128) -> i128 {
	let (mut a, mut b) = (a.abs(), b.abs());
	while b != 0 {
		(a, b) = (b, a % b);
	}
	a.max(1)
}

/// Solves `a x = b` over the rationals by elimination on the augmented matrix, setting every free
/// variable to zero; returns `None` if the system is inconsistent or the particular solution
/// found is not integral. This is a reference-grade solver (§6.1/§6.2): it does not attempt the
/// general lattice-membership test that would find an integer solution when the zero-free-vars
/// point happens not to be integral but another combination is.
pub fn solve_rational(a: &[Vec<i64>], b: &[i64]) -> Option<Vec<i64>> {
	let n_cols = a.first().map_or(0, Vec::len);
	let augmented: Vec<Vec<Rational>> = a
		.iter()
		.zip(b.iter())
		.map(|(row, &rhs)| {
			row.iter()
				.map(|&x| Rational::from_int(x))
				.chain(std::iter::once(Rational::from_int(rhs)))
				.collect()
		})
		.collect();
	let echelon = rref(&augmented);

	// Inconsistency: a row with all-zero coefficients but nonzero augmented entry.
	for row in &echelon.rows {
		if row[..n_cols].iter().all(Rational::is_zero) && !row[n_cols].is_zero() {
			return None;
		}
	}

	let mut x = vec![Rational::ZERO; n_cols];
	for (row_idx, &pivot_col) in echelon.pivot_cols.iter().enumerate() {
		x[pivot_col] = echelon.rows[row_idx][n_cols];
	}
	x.iter().map(|&v| v.to_i64()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn r(n: i64) -> Rational {
		Rational::from_int(n)
	}

	#[test]
	fn kernel_basis_of_simple_knapsack_constraint() {
		// A = [3, 2, 1, 1] (the slack-augmented knapsack row): ker(A) is 3-dimensional.
		let a = vec![vec![r(3), r(2), r(1), r(1)]];
		let echelon = rref(&a);
		let basis = rational_kernel_basis(&echelon, 4);
		assert_eq!(basis.len(), 3);
		for v in &basis {
			let dot = v[0] * r(3) + v[1] * r(2) + v[2] + v[3];
			assert_eq!(dot, Rational::ZERO);
		}
	}

	#[test]
	fn solve_finds_an_integer_particular_solution() {
		let a = vec![vec![1, 1, 1], vec![1, -1, 0]];
		let b = vec![2, 0];
		let x = solve_rational(&a, &b).unwrap();
		assert_eq!(x[0] + x[1] + x[2], 2);
		assert_eq!(x[0] - x[1], 0);
	}

	#[test]
	fn solve_detects_inconsistent_systems() {
		let a = vec![vec![1, 1], vec![1, 1]];
		let b = vec![1, 2];
		assert!(solve_rational(&a, &b).is_none());
	}
}
