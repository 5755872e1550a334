//! [`ReferenceHermiteOracle`]: an in-process, floating-point-free implementation of
//! [`HermiteOracle`] (§6.2) built on exact rational Gaussian elimination.

use ipgb_utils::{Error, Result};

use super::integer_linalg::{clear_denominators, rational_kernel_basis, rref, solve_rational};
use super::rational::Rational;
use crate::hermite_oracle::HermiteOracle;

/// Computes kernel bases and HNF triangularizations with exact `i128`-backed rational arithmetic
/// (see [`super::rational::Rational`]), never floating point.
///
/// `hnf_lattice_basis` assumes — as is the case for every instance this workspace's own
/// `IPInstance` normalization produces (§4.11 step 5 orders bounded-nonnegative variables first)
/// — that the leading `rank` columns of the kernel lattice are linearly independent, so that a
/// row-only (no column pivoting) triangularization succeeds. When that assumption fails on a
/// caller-supplied matrix, it reports [`Error::OracleFailure`] rather than silently permuting
/// columns behind the caller's back.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceHermiteOracle;

impl HermiteOracle for ReferenceHermiteOracle {
	fn hnf_lattice_basis(&self, a: &[Vec<i64>]) -> Result<(Vec<Vec<i64>>, usize)> {
		let n_cols = a.first().map_or(0, Vec::len);
		let rational: Vec<Vec<Rational>> =
			a.iter().map(|row| row.iter().map(|&x| Rational::from_int(x)).collect()).collect();
		let echelon = rref(&rational);
		let basis = rational_kernel_basis(&echelon, n_cols);
		let mut h: Vec<Vec<i64>> = basis.iter().map(|v| clear_denominators(v)).collect();
		let rank = h.len();
		triangularize(&mut h, rank)?;
		Ok((h, rank))
	}

	fn normalize_hnf(&self, h: &mut [Vec<i64>]) {
		for pivot in 0..h.len() {
			let d = h[pivot][pivot];
			if d == 0 {
				continue;
			}
			for row_above in 0..pivot {
				let val = h[row_above][pivot];
				if val == 0 {
					continue;
				}
				let q = ceil_div(val, d);
				for col in 0..h[pivot].len() {
					h[row_above][col] -= q * h[pivot][col];
				}
			}
		}
	}

	fn solve(&self, a: &[Vec<i64>], b: &[i64]) -> Result<Option<Vec<i64>>> {
		if a.len() != b.len() {
			return Err(Error::InputInvalid {
				reason: format!("A has {} rows but b has {} entries", a.len(), b.len()),
			});
		}
		Ok(solve_rational(a, b))
	}
}

/// `ceil(val / d)` for `d > 0`, without floating point.
fn ceil_div(val: i64, d: i64) -> i64 {
	debug_assert!(d > 0);
	-((-val).div_euclid(d))
}

/// Row-reduces `h` (in place, via unimodular row operations only) so that row `i` has its pivot
/// at column `i` for `i < rank`, with every other row among `i..rank` zeroed at column `i` and the
/// pivot made positive. Operates one column at a time via pairwise Euclidean reduction, the
/// standard integer analogue of Gaussian elimination.
fn triangularize(h: &mut [Vec<i64>], rank: usize) -> Result<()> {
	for pivot in 0..rank {
		loop {
			let nonzero: Vec<usize> = (pivot..rank).filter(|&r| h[r][pivot] != 0).collect();
			match nonzero.len() {
				0 => {
					return Err(Error::OracleFailure {
						reason: format!(
							"kernel basis does not triangularize on leading column {pivot}: reference HNF \
							 assumes the first `rank` columns are independent"
						),
					})
				}
				1 => {
					h.swap(pivot, nonzero[0]);
					break;
				}
				_ => {
					let (a, b) = (nonzero[0], nonzero[1]);
					euclid_reduce_rows(h, a, b, pivot);
				}
			}
		}
		if h[pivot][pivot] < 0 {
			for x in &mut h[pivot] {
				*x = -*x;
			}
		}
	}
	Ok(())
}

/// Reduces the pair `(h[a], h[b])` at column `col` via the subtractive Euclidean algorithm,
/// leaving one of the two rows zero at `col`; a unimodular combination, so it preserves the
/// lattice spanned by `h`'s rows.
fn euclid_reduce_rows(h: &mut [Vec<i64>], mut a: usize, mut b: usize, col: usize) {
	while h[b][col] != 0 {
		let q = h[a][col].div_euclid(h[b][col]);
		for c in 0..h[a].len() {
			let sub = q * h[b][c];
			h[a][c] -= sub;
		}
		std::mem::swap(&mut a, &mut b);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kernel_of_single_row_has_rank_n_minus_one() {
		let oracle = ReferenceHermiteOracle;
		let a = vec![vec![3, 2, 1, 1]];
		let (h, rank) = oracle.hnf_lattice_basis(&a).unwrap();
		assert_eq!(rank, 3);
		assert_eq!(h.len(), 3);
		for row in &h {
			let dot: i64 = row.iter().zip(a[0].iter()).map(|(&x, &y)| x * y).sum();
			assert_eq!(dot, 0);
		}
	}

	#[test]
	fn triangularized_basis_has_zero_below_each_pivot() {
		let oracle = ReferenceHermiteOracle;
		let a = vec![vec![1, 1, 1, 0], vec![1, -1, 0, 1]];
		let (h, rank) = oracle.hnf_lattice_basis(&a).unwrap();
		assert_eq!(rank, 2);
		for pivot in 0..rank {
			for row in (pivot + 1)..rank {
				assert_eq!(h[row][pivot], 0);
			}
			assert!(h[pivot][pivot] > 0);
		}
	}

	#[test]
	fn normalize_hnf_reduces_above_pivot_entries() {
		let oracle = ReferenceHermiteOracle;
		let mut h = vec![vec![5, 0], vec![7, 2]];
		oracle.normalize_hnf(&mut h);
		assert!(h[0][1] <= 0 && h[0][1] > -2);
	}

	#[test]
	fn solve_round_trips_a_consistent_system() {
		let oracle = ReferenceHermiteOracle;
		let a = vec![vec![1, 1, 1], vec![1, -1, 0]];
		let b = vec![2, 0];
		let x = oracle.solve(&a, &b).unwrap().unwrap();
		assert_eq!(x[0] + x[1] + x[2], 2);
	}
}
