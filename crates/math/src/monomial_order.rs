//! A total order on `ℤⁿ` given by a cost matrix plus a tiebreaker (§3, §4.3).

use std::cmp::Ordering;

use ipgb_utils::{checked_arithmetics::checked_sub, Error, Result};

/// A matrix `M ∈ ℝ^{k×n}`, `k >= n`, compared row by row from top to bottom: `u <_M v` iff the
/// first row on which `M(u)` and `M(v)` differ has `M(u) < M(v)`. Row 1 is the objective (or
/// objective-derived) row; any further rows are the tiebreak, defaulting to the reverse-lex
/// identity when the caller's cost matrix supplies fewer than `n` rows.
///
/// Stored row-major: the hot loop in [`MonomialOrder::cmp`] walks one row to completion (or to
/// its first non-zero partial sum) before ever touching the next, so each row's `n` entries
/// should be contiguous.
#[derive(Debug, Clone)]
pub struct MonomialOrder {
	rows: Vec<Vec<f64>>,
	n: usize,
}

impl MonomialOrder {
	/// Builds an order from `rows`, appending the reverse-lex identity tiebreaker if fewer than
	/// `n` rows were supplied (§4.3 step 1). Does not perform the mandatory positivity shift of
	/// step 2 — that requires an LP dual and is the caller's responsibility (see
	/// `ipgb_core::build_monomial_order`, which has access to an `LPOracle` and applies the shift
	/// unconditionally before handing back an order built from instance data).
	pub fn from_rows(mut rows: Vec<Vec<f64>>, n: usize) -> Result<Self> {
		if rows.iter().any(|row| row.len() != n) {
			return Err(Error::InputInvalid {
				reason: "monomial order matrix row length does not match the number of variables"
					.to_string(),
			});
		}
		if rows.is_empty() {
			return Err(Error::InputInvalid {
				reason: "monomial order matrix must have at least one row".to_string(),
			});
		}
		if rows.len() < n {
			rows.extend(reverse_lex_identity(n));
		}
		Ok(Self { rows, n })
	}

	pub fn n_vars(&self) -> usize {
		self.n
	}

	pub fn n_rows(&self) -> usize {
		self.rows.len()
	}

	/// Adds `lambda * direction[j]` to every entry `j` of row 1 (§4.3 step 2). `direction` must be
	/// a strictly positive vector in the row span of the instance's constraint matrix `A` (an
	/// `LPOracle::positive_row_span` result): because such a vector is a linear combination of
	/// `A`'s rows, it is orthogonal to every `v ∈ ker(A)`, so this shift leaves `cmp`/`is_inverted`
	/// unchanged on the lattice of feasible moves while making row 1 itself strictly positive for
	/// `lambda` large enough.
	pub fn shift_first_row(&mut self, direction: &[f64], lambda: f64) {
		for (entry, &d) in self.rows[0].iter_mut().zip(direction.iter()) {
			*entry += lambda * d;
		}
	}

	/// Row 1 as given to `from_rows`, pre-shift-or-not — the row a caller must inspect for
	/// negative entries to decide whether the positivity shift of §4.3 step 2 applies.
	pub fn first_row(&self) -> &[f64] {
		&self.rows[0]
	}

	fn row_value(&self, row: usize, v: &[i64]) -> f64 {
		self.rows[row]
			.iter()
			.zip(v.iter())
			.map(|(&m, &x)| m * x as f64)
			.sum()
	}

	/// `u <_M v`, `u ==_M v`, or `u >_M v`: the first row where the two vectors differ decides.
	pub fn cmp(&self, u: &[i64], v: &[i64]) -> Ordering {
		for row in 0..self.rows.len() {
			let du = self.row_value(row, u);
			let dv = self.row_value(row, v);
			match du.partial_cmp(&dv) {
				Some(Ordering::Equal) | None => continue,
				Some(ord) => return ord,
			}
		}
		Ordering::Equal
	}

	/// `v⁻ >_M v⁺`: whether `v` as given is oriented backwards and should be negated.
	pub fn is_inverted(&self, v: &[i64]) -> bool {
		for row in 0..self.rows.len() {
			let value = self.row_value(row, v);
			if value > 0.0 {
				return false;
			}
			if value < 0.0 {
				return true;
			}
		}
		// All rows produced zero on a nonzero v: the order is degenerate. `from_rows` and the
		// positivity shift are responsible for preventing this; treat it as uninverted rather
		// than panicking on otherwise well-typed input.
		false
	}

	/// Orients `v` under this order in place, negating every entry and returning whether a
	/// negation happened.
	pub fn orient(&self, v: &mut [i64]) -> Result<bool> {
		if self.is_inverted(v) {
			for x in v.iter_mut() {
				*x = checked_sub(0, *x)?;
			}
			Ok(true)
		} else {
			Ok(false)
		}
	}
}

/// The default tiebreak: `n` rows, row `i` the negated `i`-th standard basis vector, i.e. the
/// identity matrix negated — ties go to the lexicographically-largest vector reading right to
/// left, which is the conventional "reverse-lex" tiebreak.
fn reverse_lex_identity(n: usize) -> Vec<Vec<f64>> {
	(0..n)
		.map(|i| {
			let mut row = vec![0.0; n];
			row[n - 1 - i] = -1.0;
			row
		})
		.collect()
}
