//! Overflow-checked arithmetic over the `i64` problem data.
//!
//! Every arithmetic operation performed on a vector entry, a cost, or a matrix coefficient in
//! the hot path of reduction and completion goes through one of these helpers instead of a raw
//! operator, so that an overflowing computation surfaces as [`Error::Overflow`] rather than a
//! silent wraparound or a release-mode panic.

use crate::error::{Error, Result};

#[inline]
pub fn checked_add(a: i64, b: i64) -> Result<i64> {
	a.checked_add(b).ok_or(Error::Overflow)
}

#[inline]
pub fn checked_sub(a: i64, b: i64) -> Result<i64> {
	a.checked_sub(b).ok_or(Error::Overflow)
}

#[inline]
pub fn checked_mul(a: i64, b: i64) -> Result<i64> {
	a.checked_mul(b).ok_or(Error::Overflow)
}

/// Computes `k * v` for a scalar `k` and a single coordinate `v`.
#[inline]
pub fn checked_scale(k: i64, v: i64) -> Result<i64> {
	checked_mul(k, v)
}

/// Computes the dot product `Σ a[i] * b[i]`, checked at every multiplication and accumulation.
pub fn checked_dot(a: &[i64], b: &[i64]) -> Result<i64> {
	a.iter()
		.zip(b.iter())
		.try_fold(0i64, |acc, (&x, &y)| checked_add(acc, checked_mul(x, y)?))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_overflow_is_detected() {
		assert_eq!(checked_add(i64::MAX, 1), Err(Error::Overflow));
	}

	#[test]
	fn mul_overflow_is_detected() {
		assert_eq!(checked_mul(i64::MAX, 2), Err(Error::Overflow));
	}

	#[test]
	fn dot_product_is_exact() {
		assert_eq!(checked_dot(&[1, 2, 3], &[4, 5, 6]), Ok(32));
	}
}
