//! Truncation (§4.8): optionally discards a candidate binomial before it ever reaches the
//! support tree, bounding completion to only the information a truncated (degree- or
//! model-bounded) test set actually needs.
//!
//! Applied twice by the completion loop (§4.9): once per seed generator at initialization, and
//! once per S-binomial before reduction.

use ipgb_hal::{LPOracle, LpModel, VarType};
use ipgb_math::BinomialLike;
use ipgb_utils::Result;

use crate::config::{ModelKind, TruncationMode};

/// Owns whatever state a truncation mode needs across many calls: `Model` mode keeps a single
/// preconstructed [`LpModel`] and mutates its right-hand side per query rather than rebuilding it
/// (§6.1 `set_normalized_rhs`).
pub struct Truncator<'a, L: LPOracle> {
	mode: TruncationMode,
	a: &'a [Vec<i64>],
	b: &'a [i64],
	u: &'a [Option<i64>],
	lp: &'a L,
	model: Option<LpModel>,
}

impl<'a, L: LPOracle> Truncator<'a, L> {
	pub fn new(
		mode: TruncationMode,
		a: &'a [Vec<i64>],
		b: &'a [i64],
		u: &'a [Option<i64>],
		nonneg: &'a [bool],
		lp: &'a L,
	) -> Result<Self> {
		let model = match mode {
			TruncationMode::Model(kind) => {
				let var_type = match kind {
					ModelKind::Lp => VarType::Real,
					ModelKind::Ip => VarType::Integer,
				};
				Some(lp.build_model(a, b, u, nonneg, var_type)?)
			}
			TruncationMode::None | TruncationMode::Simple => None,
		};
		Ok(Self { mode, a, b, u, lp, model })
	}

	/// Whether `g` should be kept (`true`) or discarded as provably unneeded (`false`).
	pub fn keep(&mut self, g: &impl BinomialLike) -> Result<bool> {
		match self.mode {
			TruncationMode::None => Ok(true),
			TruncationMode::Simple => Ok(self.keep_simple(g.element())),
			TruncationMode::Model(_) => self.keep_by_model(g.element()),
		}
	}

	fn keep_simple(&self, v: &[i64]) -> bool {
		for (row, &rhs) in self.a.iter().zip(self.b.iter()) {
			let av_plus: i64 = row.iter().zip(v.iter()).map(|(&a, &x)| a * x.max(0)).sum();
			let av_minus: i64 = row.iter().zip(v.iter()).map(|(&a, &x)| a * (-x).max(0)).sum();
			if av_plus > rhs || av_minus > rhs {
				return false;
			}
		}
		for (&bound, &x) in self.u.iter().zip(v.iter()) {
			if let Some(bound) = bound {
				if x.unsigned_abs() > bound.unsigned_abs() {
					return false;
				}
			}
		}
		true
	}

	fn keep_by_model(&mut self, v: &[i64]) -> Result<bool> {
		let rhs: Vec<i64> = self
			.a
			.iter()
			.zip(self.b.iter())
			.map(|(row, &b_i)| {
				let av_plus: i64 = row.iter().zip(v.iter()).map(|(&a, &x)| a * x.max(0)).sum();
				b_i - av_plus
			})
			.collect();
		let model = self.model.as_mut().expect("Model mode always constructs a cached model");
		self.lp.set_normalized_rhs(model, &rhs);
		self.lp.is_feasible(model)
	}
}
