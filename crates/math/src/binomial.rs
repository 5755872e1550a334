//! The integer binomial `g⁺ − g⁻` (§3, §4.2) and its two in-scope variants.
//!
//! A plain binomial and one that additionally tracks a graded "degree" (used by the graded
//! divisibility check in the reducer) are kept as a small tagged union:
//! [`Binomial::Plain`] and [`Binomial::Graded`] share a [`BinomialCore`] and both implement
//! [`BinomialLike`] through a single `match`, so generic reduction code never needs to know which
//! variant it was handed.

use std::cell::RefCell;

use ipgb_utils::BitSet;

/// Operations common to every binomial variant; implemented once by [`Binomial`] via `match`.
pub trait BinomialLike {
	/// The raw coordinate vector (length `n`), independent of any cost row.
	fn element(&self) -> &[i64];
	/// The appended cost-row values (length `k`, `k >= 1`).
	fn cost_slice(&self) -> &[i64];
	/// `element` followed by `cost_slice`, as stored contiguously.
	fn full_form(&self) -> &[i64];
	/// row 1 of `C * g`: the primary key of the monomial order.
	fn cost(&self) -> i64 {
		self.cost_slice()[0]
	}
	/// `element[..nonnegative_end]`: the coordinates constrained to be non-negative.
	fn nonnegative_slice(&self, nonnegative_end: usize) -> &[i64] {
		&self.element()[..nonnegative_end]
	}
	/// `element[..bounded_end]`: the coordinates that additionally carry an explicit upper bound.
	fn bounded_slice(&self, bounded_end: usize) -> &[i64] {
		&self.element()[..bounded_end]
	}
	/// `{ i < nonnegative_end : element[i] > 0 }`.
	fn positive_support(&self, nonnegative_end: usize) -> BitSet;
	/// `{ i < bounded_end : element[i] < 0 }`.
	fn negative_support(&self, bounded_end: usize) -> BitSet;
	fn is_zero(&self) -> bool {
		self.element().iter().all(|&x| x == 0)
	}
	/// The graded variant's cached induced degree `A * g⁺`, if this is a graded binomial.
	fn degree(&self) -> Option<&[i64]> {
		None
	}
}

/// The data shared by every variant: the underlying `[element | cost]` vector and a lazily
/// computed, domain-independent cache of which coordinates are strictly positive/negative.
///
/// The cache is intentionally *not* restricted to the non-negative or bounded region — that
/// restriction is applied by the caller (see [`BinomialLike::positive_support`]) — so that
/// [`BinomialCore::negate`] can swap the two caches directly instead of recomputing them: the
/// set of strictly-positive coordinates of `-g` is exactly the set of strictly-negative
/// coordinates of `g`.
#[derive(Debug, Clone)]
pub struct BinomialCore {
	data: Vec<i64>,
	n: usize,
	raw_positive: RefCell<Option<BitSet>>,
	raw_negative: RefCell<Option<BitSet>>,
}

impl BinomialCore {
	pub fn new(element: Vec<i64>, cost: Vec<i64>) -> Self {
		assert!(!cost.is_empty(), "a binomial must carry at least one cost row");
		let n = element.len();
		let mut data = element;
		data.extend_from_slice(&cost);
		Self {
			data,
			n,
			raw_positive: RefCell::new(None),
			raw_negative: RefCell::new(None),
		}
	}

	pub fn element(&self) -> &[i64] {
		&self.data[..self.n]
	}

	pub fn cost_slice(&self) -> &[i64] {
		&self.data[self.n..]
	}

	pub fn full_form(&self) -> &[i64] {
		&self.data
	}

	fn raw_positive(&self) -> BitSet {
		self.raw_positive
			.borrow_mut()
			.get_or_insert_with(|| {
				BitSet::with_indices(
					self.n,
					self.element().iter().enumerate().filter(|&(_, &x)| x > 0).map(|(i, _)| i),
				)
			})
			.clone()
	}

	fn raw_negative(&self) -> BitSet {
		self.raw_negative
			.borrow_mut()
			.get_or_insert_with(|| {
				BitSet::with_indices(
					self.n,
					self.element().iter().enumerate().filter(|&(_, &x)| x < 0).map(|(i, _)| i),
				)
			})
			.clone()
	}

	pub fn positive_support(&self, nonnegative_end: usize) -> BitSet {
		mask_below(&self.raw_positive(), nonnegative_end)
	}

	pub fn negative_support(&self, bounded_end: usize) -> BitSet {
		mask_below(&self.raw_negative(), bounded_end)
	}

	/// Invalidates the lazy sign caches; call after any direct mutation of `data`.
	fn invalidate(&mut self) {
		*self.raw_positive.get_mut() = None;
		*self.raw_negative.get_mut() = None;
	}

	/// Negates every entry (element and cost rows); swaps the sign caches instead of dropping
	/// them, since they are domain-independent (see the struct docs).
	pub fn negate(&mut self) {
		for x in &mut self.data {
			*x = -*x;
		}
		self.raw_positive.swap(&self.raw_negative);
	}

	/// Overwrites `self` with `g - h`, entry-by-entry and cost-row-by-cost-row, using
	/// overflow-checked subtraction. `self`, `g`, and `h` must all have the same element length
	/// and the same number of cost rows.
	pub fn set_to_difference(&mut self, g: &Self, h: &Self) -> ipgb_utils::Result<()> {
		assert_eq!(g.n, h.n);
		assert_eq!(g.data.len(), h.data.len());
		self.n = g.n;
		if self.data.len() != g.data.len() {
			self.data.resize(g.data.len(), 0);
		}
		for (dst, &a, &b) in itertools::izip!(&mut self.data, &g.data, &h.data) {
			*dst = ipgb_utils::checked_arithmetics::checked_sub(a, b)?;
		}
		self.invalidate();
		Ok(())
	}

	/// In place: `self := self - factor * other` (element and cost rows alike), the core
	/// arithmetic of a single reduction step (§4.7 `reduce_step`). `self` and `other` must have
	/// matching lengths.
	pub fn reduce_by(&mut self, other: &Self, factor: i64) -> ipgb_utils::Result<()> {
		use ipgb_utils::checked_arithmetics::{checked_mul, checked_sub};
		assert_eq!(self.data.len(), other.data.len());
		for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
			*dst = checked_sub(*dst, checked_mul(factor, src)?)?;
		}
		self.invalidate();
		Ok(())
	}
}

fn mask_below(raw: &BitSet, end: usize) -> BitSet {
	BitSet::with_indices(raw.capacity(), raw.iter().filter(|&i| i < end))
}

/// A binomial that carries no extra per-variant state beyond [`BinomialCore`].
#[derive(Debug, Clone)]
pub struct PlainBinomial {
	core: BinomialCore,
}

impl PlainBinomial {
	pub fn new(element: Vec<i64>, cost: Vec<i64>) -> Self {
		Self {
			core: BinomialCore::new(element, cost),
		}
	}
}

/// A binomial that additionally tracks the induced degree `A * g⁺`, consulted by the graded
/// divisibility mode in the reducer (§4.7). The degree is supplied by the caller (who alone
/// holds the constraint matrix `A`) and is cleared by any mutation; a stale (`None`) degree on a
/// graded binomial is a caller bug, not a silent fallback to the plain check.
#[derive(Debug, Clone)]
pub struct GradedBinomial {
	core: BinomialCore,
	degree: Option<Vec<i64>>,
}

impl GradedBinomial {
	pub fn new(element: Vec<i64>, cost: Vec<i64>, degree: Vec<i64>) -> Self {
		Self {
			core: BinomialCore::new(element, cost),
			degree: Some(degree),
		}
	}

	/// Recomputes and stores the induced degree; the caller supplies `A * g⁺` directly because
	/// only the caller holds `A`.
	pub fn set_degree(&mut self, degree: Vec<i64>) {
		self.degree = Some(degree);
	}
}

/// A binomial in one of the two in-scope variants (§9): [`Plain`](Binomial::Plain) for ordinary
/// reduction, [`Graded`](Binomial::Graded) when the graded divisibility mode is in use. A
/// signature-carrying third variant is out of scope (§1).
#[derive(Debug, Clone)]
pub enum Binomial {
	Plain(PlainBinomial),
	Graded(GradedBinomial),
}

impl Binomial {
	pub fn plain(element: Vec<i64>, cost: Vec<i64>) -> Self {
		Self::Plain(PlainBinomial::new(element, cost))
	}

	pub fn graded(element: Vec<i64>, cost: Vec<i64>, degree: Vec<i64>) -> Self {
		Self::Graded(GradedBinomial::new(element, cost, degree))
	}

	fn core(&self) -> &BinomialCore {
		match self {
			Self::Plain(p) => &p.core,
			Self::Graded(g) => &g.core,
		}
	}

	fn core_mut(&mut self) -> &mut BinomialCore {
		match self {
			Self::Plain(p) => &mut p.core,
			Self::Graded(g) => &mut g.core,
		}
	}

	pub fn opposite(&mut self) {
		self.core_mut().negate();
		if let Self::Graded(g) = self {
			g.degree = None;
		}
	}

	/// Overwrites `self` with `g - h` (§4.2 `minus`); `self` must already be the same variant as
	/// `g` and `h`. Clears the graded degree, if any — the caller must recompute it.
	pub fn minus_into(result: &mut Self, g: &Self, h: &Self) -> ipgb_utils::Result<()> {
		result.core_mut().set_to_difference(g.core(), h.core())?;
		if let Self::Graded(r) = result {
			r.degree = None;
		}
		Ok(())
	}

	pub fn set_graded_degree(&mut self, degree: Vec<i64>) {
		if let Self::Graded(g) = self {
			g.set_degree(degree);
		}
	}

	/// In place: `self := self - factor * other` (§4.7 `reduce_step`). Clears the graded degree,
	/// if any — the caller must recompute it from the new `g⁺`.
	pub fn reduce_by(&mut self, other: &Self, factor: i64) -> ipgb_utils::Result<()> {
		self.core_mut().reduce_by(other.core(), factor)?;
		if let Self::Graded(g) = self {
			g.degree = None;
		}
		Ok(())
	}
}

impl BinomialLike for Binomial {
	fn element(&self) -> &[i64] {
		self.core().element()
	}

	fn cost_slice(&self) -> &[i64] {
		self.core().cost_slice()
	}

	fn full_form(&self) -> &[i64] {
		self.core().full_form()
	}

	fn positive_support(&self, nonnegative_end: usize) -> BitSet {
		self.core().positive_support(nonnegative_end)
	}

	fn negative_support(&self, bounded_end: usize) -> BitSet {
		self.core().negative_support(bounded_end)
	}

	fn degree(&self) -> Option<&[i64]> {
		match self {
			Self::Plain(_) => None,
			Self::Graded(g) => g.degree.as_deref(),
		}
	}
}
