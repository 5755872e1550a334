use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ipgb_math::{Binomial, BinomialLike, MonomialOrder};

fn make_binomial(n: usize, seed: i64) -> Binomial {
	let element: Vec<i64> = (0..n)
		.map(|i| ((i as i64 + seed) % 7) - 3)
		.collect();
	Binomial::plain(element, vec![seed])
}

fn bench_positive_support(c: &mut Criterion) {
	let mut group = c.benchmark_group("positive_support");
	for n in [16, 64, 256] {
		let g = make_binomial(n, 1);
		group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
			b.iter(|| g.positive_support(n));
		});
	}
	group.finish();
}

fn bench_minus_into(c: &mut Criterion) {
	let mut group = c.benchmark_group("minus_into");
	for n in [16, 64, 256] {
		let g = make_binomial(n, 3);
		let h = make_binomial(n, 5);
		let mut result = make_binomial(n, 0);
		group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
			b.iter(|| Binomial::minus_into(&mut result, &g, &h).unwrap());
		});
	}
	group.finish();
}

fn bench_order_cmp(c: &mut Criterion) {
	let mut group = c.benchmark_group("monomial_order_cmp");
	for n in [16, 64, 256] {
		let rows = vec![vec![1.0; n]];
		let order = MonomialOrder::from_rows(rows, n).unwrap();
		let u: Vec<i64> = (0..n as i64).collect();
		let v: Vec<i64> = (0..n as i64).rev().collect();
		group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
			b.iter(|| order.cmp(&u, &v));
		});
	}
	group.finish();
}

criterion_group!(benches, bench_positive_support, bench_minus_into, bench_order_cmp);
criterion_main!(benches);
