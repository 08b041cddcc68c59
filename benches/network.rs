use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;

use cgnet::{BackpropCost, CostFunction, Network, Topology, WeightSet};

fn bench_data() -> (Array2<f64>, Array2<f64>) {
    let x = Array2::from_shape_fn((128, 64), |(i, j)| ((i * 31 + j * 7) % 17) as f64 / 17.0 - 0.5);
    let y = Array2::from_shape_fn((128, 10), |(i, j)| if j == i % 10 { 1.0 } else { 0.0 });
    (x, y)
}

fn hypothesis_bench(c: &mut Criterion) {
    let net = Network::with_seed(Topology::new(vec![64, 32, 10]).unwrap(), 0);
    let (x, _) = bench_data();

    c.bench_function("hypothesis_64_32_10_m128", |b| {
        b.iter(|| {
            let h = net.hypothesis(black_box(&x)).unwrap();
            black_box(h);
        })
    });
}

fn cost_gradient_bench(c: &mut Criterion) {
    let topo = Topology::new(vec![64, 32, 10]).unwrap();
    let (x, y) = bench_data();
    let cost = BackpropCost::new(&x, &y, &topo, 1.0).unwrap();
    let theta = WeightSet::random_with_seed(&topo, 0).flatten();

    c.bench_function("cost_gradient_64_32_10_m128", |b| {
        b.iter(|| {
            let (j, grad) = cost.evaluate_cost(black_box(&theta));
            black_box((j, grad));
        })
    });
}

criterion_group!(benches, hypothesis_bench, cost_gradient_bench);
criterion_main!(benches);
