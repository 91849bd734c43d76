use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tranship_algos::TransportSimplex;
use tranship_api::{Customer, InitialMethod, Location, SolveOptions, TransportInstance, TransportSolver};
use tranship_core::math::Scalar;
use tranship_core::problem::TransportProblem;

fn random_instance(m: usize, n: usize, rng: &mut SmallRng) -> TransportInstance<Scalar> {
    let locations: Vec<Location<Scalar>> = (0..m)
        .map(|i| Location::new(format!("plant-{i}"), rng.gen_range(50..=200), rng.gen::<Scalar>()))
        .collect();
    let capacity: u64 = locations.iter().map(|location| location.capacity).sum();
    // Keep total demand at roughly 80% of capacity so a surplus always exists.
    let share = capacity * 4 / 5 / n as u64;
    let customers = (0..n)
        .map(|j| {
            locations.iter().fold(
                Customer::new(format!("customer-{j}"), rng.gen_range(0..=share)),
                |customer, location| {
                    customer.cost(location.name.clone(), rng.gen_range(1.0..20.0))
                },
            )
        })
        .collect();
    TransportInstance {
        locations,
        customers,
    }
}

fn random_problem(m: usize, n: usize, rng: &mut SmallRng) -> TransportProblem<Scalar> {
    let supply: Vec<u64> = (0..m).map(|_| rng.gen_range(10..=100)).collect();
    let total: u64 = supply.iter().sum();
    let mut demand: Vec<u64> = vec![total / n as u64; n];
    demand[n - 1] += total % n as u64;
    let costs = (0..m)
        .map(|_| (0..n).map(|_| rng.gen_range(0..50) as Scalar).collect())
        .collect();
    TransportProblem::from_raw(costs, supply, demand).unwrap()
}

fn simplex_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transport_simplex");
    let mut rng = SmallRng::seed_from_u64(42);
    for (m, n) in [(5, 10), (20, 40), (50, 100)] {
        for initial in [InitialMethod::LeastCost, InitialMethod::Vogel] {
            let id = BenchmarkId::new(initial.to_string(), format!("{m}x{n}"));
            group.bench_function(id, |b| {
                b.iter_batched(
                    || random_problem(m, n, &mut rng),
                    |problem| {
                        let options = SolveOptions {
                            initial,
                            ..SolveOptions::default()
                        };
                        TransportSimplex::new(options).solve(&problem).unwrap()
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn batch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("transport_batch");
    let mut rng = SmallRng::seed_from_u64(7);
    let instances: Vec<_> = (0..32).map(|_| random_instance(10, 25, &mut rng)).collect();
    let solver = TransportSolver::<Scalar>::new();
    group.bench_function("sequential_32", |b| {
        b.iter(|| {
            instances
                .iter()
                .map(|instance| solver.solve_instance(instance).unwrap().total_cost)
                .sum::<Scalar>()
        });
    });
    group.bench_function("parallel_32", |b| {
        b.iter(|| solver.solve_batch(&instances));
    });
    group.finish();
}

criterion_group!(benches, simplex_benchmark, batch_benchmark);
criterion_main!(benches);
