//! Performance benchmarks for EVONET

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evonet::checkpoint::Checkpoint;
use evonet::neural::Network;
use evonet::tasks::{SeekTask, INPUTS, OUTPUTS};
use evonet::{Config, Mutator, Population};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn grown_network(mutator: &mut Mutator, hidden: usize, rng: &mut ChaCha8Rng) -> Network {
    let mut network = Network::fully_connected(INPUTS, OUTPUTS);
    mutator.randomize_network(&mut network, rng);
    for _ in 0..hidden {
        mutator.create_random_neuron(&mut network, rng);
    }
    network
}

fn benchmark_network_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_update");
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut mutator = Mutator::default();

    for hidden in [0, 10, 50].iter() {
        let mut network = grown_network(&mut mutator, *hidden, &mut rng);
        let inputs = [0.5f32; INPUTS];

        group.bench_with_input(BenchmarkId::new("hidden", hidden), hidden, |b, _| {
            b.iter(|| {
                network.set_inputs(black_box(&inputs));
                network.update();
            });
        });
    }

    group.finish();
}

fn benchmark_mutation(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut mutator = Mutator::default();
    let base = grown_network(&mut mutator, 10, &mut rng);

    c.bench_function("mutate", |b| {
        b.iter(|| {
            let mut network = base.clone();
            mutator.mutate(&mut network, &mut rng);
            black_box(network)
        });
    });
}

fn benchmark_crossover(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut mutator = Mutator::default();
    let a = grown_network(&mut mutator, 10, &mut rng);
    let b_net = grown_network(&mut mutator, 10, &mut rng);

    c.bench_function("cross", |b| {
        b.iter(|| mutator.cross(black_box(&a), black_box(&b_net), &mut rng));
    });
}

fn benchmark_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("round");
    group.sample_size(10);

    for size in [50, 200].iter() {
        let mut config = Config::default();
        config.population.size = *size;
        config.task.ticks_per_round = 200;

        let task = SeekTask::new(&config.task);
        let mut population = Population::new_with_seed(config, INPUTS, OUTPUTS, 42);

        group.bench_with_input(BenchmarkId::new("population", size), size, |b, _| {
            b.iter(|| population.run_round(&task));
        });
    }

    group.finish();
}

fn benchmark_checkpoint(c: &mut Criterion) {
    let config = Config::default();
    let task = SeekTask::new(&config.task);
    let mut population = Population::new_with_seed(config, INPUTS, OUTPUTS, 42);
    population.run(&task, 5);

    let checkpoint: Checkpoint = population.create_checkpoint();

    c.bench_function("checkpoint_serialize", |b| {
        b.iter(|| bincode::serialize(black_box(&checkpoint)))
    });
}

criterion_group!(
    benches,
    benchmark_network_update,
    benchmark_mutation,
    benchmark_crossover,
    benchmark_round,
    benchmark_checkpoint,
);
criterion_main!(benches);
