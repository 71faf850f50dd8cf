use std::hint::black_box;
use std::time::Instant;

use laneway_render::HeadlessBackend;
use laneway_stream::{SectionStream, StreamConfig};

const LANES: [f32; 3] = [-3.0, 0.0, 3.0];

fn bench_reset(lookahead: usize, iterations: usize) {
    let config = StreamConfig {
        lookahead_count: lookahead,
        ..StreamConfig::default()
    };
    let mut backend = HeadlessBackend::new();
    let mut stream = SectionStream::new(config, LANES, 42);

    let start = Instant::now();
    for _ in 0..iterations {
        stream.reset(black_box(&mut backend));
        stream.drain_events();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  reset (lookahead={lookahead}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_advance(speed: f32, ticks: usize) {
    let mut backend = HeadlessBackend::new();
    let mut stream = SectionStream::new(StreamConfig::default(), LANES, 42);
    stream.reset(&mut backend);

    let dt = 1.0 / 60.0;
    let mut z = 0.0_f32;
    let start = Instant::now();
    for _ in 0..ticks {
        z += speed * dt;
        let _ = black_box(stream.advance(black_box(z), dt, &mut backend));
        stream.drain_events();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / ticks as u32;
    println!(
        "  advance (speed={speed}, {ticks} ticks): {per_iter:?}/tick, total {elapsed:?}, spawned {}",
        stream.spawned_total()
    );
}

fn main() {
    println!("=== Section Stream Benchmarks ===\n");

    println!("Reset:");
    bench_reset(5, 1000);
    bench_reset(20, 200);

    println!("\nAdvance (spawn/fade/retire):");
    bench_advance(14.0, 10_000);
    bench_advance(60.0, 10_000);
    bench_advance(240.0, 10_000);

    println!("\n=== Done ===");
}
