//! Precise-delay overshoot measurement
//!
//! Compares `delay_precise` against the plain platform sleep across a
//! range of targets and prints min/mean/max overshoot for each.

use tickd::{delay_ns, delay_precise, ticks_ns};

const TARGETS_NS: &[u64] = &[100_000, 1_000_000, 5_000_000, 20_000_000, 50_000_000];
const ROUNDS: usize = 50;

fn measure(label: &str, sleep: impl Fn(u64), target_ns: u64) {
    let mut overshoots = Vec::with_capacity(ROUNDS);
    for _ in 0..ROUNDS {
        let start = ticks_ns();
        sleep(target_ns);
        let elapsed = ticks_ns() - start;
        overshoots.push(elapsed.saturating_sub(target_ns));
    }
    let min = overshoots.iter().min().copied().unwrap_or(0);
    let max = overshoots.iter().max().copied().unwrap_or(0);
    let mean = overshoots.iter().sum::<u64>() / ROUNDS as u64;
    println!(
        "{label:>13} target {:>9}ns  overshoot min {:>8}ns  mean {:>8}ns  max {:>9}ns",
        target_ns, min, mean, max
    );
}

fn main() {
    println!("=== tickd precise-delay measurement ({ROUNDS} rounds each) ===\n");

    for &target_ns in TARGETS_NS {
        measure("delay_ns", delay_ns, target_ns);
        measure("delay_precise", delay_precise, target_ns);
        println!();
    }
}
