//! Metronome example
//!
//! Schedules a periodic millisecond timer and prints ten ticks, showing
//! the callback-return rescheduling contract.

use std::sync::mpsc;

use tickd::{add_timer_ms, init_timers, quit_timers, remove_timer, ticks_ms};

fn main() {
    println!("=== tickd metronome ===\n");

    init_timers().expect("timer service failed to start");

    let (tx, rx) = mpsc::channel();
    let id = add_timer_ms(100, move |_, interval| {
        let _ = tx.send(ticks_ms());
        // Returning the interval keeps the metronome going
        interval
    })
    .expect("failed to schedule metronome");

    println!("metronome {} started at 100ms\n", id);

    for (i, at) in rx.iter().take(10).enumerate() {
        println!("tick {:>2} at {:>5} ms", i + 1, at);
    }

    if remove_timer(id) {
        println!("\nmetronome {} removed", id);
    }

    quit_timers();
}
