//! Benchmark for session scoring throughput
//!
//! Each iteration runs a full 64-trial session from a fixed seed.

use card_sort_core::card::Rule;
use card_sort_core::config::SessionConfig;
use card_sort_core::session::SessionState;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Choice that sorts the target correctly under `rule`, or card 0 if none does
fn correct_choice(session: &SessionState, rule: Rule) -> usize {
    let target = *session.target();
    session
        .reference_cards()
        .iter()
        .position(|c| c.agrees_on(&target, rule))
        .unwrap_or(0)
}

fn run_session(seed: u64, strategy: impl Fn(&SessionState, u32) -> usize) -> u32 {
    let config = SessionConfig {
        seed: Some(seed),
        ..Default::default()
    };
    let mut session = SessionState::new(config).expect("default config is valid");
    session.start();
    while !session.is_finished() {
        let choice = strategy(&session, session.trial_count());
        session.submit_choice(choice).expect("choice in range");
    }
    session.summary().total_errors
}

fn bench_sessions(c: &mut Criterion) {
    c.bench_function("session_perfect_subject", |b| {
        b.iter(|| run_session(black_box(7), |s, _| correct_choice(s, s.current_rule())))
    });

    c.bench_function("session_perseverating_subject", |b| {
        b.iter(|| run_session(black_box(7), |s, _| correct_choice(s, Rule::Color)))
    });

    c.bench_function("session_random_subject", |b| {
        b.iter(|| run_session(black_box(7), |_, trial| (trial as usize * 7 + 3) % 4))
    });
}

criterion_group!(benches, bench_sessions);
criterion_main!(benches);
