use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use cogbat_core::{AdaptiveState, SortRule, TrialContext};
use cogbat_experiment::{TaskKind, TaskPlan, TrialRunner};
use cogbat_timing::ManualTimer;

fn state_for(kind: TaskKind) -> AdaptiveState {
    match kind {
        TaskKind::CardSort => AdaptiveState::with_rule(SortRule::Color),
        TaskKind::WordRecall => AdaptiveState::with_span(10),
        _ => AdaptiveState::with_span(7),
    }
}

fn plan(kind: TaskKind) -> TaskPlan {
    kind.default_config().plan().expect("defaults are valid")
}

/// One generate + score round per task.
pub fn bench_generate_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_score");
    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));

    for kind in TaskKind::ALL {
        let plan = plan(kind);
        let state = state_for(kind);
        group.bench_with_input(BenchmarkId::from_parameter(kind.slug()), &kind, |b, _| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| {
                let ctx = TrialContext {
                    index: 0,
                    state: &state,
                };
                let spec = plan.generator.generate(&ctx, &mut rng);
                let answer = spec.expected_answer();
                black_box(plan.scorer.score(&spec, black_box(&answer)))
            });
        });
    }
    group.finish();
}

/// A full fixed-count session, participant form to terminal.
pub fn bench_full_session(c: &mut Criterion) {
    c.bench_function("flanker_session_100", |b| {
        b.iter_batched(
            || {
                let plan = TaskKind::Flanker
                    .default_config()
                    .with_trials(100)
                    .plan()
                    .expect("valid");
                TrialRunner::new(plan, ManualTimer::new(), StdRng::seed_from_u64(7))
            },
            |mut runner| {
                runner.submit_participant(cogbat_core::ParticipantForm::new("bench"));
                while !runner.is_terminal() {
                    runner.advance();
                    runner.respond("left");
                }
                black_box(runner.results().correct_count())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_generate_score, bench_full_session);
criterion_main!(benches);
