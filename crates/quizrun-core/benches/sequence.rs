use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizrun_core::configurator::{build_play_sequence, SessionConfig};
use quizrun_core::history::{AnswerEvent, History};
use quizrun_core::model::{OptionKey, QuestionRecord};
use quizrun_core::report::build_report;
use quizrun_core::QuestionStore;

fn make_store(n: usize) -> QuestionStore {
    let questions = (0..n)
        .map(|i| {
            QuestionRecord::new(
                format!("Câu {i}. Question {i}"),
                [
                    format!("A{i}"),
                    format!("B{i}"),
                    format!("C{i}"),
                    format!("D{i}"),
                ],
                OptionKey::ALL[i % 4],
            )
            .unwrap()
        })
        .collect();
    QuestionStore::new(questions)
}

fn bench_build_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_play_sequence");
    let store = make_store(1_000);
    let mut rng = StdRng::seed_from_u64(0);

    let shuffled = SessionConfig::for_store_size(store.len());
    group.bench_function("shuffle_all", |b| {
        b.iter(|| build_play_sequence(black_box(&store), &shuffled, &mut rng))
    });

    let limited = SessionConfig {
        limit: 40,
        ..shuffled
    };
    group.bench_function("shuffle_limit_40", |b| {
        b.iter(|| build_play_sequence(black_box(&store), &limited, &mut rng))
    });

    let ordered = SessionConfig {
        shuffle: false,
        ..shuffled
    };
    group.bench_function("ordered", |b| {
        b.iter(|| build_play_sequence(black_box(&store), &ordered, &mut rng))
    });

    group.finish();
}

fn bench_build_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_report");
    let store = make_store(200);
    let config = SessionConfig {
        shuffle: false,
        ..SessionConfig::for_store_size(store.len())
    };
    let sequence = build_play_sequence(&store, &config, &mut StdRng::seed_from_u64(0)).unwrap();

    let mut history = History::new();
    for (index, question) in sequence.iter().enumerate() {
        let chosen_key = OptionKey::ALL[index % 3];
        history.record(AnswerEvent {
            question_index: index,
            chosen_key,
            is_correct: question.is_correct(chosen_key),
        });
    }
    let score = history.correct_count();

    group.bench_function("200_questions", |b| {
        b.iter(|| build_report(black_box(&sequence), black_box(&history), score, config))
    });

    group.finish();
}

criterion_group!(benches, bench_build_sequence, bench_build_report);
criterion_main!(benches);
