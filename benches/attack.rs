use cryptanalysis::{
    attack, Alphabet, AttackConfig, Caesar, Cipher, KeySpace, LanguageModel, ModelConfig,
    NgramScorer, Scorer, StrategyChoice, Substitution,
};

use criterion::{criterion_group, criterion_main, Criterion};

const PLAINTEXT: &str = "Every lighthouse keeper on the northern coast knew the storm \
    was coming long before the barometer fell, because the gulls stopped fishing and \
    sat in long grey rows along the harbour wall facing the wind";

fn english_model() -> LanguageModel {
    let corpus = std::fs::read("./data/english.txt").unwrap();
    LanguageModel::from_corpus(&corpus, &ModelConfig::default()).unwrap()
}

pub fn scoring_text_with_trigram_model(c: &mut Criterion) {
    let model = english_model();
    let scorer = NgramScorer::new(&model);
    let text = Alphabet::english().normalize(PLAINTEXT.as_bytes());
    c.bench_function("ngram_score", |b| b.iter(|| scorer.evaluate(&text)));
}

pub fn exhaustive_caesar_attack(c: &mut Criterion) {
    let model = english_model();
    let scorer = NgramScorer::new(&model);
    let cipher = Caesar::default();
    let plaintext = Alphabet::english().normalize(PLAINTEXT.as_bytes());
    let ciphertext = cipher.encrypt(&plaintext, &13).unwrap();
    let config = AttackConfig::default();
    c.bench_function("attack_caesar_exhaustive", |b| {
        b.iter(|| attack(&ciphertext, &cipher, &scorer, &config).unwrap())
    });
}

pub fn hill_climbing_substitution_attack(c: &mut Criterion) {
    let model = english_model();
    let scorer = NgramScorer::new(&model);
    let cipher = Substitution::default();
    let plaintext = Alphabet::english().normalize(PLAINTEXT.as_bytes());
    let key = cipher
        .key_space()
        .parse_key("QAZWSXEDCRFVTGBYHNUJMIKOLP")
        .unwrap();
    let ciphertext = cipher.encrypt(&plaintext, &key).unwrap();
    let config = AttackConfig {
        strategy: StrategyChoice::HillClimb,
        max_restarts: 32,
        run_iterations: 2_000,
        patience: 500,
        seed: Some(1),
        ..AttackConfig::default()
    };
    let mut group = c.benchmark_group("substitution");
    group.sample_size(10);
    group.bench_function("attack_substitution_hill_climb", |b| {
        b.iter(|| attack(&ciphertext, &cipher, &scorer, &config).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    scoring_text_with_trigram_model,
    exhaustive_caesar_attack,
    hill_climbing_substitution_attack,
);
criterion_main!(benches);
