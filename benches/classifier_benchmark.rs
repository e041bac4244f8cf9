use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ladle::classifier::TfIdfVectorizer;
use ladle::{Classifier, Record, RecordSet};

const SOUPS: &[&str] = &[
    "tomato bisque", "chicken noodle soup", "french onion soup", "minestrone",
    "clam chowder", "split pea soup", "miso soup", "lentil soup", "gazpacho",
    "butternut squash soup", "beef barley soup", "hot and sour soup",
];

const NOT_SOUPS: &[&str] = &[
    "leather boots", "wool sweater", "denim jacket", "rain coat", "garden hose",
    "coffee mug", "onion rings", "soup spoon", "chicken sandwich", "pea coat",
    "tomato plant", "clam shell",
];

fn corpus(copies: usize) -> RecordSet {
    (0..copies)
        .flat_map(|i| {
            SOUPS
                .iter()
                .map(move |s| Record::new(format!("{} {}", s, i), true))
                .chain(NOT_SOUPS.iter().map(move |s| Record::new(format!("{} {}", s, i), false)))
        })
        .collect()
}

fn bench_vectorizer(c: &mut Criterion) {
    let records = corpus(10);
    let texts = records.texts();
    let mut group = c.benchmark_group("Vectorizer");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("fit", |b| b.iter(|| TfIdfVectorizer::fit(black_box(texts.as_slice()))));

    let vectorizer = TfIdfVectorizer::fit(&texts);
    group.bench_function("transform_short_text", |b| b.iter(|| {
        vectorizer.transform_one(black_box("cream of tomato soup"))
    }));

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("Training");
    group.sample_size(20);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for &copies in &[1, 10, 100] {
        let records = corpus(copies);
        group.bench_function(format!("fit_{}_records", records.len()), |b| b.iter(|| {
            Classifier::builder().fit(black_box(&records)).unwrap()
        }));
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let classifier = Classifier::builder().fit(&corpus(10)).unwrap();
    let mut group = c.benchmark_group("Prediction");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("predict_one", |b| b.iter(|| {
        classifier.predict_one(black_box("spicy chicken noodle soup")).unwrap()
    }));

    let batch: Vec<String> = (0..1000).map(|i| format!("item {} soup or boots", i)).collect();
    group.bench_function("predict_batch_1000", |b| b.iter(|| {
        classifier.predict(black_box(batch.as_slice())).unwrap()
    }));

    group.finish();
}

criterion_group!(
    benches,
    bench_vectorizer,
    bench_training,
    bench_prediction
);
criterion_main!(benches);
