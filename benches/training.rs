use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use noshow_risk::features::{BookingFeatures, FEATURE_NAMES, TARGET_COLUMN};
use noshow_risk::inference::RiskPredictor;
use noshow_risk::preprocessing::{frame_to_matrix, frame_to_vector, Scaler};
use noshow_risk::synthetic::{BookingGenerator, GeneratorConfig};
use noshow_risk::training::RandomForest;
use ndarray::{Array1, Array2};

fn scaled_bookings(n_rows: usize) -> (Scaler, Array2<f64>, Array1<f64>) {
    let ds = BookingGenerator::new(GeneratorConfig::new().with_n_samples(n_rows))
        .generate()
        .unwrap();
    let df = ds.to_frame().unwrap();

    let mut scaler = Scaler::new();
    let scaled = scaler.fit_transform(&df, &FEATURE_NAMES).unwrap();
    let x = frame_to_matrix(&scaled, &FEATURE_NAMES).unwrap();
    let y = frame_to_vector(&scaled, TARGET_COLUMN).unwrap();
    (scaler, x, y)
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10); // Fewer samples for training benchmarks

    for n_rows in [1000, 5000].iter() {
        let (_, x, y) = scaled_bookings(*n_rows);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut forest = RandomForest::new(100).with_max_depth(10).with_random_state(42);
                forest.fit(black_box(x), black_box(y)).unwrap();
                forest
            })
        });
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let (scaler, x, y) = scaled_bookings(1000);
    let mut forest = RandomForest::new(100).with_max_depth(10).with_random_state(42);
    forest.fit(&x, &y).unwrap();
    let predictor = RiskPredictor::new(scaler, forest).unwrap();

    let record = BookingFeatures::from_array([2.0, 30.0, 1.0, 1.0, 0.0, 5.0, 0.7, 0.0, 15.0, 0.0]);

    c.bench_function("predict_single", |b| {
        b.iter(|| predictor.predict_risk(black_box(&record)).unwrap())
    });
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
