use criterion::{Criterion, criterion_group, criterion_main};
use routebake::prelude::*;
use routebake::pipeline;
use std::{env, hint::black_box, path::Path, time::Duration};

fn criterion_benchmark(c: &mut Criterion) {
    let gtfs_data_path = match env::var("GTFS_DATA_PATH") {
        Ok(path_str) => Path::new(&path_str).to_owned(),
        Err(err) => {
            println!("Missing GTFS_DATA_PATH environment variable: {err}");
            return;
        }
    };

    let reader = GtfsReader::from_path(&gtfs_data_path);
    let feed = reader.load().expect("Failed to load GTFS feed");
    let config = Config::default();

    let mut group = c.benchmark_group("Pipeline");

    group.warm_up_time(Duration::from_secs(5));

    group.measurement_time(Duration::from_secs(20));

    group.bench_function("Load feed", |b| b.iter(|| black_box(reader.load())));

    group.bench_function("Build documents", |b| {
        b.iter(|| black_box(pipeline::build(&feed, &config)))
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
