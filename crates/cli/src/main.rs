use anyhow::Context;
use chrono::NaiveTime;
use clap::Parser;
use routebake::prelude::*;
use std::{path::PathBuf, time::Instant};
use tracing::{Level, info};

#[derive(Debug, Parser)]
#[command(name = "routebake")]
#[command(about = "Bake a GTFS feed into route and stop JSON documents")]
struct Args {
    /// Feed directory or zip archive.
    #[arg(short = 'i', long = "input", default_value = "static")]
    input: PathBuf,

    #[arg(long = "routes-output", default_value = "routes.json")]
    routes_output: PathBuf,

    #[arg(long = "stops-output", default_value = "stops.json")]
    stops_output: PathBuf,

    #[arg(short = 'p', long = "pretty")]
    pretty: bool,

    #[arg(long = "price", default_value_t = 10)]
    price: u32,

    #[arg(long = "tracker-id", default_value = "XXXXXX")]
    tracker_id: String,

    #[arg(long = "work-start", default_value = "00:00:00")]
    work_start: NaiveTime,

    #[arg(long = "work-end", default_value = "00:00:00")]
    work_end: NaiveTime,

    /// `last` takes the final cumulative distance of a shape, `sum` adds every point's value.
    #[arg(long = "shape-length", default_value = "last")]
    shape_length: ShapeLength,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            price: self.price,
            tracker_id: self.tracker_id.clone(),
            work_start: self.work_start,
            work_end: self.work_end,
            shape_length: self.shape_length,
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("Reading feed from {}", args.input.display());
    let now = Instant::now();
    let reader = GtfsReader::from_path(&args.input);
    let documents = routebake::run(&reader, &args.config())
        .with_context(|| format!("Failed to process feed at {}", args.input.display()))?;
    write_documents(
        &documents,
        &args.routes_output,
        &args.stops_output,
        args.pretty,
    )
    .context("Failed to write output documents")?;
    info!("Done in {:?}", now.elapsed());
    Ok(())
}
