//! Turns a GTFS feed into two denormalized JSON documents: one record per route with its
//! merged shape path and per-direction stops, and one record per stop with the routes
//! serving it.
pub mod gtfs;
pub mod output;
pub mod pipeline;
pub mod shared;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Gtfs(#[from] gtfs::Error),
    #[error(transparent)]
    Pipeline(#[from] pipeline::Error),
    #[error(transparent)]
    Output(#[from] output::Error),
}

/// Loads every table through `reader`, then builds both documents.
///
/// Nothing is built unless all five tables were read.
pub fn run(
    reader: &gtfs::GtfsReader,
    config: &pipeline::Config,
) -> Result<pipeline::Documents, Error> {
    let feed = reader.load()?;
    let documents = pipeline::build(&feed, config)?;
    Ok(documents)
}

pub mod prelude {
    pub use crate::Error;
    pub use crate::gtfs::{Feed, GtfsReader};
    pub use crate::output::write_documents;
    pub use crate::pipeline::{
        Config, Documents, RouteRecord, ShapeLength, StopRecord, TransportType,
    };
    pub use crate::run;
}
