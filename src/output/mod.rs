use serde::Serialize;
use std::{fs, io, path::Path, time::Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::pipeline::Documents;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to serialize {document}: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

fn to_json<T: Serialize + ?Sized>(
    document: &'static str,
    value: &T,
    pretty: bool,
) -> Result<Vec<u8>, self::Error> {
    let result = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };
    result.map_err(|source| self::Error::Json { document, source })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), self::Error> {
    fs::write(path, bytes).map_err(|source| self::Error::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Writes the routes and stops documents, replacing any existing files.
///
/// Both documents are serialized before either file is touched.
pub fn write_documents<P, Q>(
    documents: &Documents,
    routes_path: P,
    stops_path: Q,
    pretty: bool,
) -> Result<(), self::Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let now = Instant::now();
    let routes = to_json("routes", &documents.routes, pretty)?;
    let stops = to_json("stops", &documents.stops, pretty)?;
    write_file(routes_path.as_ref(), &routes)?;
    write_file(stops_path.as_ref(), &stops)?;
    debug!("Writing documents took {:?}", now.elapsed());
    info!(
        routes = %routes_path.as_ref().display(),
        stops = %stops_path.as_ref().display(),
        "Wrote documents"
    );
    Ok(())
}
