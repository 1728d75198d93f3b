use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Instant,
};
use thiserror::Error;
use tracing::debug;
use zip::{ZipArchive, read::ZipFile};

mod config;
mod data;
pub mod models;
pub use config::*;
pub use data::*;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
}

#[derive(Debug, Clone)]
pub enum StorageType {
    Directory(PathBuf),
    Zip(PathBuf),
}

/// Reads feed tables from an unpacked directory or a zip archive.
#[derive(Debug, Clone)]
pub struct GtfsReader {
    config: Config,
    storage: StorageType,
}

impl GtfsReader {
    pub fn from_dir<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config: Default::default(),
            storage: StorageType::Directory(path.as_ref().to_owned()),
        }
    }

    pub fn from_zip<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config: Default::default(),
            storage: StorageType::Zip(path.as_ref().to_owned()),
        }
    }

    /// Picks zip storage for files and directory storage for everything else.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.is_file() {
            Self::from_zip(path)
        } else {
            Self::from_dir(path)
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn read_routes(&self) -> Result<Vec<GtfsRoute>, self::Error> {
        self.read_table(&self.config.routes_file_name)
    }

    pub fn read_trips(&self) -> Result<Vec<GtfsTrip>, self::Error> {
        self.read_table(&self.config.trips_file_name)
    }

    pub fn read_shapes(&self) -> Result<Vec<GtfsShape>, self::Error> {
        self.read_table(&self.config.shapes_file_name)
    }

    pub fn read_stops(&self) -> Result<Vec<GtfsStop>, self::Error> {
        self.read_table(&self.config.stops_file_name)
    }

    pub fn read_stop_times(&self) -> Result<Vec<GtfsStopTime>, self::Error> {
        self.read_table(&self.config.stop_times_file_name)
    }

    /// Reads all five tables. The reads run concurrently and any failure fails the whole load.
    pub fn load(&self) -> Result<Feed, self::Error> {
        debug!("Loading feed...");
        let now = Instant::now();
        let ((routes, trips), ((shapes, stops), stop_times)) = rayon::join(
            || rayon::join(|| self.read_routes(), || self.read_trips()),
            || {
                rayon::join(
                    || rayon::join(|| self.read_shapes(), || self.read_stops()),
                    || self.read_stop_times(),
                )
            },
        );
        let feed = Feed {
            routes: routes?,
            trips: trips?,
            shapes: shapes?,
            stops: stops?,
            stop_times: stop_times?,
        };
        debug!(
            routes = feed.routes.len(),
            trips = feed.trips.len(),
            shapes = feed.shapes.len(),
            stops = feed.stops.len(),
            stop_times = feed.stop_times.len(),
            "Loading feed took {:?}",
            now.elapsed()
        );
        Ok(feed)
    }

    fn read_table<T>(&self, file_name: &str) -> Result<Vec<T>, self::Error>
    where
        T: DeserializeOwned,
    {
        match &self.storage {
            StorageType::Directory(path) => read_from_dir(path, file_name),
            StorageType::Zip(path) => read_from_zip(path, file_name),
        }
    }
}

fn read_from_dir<T>(dir: &Path, file_name: &str) -> Result<Vec<T>, self::Error>
where
    T: DeserializeOwned,
{
    let file = File::open(dir.join(file_name)).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => self::Error::FileNotFound(file_name.to_string()),
        _ => self::Error::Io(err),
    })?;
    parse_csv(file, file_name)
}

fn read_from_zip<T>(zip_path: &Path, file_name: &str) -> Result<Vec<T>, self::Error>
where
    T: DeserializeOwned,
{
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let file = get_file(&mut archive, file_name)?;
    parse_csv(file, file_name)
}

fn get_file<'a>(
    archive: &'a mut ZipArchive<File>,
    name: &str,
) -> Result<ZipFile<'a, File>, self::Error> {
    let index = archive
        .index_for_name(name)
        .ok_or(self::Error::FileNotFound(name.to_string()))?;
    let file = archive.by_index(index)?;
    Ok(file)
}

fn parse_csv<R, T>(reader: R, file_name: &str) -> Result<Vec<T>, self::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut buf = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.map_err(|source| self::Error::Csv {
            file: file_name.to_string(),
            source,
        })?;
        buf.push(record);
    }
    Ok(buf)
}

#[test]
fn parse_csv_ignores_extra_columns() {
    let text = "trip_id,arrival_time,stop_id\nT1,08:00:00,S1\n";
    let rows: Vec<GtfsStopTime> = parse_csv(text.as_bytes(), "stop_times.txt").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].trip_id, "T1");
    assert_eq!(rows[0].stop_id, "S1");
}

#[test]
fn parse_csv_defaults_missing_columns() {
    let text = "trip_id,route_id\nT1,R1\n";
    let rows: Vec<GtfsTrip> = parse_csv(text.as_bytes(), "trips.txt").unwrap();
    assert_eq!(rows[0].direction_id, "");
    assert_eq!(rows[0].shape_id, "");
}

#[test]
fn parse_csv_trims_fields() {
    let text = "stop_id, stop_name ,stop_lat,stop_lon\n S1 ,Central, 59.1 ,18.2\n";
    let rows: Vec<GtfsStop> = parse_csv(text.as_bytes(), "stops.txt").unwrap();
    assert_eq!(rows[0].stop_id, "S1");
    assert_eq!(rows[0].stop_name, "Central");
    assert_eq!(rows[0].stop_lat, "59.1");
}
