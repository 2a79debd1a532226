//! Loading tracked-object snapshots from JSON files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use super::TrackedObject;

/// Envelope used by every dashboard API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: T,
    #[serde(default)]
    pub count: Option<usize>,
}

/// A snapshot is either a full API response or a bare object list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Envelope(ApiResponse<Vec<TrackedObject>>),
    Bare(Vec<TrackedObject>),
}

impl Snapshot {
    fn into_objects(self) -> Vec<TrackedObject> {
        match self {
            Snapshot::Envelope(response) => {
                if response.status != "success" {
                    log::warn!("Snapshot status is {:?}", response.status);
                }
                response.data
            }
            Snapshot::Bare(objects) => objects,
        }
    }
}

/// Source of tracked objects
///
/// Poll-on-demand: callers re-invoke [`ObjectSource::request`] to refresh.
pub trait ObjectSource {
    /// Fetch the current collection of tracked objects
    fn request(&mut self) -> Result<Vec<TrackedObject>>;

    /// Ask the backend to run a collision scan; returns a status message
    fn trigger_scan(&mut self) -> Result<String>;
}

/// Parse a snapshot from any reader
pub fn parse_snapshot(reader: impl Read) -> Result<Vec<TrackedObject>> {
    let snapshot: Snapshot =
        serde_json::from_reader(reader).with_context(|| "Failed to parse tracked objects JSON")?;
    Ok(snapshot.into_objects())
}

/// Load a snapshot from disk; `.gz` files are decompressed on the fly
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<TrackedObject>> {
    let path = path.as_ref();
    log::info!("Loading tracked objects from {:?}", path);

    let file =
        File::open(path).with_context(|| format!("Failed to open snapshot file: {:?}", path))?;
    let reader = BufReader::new(file);

    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let objects = if is_gzip {
        parse_snapshot(GzDecoder::new(reader))
    } else {
        parse_snapshot(reader)
    }
    .with_context(|| format!("Invalid snapshot: {:?}", path))?;

    log::info!("Loaded {} tracked objects", objects.len());
    Ok(objects)
}

/// File-backed object source
pub struct FileSource {
    path: PathBuf,
    last_count: usize,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ObjectSource for FileSource {
    fn request(&mut self) -> Result<Vec<TrackedObject>> {
        let objects = load_snapshot(&self.path)?;
        self.last_count = objects.len();
        Ok(objects)
    }

    fn trigger_scan(&mut self) -> Result<String> {
        Ok(format!(
            "Snapshot {:?} is static ({} objects); no collision scan was run",
            self.path, self.last_count
        ))
    }
}
