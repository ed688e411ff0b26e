//! CSV loader for the weather dataset.
//!
//! The file is read in full on every call; nothing is cached, so edits to
//! the file are visible to the very next request.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::WeatherRecord;

// ---

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open weather dataset '{path}'")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse weather dataset '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Dataset loading task failed to complete")]
    Task(#[from] tokio::task::JoinError),
}

/// Read every record from the CSV file at `path`.
///
/// Required columns: `event_start`, `belief_horizon_in_sec`, `event_value`,
/// `sensor`, `unit`. Extra columns are ignored and an empty `unit` becomes
/// `None`.
pub fn load_dataset(path: &Path) -> Result<Vec<WeatherRecord>, DatasetError> {
    // ---
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(file);

    let records = reader
        .deserialize()
        .collect::<Result<Vec<WeatherRecord>, _>>()
        .map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Run [`load_dataset`] on the blocking thread pool.
pub async fn load_dataset_blocking(path: PathBuf) -> Result<Vec<WeatherRecord>, DatasetError> {
    // ---
    tokio::task::spawn_blocking(move || load_dataset(&path)).await?
}
