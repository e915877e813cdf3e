use crate::core::path_result::PathPars;
use crate::core::race_dataset::{DatasetError, RaceDataset, RacePars};
use serde::Deserialize;
use serde_json::error::Category;
use std::fs::OpenOptions;
use std::path::Path;

/// RaceDataPayload is the document served by the strategy backend.
/// * `race_data` - Graph size, pit nodes and fleet
/// * `graph_edges` - Directed edges as (from, to, weight)
/// * `optimal_paths` - Optimal strategy per car, null if no feasible strategy exists
#[derive(Debug, Deserialize, Clone)]
pub struct RaceDataPayload {
    pub race_data: RacePars,
    pub graph_edges: Vec<(usize, usize, f64)>,
    pub optimal_paths: Vec<Option<PathPars>>,
}

impl RaceDataPayload {
    pub fn into_dataset(self) -> Result<RaceDataset, DatasetError> {
        RaceDataset::new(&self.race_data, &self.graph_edges, &self.optimal_paths)
    }
}

/// read_race_data reads the JSON file and decodes it into the validated race dataset.
pub fn read_race_data(filepath: &Path) -> Result<RaceDataset, DatasetError> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .map_err(|e| {
            DatasetError::FetchFailure(format!(
                "Failed to open race data file {}: {}",
                filepath.display(),
                e
            ))
        })?;
    let payload: RaceDataPayload = serde_json::from_reader(&fh).map_err(json_error)?;
    payload.into_dataset()
}

/// parse_race_data decodes a JSON string into the validated race dataset.
pub fn parse_race_data(json: &str) -> Result<RaceDataset, DatasetError> {
    let payload: RaceDataPayload = serde_json::from_str(json).map_err(json_error)?;
    payload.into_dataset()
}

/// Unreadable documents are fetch failures, readable documents of the wrong shape are malformed.
fn json_error(e: serde_json::Error) -> DatasetError {
    match e.classify() {
        Category::Data => DatasetError::MalformedDataset(e.to_string()),
        _ => DatasetError::FetchFailure(e.to_string()),
    }
}
