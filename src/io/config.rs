//! Read run configuration from JSON.
//!
//! Configuration files are plain JSON objects; any key left out takes its
//! default value, so `{}` is a valid config.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::data::SampleConfig;
use crate::domain::AssimilationConfig;
use crate::error::AssimilationError;

/// Parse an assimilation config from a JSON string.
pub fn parse_config_json(json: &str) -> Result<AssimilationConfig, AssimilationError> {
    Ok(serde_json::from_str(json)?)
}

/// Read an assimilation config file.
pub fn read_config_json(path: &Path) -> Result<AssimilationConfig, AssimilationError> {
    read_json(path)
}

/// Read a synthetic sample config file.
pub fn read_sample_config_json(path: &Path) -> Result<SampleConfig, AssimilationError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AssimilationError> {
    let file = File::open(path).map_err(|source| AssimilationError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
