use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::*;
use thiserror::Error;

use crate::model::GameMap;

pub const DATA_DIR: &str = "data";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read map {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid map {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// `<dir>/<name>.json`
pub fn map_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.json", name))
}

pub fn load_map(dir: impl AsRef<Path>, name: &str) -> Result<GameMap, LoadError> {
    load_file(map_path(dir, name))
}

pub fn load_file(path: impl AsRef<Path>) -> Result<GameMap, LoadError> {
    let path = path.as_ref();
    debug!("Loading map from {:?}", path);
    let data = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.into(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| LoadError::Json {
        path: path.into(),
        source,
    })
}

pub fn parse_map(data: &str) -> Result<GameMap, serde_json::Error> {
    serde_json::from_str(data)
}
