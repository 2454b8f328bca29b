use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use geo::Geometry;

use crate::vector_chunk::{VectorChunk, VectorChunkError};

/// Property carrying the watercourse name in the hydrography export.
pub const RIVER_NAME_PROPERTY: &str = "NomEntiteH";

#[derive(Debug, Clone, PartialEq)]
pub struct River {
    pub name: Option<String>,
    pub geometry: Geometry<f64>,
}

#[derive(Debug)]
pub enum RiversError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: VectorChunkError },
}

impl fmt::Display for RiversError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiversError::Io { path, source } => {
                write!(f, "failed to read rivers {}: {source}", path.display())
            }
            RiversError::Parse { path, source } => {
                write!(f, "failed to parse rivers {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RiversError {}

pub fn load_rivers(path: impl AsRef<Path>) -> Result<Vec<River>, RiversError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|source| RiversError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let chunk = VectorChunk::from_geojson_str(&payload).map_err(|source| RiversError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rivers_from_chunk(chunk))
}

pub fn rivers_from_chunk(chunk: VectorChunk) -> Vec<River> {
    chunk
        .features
        .into_iter()
        .map(|feature| River {
            name: feature.property_text(RIVER_NAME_PROPERTY),
            geometry: feature.geometry,
        })
        .collect()
}
