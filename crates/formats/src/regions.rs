//! Administrative regions from a semicolon-delimited table with a WKT column.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use geo::Geometry;
use wkt::TryFromWkt;

/// Zero-based column holding the region name.
pub const REGION_NAME_COLUMN: usize = 4;
/// Zero-based column holding the WKT outline.
pub const REGION_GEOMETRY_COLUMN: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub geometry: Geometry<f64>,
}

#[derive(Debug)]
pub enum RegionsError {
    Io { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    MissingColumn { line: u64, column: usize },
    Wkt { line: u64, reason: String },
}

impl fmt::Display for RegionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionsError::Io { path, source } => {
                write!(f, "failed to read regions {}: {source}", path.display())
            }
            RegionsError::Csv(err) => write!(f, "regions table error: {err}"),
            RegionsError::MissingColumn { line, column } => {
                write!(f, "line {line}: missing column {column}")
            }
            RegionsError::Wkt { line, reason } => write!(f, "line {line}: invalid WKT: {reason}"),
        }
    }
}

impl std::error::Error for RegionsError {}

pub fn load_regions(path: impl AsRef<Path>) -> Result<Vec<Region>, RegionsError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RegionsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_regions(file)
}

/// Parses the table; the first row is a header.
pub fn parse_regions<R: Read>(reader: R) -> Result<Vec<Region>, RegionsError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut regions = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(RegionsError::Csv)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let field = |column: usize| {
            record
                .get(column)
                .ok_or(RegionsError::MissingColumn { line, column })
        };
        let name = field(REGION_NAME_COLUMN)?.trim().to_string();
        let wkt_str = field(REGION_GEOMETRY_COLUMN)?;
        let geometry =
            Geometry::<f64>::try_from_wkt_str(wkt_str).map_err(|e| RegionsError::Wkt {
                line,
                reason: e.to_string(),
            })?;

        regions.push(Region { name, geometry });
    }
    Ok(regions)
}
