use std::fmt;

use geo::Geometry;
use serde_json::Value;

use crate::vector_chunk::{VectorChunkError, parse_feature};

pub const LAKE_NAME_PROPERTY: &str = "nom";
pub const LAKE_LINK_PROPERTY: &str = "lien";
pub const LAKE_CATEGORY_PROPERTY: &str = "categorie";
pub const DEFAULT_LAKE_CATEGORY: &str = "2";

/// A captured lake: the submitted feature plus the fields shown in its popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Lake {
    pub name: String,
    /// Fishing regulation page.
    pub link: String,
    pub category: String,
    pub geometry: Geometry<f64>,
    /// The submission as it was captured.
    pub feature: Value,
}

#[derive(Debug)]
pub enum LakeError {
    Feature(VectorChunkError),
    MissingProperty { index: usize, key: &'static str },
}

impl fmt::Display for LakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LakeError::Feature(err) => write!(f, "lake {err}"),
            LakeError::MissingProperty { index, key } => {
                write!(f, "lake at index {index} has no `{key}` property")
            }
        }
    }
}

impl std::error::Error for LakeError {}

pub fn lakes_from_submissions(entries: &[Value]) -> Result<Vec<Lake>, LakeError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| lake_from_submission(index, entry))
        .collect()
}

pub fn lake_from_submission(index: usize, entry: &Value) -> Result<Lake, LakeError> {
    let feature = parse_feature(index, entry).map_err(LakeError::Feature)?;
    let required = |key: &'static str| {
        feature
            .property_text(key)
            .ok_or(LakeError::MissingProperty { index, key })
    };

    let name = required(LAKE_NAME_PROPERTY)?;
    let link = required(LAKE_LINK_PROPERTY)?;
    let category = feature
        .property_text(LAKE_CATEGORY_PROPERTY)
        .unwrap_or_else(|| DEFAULT_LAKE_CATEGORY.to_string());

    Ok(Lake {
        name,
        link,
        category,
        geometry: feature.geometry,
        feature: entry.clone(),
    })
}
