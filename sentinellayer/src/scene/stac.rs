//! STAC item deserialization.
//!
//! The catalog collaborator queries a STAC API (Earth Search) and
//! hands over raw feature items; this module turns those into
//! [`Scene`] records. Query construction and pagination stay with the
//! collaborator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::model::{AssetManifest, AssetRef, Scene};

/// Errors converting a STAC item into a [`Scene`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneParseError {
    /// The item is not valid JSON or lacks required fields.
    #[error("invalid STAC item: {0}")]
    Json(String),

    /// The acquisition timestamp is not valid RFC 3339.
    #[error("invalid acquisition timestamp {value:?}: {message}")]
    Timestamp { value: String, message: String },
}

/// One asset entry of a STAC item.
#[derive(Debug, Clone, Deserialize)]
pub struct StacAsset {
    /// URL of the hosted object.
    pub href: String,
}

/// Properties of a STAC item that this core consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct StacProperties {
    /// Acquisition timestamp, RFC 3339.
    pub datetime: String,
    /// Cloud-cover percentage; absent in some catalog versions.
    #[serde(rename = "eo:cloud_cover")]
    pub cloud_cover: Option<f64>,
}

/// One STAC API feature, as returned by Earth Search.
#[derive(Debug, Clone, Deserialize)]
pub struct StacItem {
    /// Catalog identifier.
    pub id: String,
    /// Item properties.
    pub properties: StacProperties,
    /// Role-keyed assets. Keys are taken verbatim; `B04` and `b04`
    /// remain distinct.
    #[serde(default)]
    pub assets: HashMap<String, StacAsset>,
}

impl StacItem {
    /// Parses a STAC item from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, SceneParseError> {
        serde_json::from_str(json).map_err(|e| SceneParseError::Json(e.to_string()))
    }
}

impl TryFrom<StacItem> for Scene {
    type Error = SceneParseError;

    fn try_from(item: StacItem) -> Result<Self, Self::Error> {
        let acquired_at = DateTime::parse_from_rfc3339(&item.properties.datetime)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| SceneParseError::Timestamp {
                value: item.properties.datetime.clone(),
                message: e.to_string(),
            })?;

        let assets: AssetManifest = item
            .assets
            .into_iter()
            .map(|(role, asset)| (role, AssetRef::new(asset.href)))
            .collect();

        Ok(Scene {
            id: item.id,
            acquired_at,
            cloud_cover: item.properties.cloud_cover,
            assets,
        })
    }
}
