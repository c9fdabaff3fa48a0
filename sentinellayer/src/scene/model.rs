//! Scene and asset manifest records.
//!
//! A `Scene` is a factual record of one imagery acquisition: what was
//! captured, when, how cloudy, and which assets the catalog offers
//! for it. Interpretation of the manifest (which asset to display) is
//! the resolver's job, not the model's.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Reference to one hosted asset: a URL, with its band identity
/// implied by the manifest role it is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Absolute URL of the hosted object.
    pub href: String,
}

impl AssetRef {
    /// Creates an asset reference.
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Mapping from asset-role name to asset reference.
///
/// Role names are *not* case-folded: `B04` and `b04` are distinct
/// keys, originating from different upstream catalog versions, and
/// the resolver tries them as separate literal aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    roles: HashMap<String, AssetRef>,
}

impl AssetManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files an asset under a role name, replacing any previous entry.
    pub fn insert(&mut self, role: impl Into<String>, asset: AssetRef) {
        self.roles.insert(role.into(), asset);
    }

    /// Looks up the asset filed under an exact role name.
    pub fn get(&self, role: &str) -> Option<&AssetRef> {
        self.roles.get(role)
    }

    /// Number of assets in the manifest.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the manifest holds no assets.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl<R: Into<String>> FromIterator<(R, AssetRef)> for AssetManifest {
    fn from_iter<T: IntoIterator<Item = (R, AssetRef)>>(iter: T) -> Self {
        Self {
            roles: iter
                .into_iter()
                .map(|(role, asset)| (role.into(), asset))
                .collect(),
        }
    }
}

/// One discrete imagery acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Catalog identifier, unique per acquisition.
    pub id: String,
    /// Acquisition timestamp.
    pub acquired_at: DateTime<Utc>,
    /// Cloud-cover percentage in `[0, 100]`; `None` means unknown.
    pub cloud_cover: Option<f64>,
    /// Assets the catalog offers for this scene.
    pub assets: AssetManifest,
}

impl Scene {
    /// Whether this scene's cloud cover is known and at or below the
    /// given threshold.
    ///
    /// Unknown cloud cover never matches: a scene without the metric
    /// cannot be claimed to satisfy a cloud criterion.
    pub fn within_cloud_cover(&self, threshold: f64) -> bool {
        matches!(self.cloud_cover, Some(cover) if cover <= threshold)
    }
}

/// Orders scenes by acquisition time, most recent first.
///
/// The catalog collaborator supplies scenes in this order; this helper
/// restores it after any local reshuffling.
pub fn sort_most_recent_first(scenes: &mut [Scene]) {
    scenes.sort_by(|a, b| b.acquired_at.cmp(&a.acquired_at));
}
