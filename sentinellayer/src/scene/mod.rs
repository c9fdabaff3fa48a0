//! Scene records, asset manifests, and asset resolution.
//!
//! A scene is one imagery acquisition; its manifest maps asset-role
//! names to hosted URLs. The resolver decides how a scene can be
//! displayed: a ready-made true-color asset, an RGB composite of
//! three band sources, or nothing usable.
//!
//! # Example
//!
//! ```ignore
//! use sentinellayer::scene::{resolve, ImagerySource, Scene, StacItem};
//!
//! let scene = Scene::try_from(StacItem::from_json(raw_item)?)?;
//! match resolve(&scene.assets) {
//!     ImagerySource::Direct(url) => display(url),
//!     ImagerySource::Composite { red, green, blue } => composite(red, green, blue),
//!     ImagerySource::Unresolvable => report_unusable(&scene),
//! }
//! ```

mod model;
mod resolver;
mod stac;

pub use model::{sort_most_recent_first, AssetManifest, AssetRef, Scene};
pub use resolver::{resolve, ImagerySource};
pub use stac::{SceneParseError, StacAsset, StacItem, StacProperties};
