//! Asset resolution: deciding how a scene can be displayed.
//!
//! Given a scene's manifest, the resolver decides whether a
//! ready-made true-color image exists or whether the red, green, and
//! blue band sources must be located for on-the-fly compositing. Pure
//! lookup logic; no network access.

use super::model::AssetManifest;

/// Roles that carry a ready-to-display true-color image, in priority
/// order.
const DIRECT_ROLES: [&str; 2] = ["visual", "rendered_preview"];

/// Alias chain for the red channel, tried in this fixed order.
///
/// The uppercase and lowercase band codes are distinct manifest keys
/// shipped by different upstream catalog versions, so both appear as
/// separate literal aliases rather than being case-folded.
const RED_ALIASES: [&str; 3] = ["red", "B04", "b04"];

/// Alias chain for the green channel.
const GREEN_ALIASES: [&str; 3] = ["green", "B03", "b03"];

/// Alias chain for the blue channel.
const BLUE_ALIASES: [&str; 3] = ["blue", "B02", "b02"];

/// How a scene's imagery can be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagerySource {
    /// A ready-to-display true-color image at this URL.
    Direct(String),
    /// Three band sources requiring on-the-fly compositing.
    Composite {
        red: String,
        green: String,
        blue: String,
    },
    /// No usable asset combination exists in the manifest.
    Unresolvable,
}

/// Resolves a manifest into an imagery source.
///
/// A direct candidate (`visual`, else `rendered_preview`) wins
/// outright. Otherwise each composite channel is looked up through
/// its alias chain; if any channel has no URL under any alias the
/// scene is [`ImagerySource::Unresolvable`].
pub fn resolve(manifest: &AssetManifest) -> ImagerySource {
    if let Some(url) = first_href(manifest, &DIRECT_ROLES) {
        return ImagerySource::Direct(url);
    }

    match (
        first_href(manifest, &RED_ALIASES),
        first_href(manifest, &GREEN_ALIASES),
        first_href(manifest, &BLUE_ALIASES),
    ) {
        (Some(red), Some(green), Some(blue)) => ImagerySource::Composite { red, green, blue },
        _ => ImagerySource::Unresolvable,
    }
}

/// The first alias in the chain that has an asset filed under it.
fn first_href(manifest: &AssetManifest, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find_map(|role| manifest.get(role))
        .map(|asset| asset.href.clone())
}
