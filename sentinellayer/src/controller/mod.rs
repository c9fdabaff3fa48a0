//! Scene imagery lifecycle: resolve, fetch, composite, display.
//!
//! The controller owns the "currently displayed imagery" slot and
//! drives one scene selection through the pipeline stages
//! Resolve → Fetch → Normalize ×3 → Compose. Selecting a new scene
//! strictly supersedes any outstanding work for the previous one: the
//! superseded generation's band fetches are cancelled and its results,
//! should they still arrive, are discarded before they can touch the
//! display slot. At most one scene's imagery is ever materializing or
//! displayed.
//!
//! # Example
//!
//! ```ignore
//! use sentinellayer::controller::{DisplayState, SceneImageryController};
//!
//! let controller = SceneImageryController::new(band_provider);
//! controller.select_scene(&scene).await?;
//! if let DisplayState::Ready { imagery, .. } = controller.state() {
//!     attach_to_display(imagery);
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::pixel::{compose, normalize, CompositeError, CompositeImage, DEFAULT_MAX_REFLECTANCE};
use crate::provider::{BandProvider, ProviderError};
use crate::scene::{resolve, ImagerySource, Scene};

/// Errors terminating one scene selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The scene's manifest offers no usable asset combination.
    #[error("no usable imagery assets in scene manifest")]
    Unresolvable,

    /// One of the three band sources failed to fetch or decode. The
    /// whole composite attempt fails; no partial composite is shown.
    #[error("band fetch failed: {0}")]
    BandFetch(#[from] ProviderError),

    /// The fetched bands disagree in dimensions.
    #[error(transparent)]
    Composite(#[from] CompositeError),

    /// A newer scene selection replaced this one while it was in
    /// flight. Not a failure of the scene itself; the result was
    /// discarded per the supersession contract.
    #[error("scene selection superseded by a newer selection")]
    Superseded,
}

/// Imagery attached to the display surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayedImagery {
    /// A ready-made true-color image; the display collaborator fetches
    /// it through the range proxy.
    Direct { url: String },
    /// An image composited here from three band sources.
    Composite { image: CompositeImage },
}

/// Observable state of the active view session.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// No imagery shown.
    Idle,
    /// Deciding how the selected scene can be displayed.
    Resolving { scene_id: String },
    /// A ready-made image was found; handing its URL to the display.
    FetchingDirect { scene_id: String, url: String },
    /// Fetching and compositing the three band sources.
    FetchingBands { scene_id: String },
    /// Imagery attached to the display.
    Ready {
        scene_id: String,
        imagery: DisplayedImagery,
    },
    /// This scene cannot be displayed. Terminal for the scene; the
    /// next selection starts fresh.
    Failed { scene_id: String, reason: String },
}

struct Inner {
    state: DisplayState,
    /// Cancels the in-flight work of the current generation.
    cancel: CancellationToken,
    /// Generation the slot last acted for. A selection may only
    /// touch the slot while its generation matches (or, at teardown,
    /// exceeds) this value.
    generation: u64,
}

/// Orchestrates scene imagery from selection to display.
///
/// Each selection carries a generation number; any state mutation is
/// guarded by a generation check so that out-of-order network
/// completions can never overwrite a more recent selection's imagery.
pub struct SceneImageryController<P> {
    provider: P,
    max_reflectance: f32,
    generation: AtomicU64,
    inner: Mutex<Inner>,
}

impl<P: BandProvider> SceneImageryController<P> {
    /// Creates an idle controller with the default reflectance
    /// stretch.
    pub fn new(provider: P) -> Self {
        Self::with_max_reflectance(provider, DEFAULT_MAX_REFLECTANCE)
    }

    /// Creates an idle controller with a custom reflectance stretch
    /// reference for band normalization.
    pub fn with_max_reflectance(provider: P, max_reflectance: f32) -> Self {
        Self {
            provider,
            max_reflectance,
            generation: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: DisplayState::Idle,
                cancel: CancellationToken::new(),
                generation: 0,
            }),
        }
    }

    /// A snapshot of the current display state.
    pub fn state(&self) -> DisplayState {
        self.inner.lock().state.clone()
    }

    /// Selects a scene, superseding any in-flight or displayed
    /// predecessor, and drives it to `Ready` or `Failed`.
    ///
    /// Returns [`ControllerError::Superseded`] when a newer selection
    /// replaced this one mid-flight; in that case no state was
    /// mutated on this selection's behalf.
    pub async fn select_scene(&self, scene: &Scene) -> Result<(), ControllerError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Tear down the predecessor: cancel its fetches and release
        // any displayed composite before starting the new resolution.
        // A selection that drew its generation but lost the race to
        // the lock backs off here, mutating nothing: tearing down
        // would otherwise clobber the newer selection's state and
        // cancel its in-flight work.
        let cancel = {
            let mut inner = self.inner.lock();
            if generation <= inner.generation {
                return Err(ControllerError::Superseded);
            }
            inner.generation = generation;
            inner.cancel.cancel();
            inner.cancel = CancellationToken::new();
            inner.state = DisplayState::Resolving {
                scene_id: scene.id.clone(),
            };
            inner.cancel.clone()
        };

        info!(scene = %scene.id, generation, "selecting scene");

        match resolve(&scene.assets) {
            ImagerySource::Direct(url) => {
                self.set_if_current(
                    generation,
                    DisplayState::FetchingDirect {
                        scene_id: scene.id.clone(),
                        url: url.clone(),
                    },
                )?;
                debug!(scene = %scene.id, url = %url, "using direct asset");
                self.set_if_current(
                    generation,
                    DisplayState::Ready {
                        scene_id: scene.id.clone(),
                        imagery: DisplayedImagery::Direct { url },
                    },
                )
            }
            ImagerySource::Composite { red, green, blue } => {
                self.set_if_current(
                    generation,
                    DisplayState::FetchingBands {
                        scene_id: scene.id.clone(),
                    },
                )?;
                debug!(scene = %scene.id, %red, %green, %blue, "compositing bands");
                let image = match self
                    .composite_bands(&cancel, &red, &green, &blue)
                    .await
                {
                    Ok(image) => image,
                    Err(err) => return self.fail(generation, &scene.id, err),
                };
                self.set_if_current(
                    generation,
                    DisplayState::Ready {
                        scene_id: scene.id.clone(),
                        imagery: DisplayedImagery::Composite { image },
                    },
                )
            }
            ImagerySource::Unresolvable => {
                self.fail(generation, &scene.id, ControllerError::Unresolvable)
            }
        }
    }

    /// Fetches the three band sources concurrently, normalizes each,
    /// and composes them. Cancellation (supersession) wins any race
    /// with the fetches.
    async fn composite_bands(
        &self,
        cancel: &CancellationToken,
        red: &str,
        green: &str,
        blue: &str,
    ) -> Result<CompositeImage, ControllerError> {
        let fetches = async {
            tokio::try_join!(
                self.provider.fetch_band(red),
                self.provider.fetch_band(green),
                self.provider.fetch_band(blue),
            )
        };

        let (red_buf, green_buf, blue_buf) = tokio::select! {
            _ = cancel.cancelled() => return Err(ControllerError::Superseded),
            result = fetches => result?,
        };

        // Pure per-band transforms; independent of each other.
        let r = normalize(&red_buf, self.max_reflectance);
        let g = normalize(&green_buf, self.max_reflectance);
        let b = normalize(&blue_buf, self.max_reflectance);

        Ok(compose(&r, &g, &b)?)
    }

    /// Commits a state transition if this generation is still the
    /// newest; otherwise reports supersession and leaves the slot
    /// untouched.
    fn set_if_current(
        &self,
        generation: u64,
        state: DisplayState,
    ) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return Err(ControllerError::Superseded);
        }
        inner.state = state;
        Ok(())
    }

    /// Records a terminal failure for this scene, unless superseded.
    fn fail(
        &self,
        generation: u64,
        scene_id: &str,
        err: ControllerError,
    ) -> Result<(), ControllerError> {
        if matches!(err, ControllerError::Superseded) {
            return Err(err);
        }
        warn!(scene = %scene_id, error = %err, "scene imagery failed");
        // A superseded failure must not overwrite the newer scene's
        // state either; the generation check covers that.
        self.set_if_current(
            generation,
            DisplayState::Failed {
                scene_id: scene_id.to_string(),
                reason: err.to_string(),
            },
        )?;
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{PixelBuffer, SampleType};
    use crate::provider::MockBandProvider;
    use crate::scene::{AssetManifest, AssetRef};
    use chrono::{TimeZone, Utc};

    fn scene(id: &str, assets: &[(&str, &str)]) -> Scene {
        Scene {
            id: id.to_string(),
            acquired_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            cloud_cover: Some(5.0),
            assets: assets
                .iter()
                .map(|&(role, href)| (role, AssetRef::new(href)))
                .collect::<AssetManifest>(),
        }
    }

    fn uniform_band(value: f32) -> PixelBuffer {
        PixelBuffer::new(2, 2, vec![value; 4], SampleType::U16).unwrap()
    }

    #[test]
    fn test_controller_starts_idle() {
        let controller = SceneImageryController::new(MockBandProvider::default());
        assert_eq!(controller.state(), DisplayState::Idle);
    }

    #[tokio::test]
    async fn test_direct_scene_becomes_ready() {
        let controller = SceneImageryController::new(MockBandProvider::default());
        let scene = scene("s1", &[("visual", "https://host/a.tif")]);

        controller.select_scene(&scene).await.unwrap();

        assert_eq!(
            controller.state(),
            DisplayState::Ready {
                scene_id: "s1".to_string(),
                imagery: DisplayedImagery::Direct {
                    url: "https://host/a.tif".to_string()
                },
            }
        );
    }

    #[tokio::test]
    async fn test_composite_scene_produces_per_channel_values() {
        // Per-channel intensity fixture: red at full scale, green at
        // half, blue at a quarter.
        let provider = MockBandProvider::default()
            .with_band("https://host/b04.tif", uniform_band(3000.0))
            .with_band("https://host/b03.tif", uniform_band(1500.0))
            .with_band("https://host/b02.tif", uniform_band(750.0));
        let controller = SceneImageryController::new(provider);
        let scene = scene(
            "s1",
            &[
                ("B04", "https://host/b04.tif"),
                ("B03", "https://host/b03.tif"),
                ("B02", "https://host/b02.tif"),
            ],
        );

        controller.select_scene(&scene).await.unwrap();

        match controller.state() {
            DisplayState::Ready {
                imagery: DisplayedImagery::Composite { image },
                ..
            } => {
                assert_eq!(image.width(), 2);
                assert_eq!(image.height(), 2);
                for i in 0..4 {
                    assert_eq!(image.pixel(i), (255, 128, 64));
                }
            }
            other => panic!("expected composite ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unresolvable_scene_fails() {
        let controller = SceneImageryController::new(MockBandProvider::default());
        // Green and blue without any red alias.
        let scene = scene(
            "s1",
            &[
                ("green", "https://host/b03.tif"),
                ("blue", "https://host/b02.tif"),
            ],
        );

        let result = controller.select_scene(&scene).await;
        assert_eq!(result, Err(ControllerError::Unresolvable));
        assert!(matches!(
            controller.state(),
            DisplayState::Failed { ref scene_id, .. } if scene_id == "s1"
        ));
    }

    #[tokio::test]
    async fn test_single_band_failure_fails_whole_composite() {
        let provider = MockBandProvider::default()
            .with_band("https://host/b04.tif", uniform_band(3000.0))
            .with_failure(
                "https://host/b03.tif",
                ProviderError::Http("connection reset".to_string()),
            )
            .with_band("https://host/b02.tif", uniform_band(750.0));
        let controller = SceneImageryController::new(provider);
        let scene = scene(
            "s1",
            &[
                ("red", "https://host/b04.tif"),
                ("green", "https://host/b03.tif"),
                ("blue", "https://host/b02.tif"),
            ],
        );

        let result = controller.select_scene(&scene).await;
        assert!(matches!(result, Err(ControllerError::BandFetch(_))));
        match controller.state() {
            DisplayState::Failed { scene_id, reason } => {
                assert_eq!(scene_id, "s1");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("expected failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dimension_mismatch_fails_without_partial_image() {
        let mismatched =
            PixelBuffer::new(2, 3, vec![100.0; 6], SampleType::U16).unwrap();
        let provider = MockBandProvider::default()
            .with_band("https://host/b04.tif", uniform_band(3000.0))
            .with_band("https://host/b03.tif", mismatched)
            .with_band("https://host/b02.tif", uniform_band(750.0));
        let controller = SceneImageryController::new(provider);
        let scene = scene(
            "s1",
            &[
                ("red", "https://host/b04.tif"),
                ("green", "https://host/b03.tif"),
                ("blue", "https://host/b02.tif"),
            ],
        );

        let result = controller.select_scene(&scene).await;
        assert!(matches!(
            result,
            Err(ControllerError::Composite(CompositeError::DimensionMismatch { .. }))
        ));
        assert!(matches!(controller.state(), DisplayState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_newer_selection_supersedes_stalled_fetch() {
        let provider = MockBandProvider::default()
            .with_stalled("https://host/slow-b04.tif")
            .with_band("https://host/slow-b03.tif", uniform_band(1500.0))
            .with_band("https://host/slow-b02.tif", uniform_band(750.0))
            .with_band("https://host/fast.tif", uniform_band(3000.0));
        let controller = SceneImageryController::new(provider);

        let slow = scene(
            "slow",
            &[
                ("red", "https://host/slow-b04.tif"),
                ("green", "https://host/slow-b03.tif"),
                ("blue", "https://host/slow-b02.tif"),
            ],
        );
        let fast = scene("fast", &[("visual", "https://host/fast.tif")]);

        // The slow selection blocks on its red band until the fast
        // selection cancels it.
        let (slow_result, fast_result) =
            tokio::join!(controller.select_scene(&slow), controller.select_scene(&fast));

        assert_eq!(slow_result, Err(ControllerError::Superseded));
        fast_result.unwrap();
        assert!(matches!(
            controller.state(),
            DisplayState::Ready { ref scene_id, .. } if scene_id == "fast"
        ));
    }

    #[tokio::test]
    async fn test_superseded_failure_never_marks_newer_scene_failed() {
        let provider = MockBandProvider::default()
            .with_stalled("https://host/slow-b04.tif")
            .with_band("https://host/slow-b03.tif", uniform_band(1500.0))
            .with_band("https://host/slow-b02.tif", uniform_band(750.0));
        let controller = SceneImageryController::new(provider);

        let slow = scene(
            "slow",
            &[
                ("red", "https://host/slow-b04.tif"),
                ("green", "https://host/slow-b03.tif"),
                ("blue", "https://host/slow-b02.tif"),
            ],
        );
        // The second selection is unresolvable on purpose: its Failed
        // state belongs to it, not to the superseded scene.
        let bad = scene("bad", &[]);

        let (slow_result, bad_result) =
            tokio::join!(controller.select_scene(&slow), controller.select_scene(&bad));

        assert_eq!(slow_result, Err(ControllerError::Superseded));
        assert_eq!(bad_result, Err(ControllerError::Unresolvable));
        assert!(matches!(
            controller.state(),
            DisplayState::Failed { ref scene_id, .. } if scene_id == "bad"
        ));
    }

    #[tokio::test]
    async fn test_reselect_replaces_ready_imagery() {
        let controller = SceneImageryController::new(MockBandProvider::default());
        let first = scene("s1", &[("visual", "https://host/a.tif")]);
        let second = scene("s2", &[("visual", "https://host/b.tif")]);

        controller.select_scene(&first).await.unwrap();
        controller.select_scene(&second).await.unwrap();

        assert!(matches!(
            controller.state(),
            DisplayState::Ready { ref scene_id, .. } if scene_id == "s2"
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_selections_never_leave_stale_state() {
        use std::sync::Arc;

        // Two selections race on separate threads. Whichever loses
        // must neither clobber the winner's displayed state nor
        // cancel its work, including when the loser drew its
        // generation first but reached the display slot second.
        for _ in 0..200 {
            let controller =
                Arc::new(SceneImageryController::new(MockBandProvider::default()));

            let c1 = Arc::clone(&controller);
            let first = tokio::spawn(async move {
                let s = scene("s1", &[("visual", "https://host/a.tif")]);
                c1.select_scene(&s).await
            });
            let c2 = Arc::clone(&controller);
            let second = tokio::spawn(async move {
                let s = scene("s2", &[("visual", "https://host/b.tif")]);
                c2.select_scene(&s).await
            });

            let r1 = first.await.unwrap();
            let r2 = second.await.unwrap();

            match (&r1, &r2) {
                (Err(ControllerError::Superseded), Ok(())) => {
                    assert!(matches!(
                        controller.state(),
                        DisplayState::Ready { ref scene_id, .. } if scene_id == "s2"
                    ));
                }
                (Ok(()), Err(ControllerError::Superseded)) => {
                    assert!(matches!(
                        controller.state(),
                        DisplayState::Ready { ref scene_id, .. } if scene_id == "s1"
                    ));
                }
                // No overlap: both ran to completion in some order
                // and the display shows whichever committed last.
                (Ok(()), Ok(())) => {
                    assert!(matches!(controller.state(), DisplayState::Ready { .. }));
                }
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_failed_scene_does_not_block_next_selection() {
        let controller = SceneImageryController::new(MockBandProvider::default());
        let bad = scene("bad", &[]);
        let good = scene("good", &[("visual", "https://host/a.tif")]);

        assert!(controller.select_scene(&bad).await.is_err());
        controller.select_scene(&good).await.unwrap();

        assert!(matches!(
            controller.state(),
            DisplayState::Ready { ref scene_id, .. } if scene_id == "good"
        ));
    }
}
