// Overlay surface factory: one black, topmost surface per display.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::display::Display;
use crate::dispatch::SurfaceState;
use crate::error::StartupError;
use crate::platform::{Platform, SurfaceHandle};

/// What to do when some displays fail to get a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoveragePolicy {
    /// Keep going as long as at least one display is covered.
    #[default]
    BestEffort,
    /// Fail startup unless every display is covered.
    RequireAll,
}

/// One created surface and the display it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub handle: SurfaceHandle,
    pub display: usize,
    pub state: SurfaceState,
}

impl Overlay {
    pub fn new(handle: SurfaceHandle, display: usize) -> Self {
        Self {
            handle,
            display,
            state: SurfaceState::VisibleBlocking,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state == SurfaceState::VisibleBlocking
    }

    /// Destroys the surface once. Later calls do nothing.
    pub fn destroy<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        if self.is_live() {
            platform.destroy_surface(self.handle);
            self.state = SurfaceState::Destroyed;
        }
    }
}

/// Creates one surface per display, in display order.
///
/// On error every surface created so far is already destroyed.
pub fn create_overlays<P: Platform + ?Sized>(
    platform: &mut P,
    displays: &[Display],
    policy: CoveragePolicy,
) -> Result<Vec<Overlay>, StartupError> {
    if displays.is_empty() {
        return Err(StartupError::NoDisplays);
    }

    let mut overlays = Vec::with_capacity(displays.len());
    let mut uncovered = Vec::new();

    for monitor in displays {
        if monitor.rect.is_empty() {
            warn!(display = monitor.index, rect = ?monitor.rect, "display has an empty rectangle");
            uncovered.push(monitor.index);
            continue;
        }
        match platform.create_surface(monitor) {
            Ok(handle) => {
                info!(
                    display = monitor.index,
                    x = monitor.rect.left,
                    y = monitor.rect.top,
                    width = monitor.rect.width(),
                    height = monitor.rect.height(),
                    "overlay created"
                );
                overlays.push(Overlay::new(handle, monitor.index));
            }
            Err(e) => {
                warn!(display = monitor.index, error = %e, "overlay creation failed");
                uncovered.push(monitor.index);
            }
        }
    }

    let failure = if overlays.is_empty() {
        Some(StartupError::NoSurfaces { displays: displays.len() })
    } else if !uncovered.is_empty() && policy == CoveragePolicy::RequireAll {
        Some(StartupError::PartialCoverage {
            created: overlays.len(),
            displays: displays.len(),
        })
    } else {
        None
    };

    if let Some(err) = failure {
        for overlay in &mut overlays {
            overlay.destroy(platform);
        }
        return Err(err);
    }

    if !uncovered.is_empty() {
        warn!(?uncovered, "some displays are not blanked");
    }
    Ok(overlays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Rect;
    use crate::platform::mock::{MockCall, MockPlatform};

    fn displays(rects: &[Rect]) -> Vec<Display> {
        rects
            .iter()
            .enumerate()
            .map(|(index, &rect)| Display { index, rect })
            .collect()
    }

    #[test]
    fn one_surface_per_display_with_exact_rects() {
        let rects = [Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 3000, 1920)];
        let mut p = MockPlatform::new();

        let surfaces = create_overlays(&mut p, &displays(&rects), CoveragePolicy::BestEffort)
            .expect("create");

        assert_eq!(surfaces.len(), 2);
        assert_eq!(p.live_surface_rects(), rects.to_vec());
    }

    #[test]
    fn no_displays_is_an_error() {
        let mut p = MockPlatform::new();
        let err = create_overlays(&mut p, &[], CoveragePolicy::BestEffort).unwrap_err();
        assert_eq!(err, StartupError::NoDisplays);
    }

    #[test]
    fn best_effort_accepts_partial_coverage() {
        let rects = [Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 3840, 1080)];
        let mut p = MockPlatform::new().fail_surface_at(0);

        let surfaces = create_overlays(&mut p, &displays(&rects), CoveragePolicy::BestEffort)
            .expect("create");

        assert_eq!(surfaces.len(), 1);
        assert_eq!(p.live_surface_rects(), vec![rects[1]]);
    }

    #[test]
    fn require_all_rejects_partial_coverage_and_cleans_up() {
        let rects = [Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 3840, 1080)];
        let mut p = MockPlatform::new().fail_surface_at(1);

        let err = create_overlays(&mut p, &displays(&rects), CoveragePolicy::RequireAll)
            .unwrap_err();

        assert_eq!(err, StartupError::PartialCoverage { created: 1, displays: 2 });
        assert_eq!(p.live_surface_count(), 0);
    }

    #[test]
    fn all_failures_is_no_surfaces() {
        let rects = [Rect::new(0, 0, 800, 600)];
        let mut p = MockPlatform::new().fail_surface_at(0);

        let err = create_overlays(&mut p, &displays(&rects), CoveragePolicy::BestEffort)
            .unwrap_err();

        assert_eq!(err, StartupError::NoSurfaces { displays: 1 });
    }

    #[test]
    fn empty_rect_counts_as_uncovered() {
        let rects = [Rect::default(), Rect::new(0, 0, 800, 600)];
        let mut p = MockPlatform::new();

        let surfaces = create_overlays(&mut p, &displays(&rects), CoveragePolicy::BestEffort)
            .expect("create");

        assert_eq!(surfaces.len(), 1);
        assert_eq!(p.surfaces_created(), 1);
    }

    #[test]
    fn overlays_remember_their_display_and_start_blocking() {
        let rects = [Rect::default(), Rect::new(0, 0, 800, 600)];
        let mut p = MockPlatform::new();

        let overlays = create_overlays(&mut p, &displays(&rects), CoveragePolicy::BestEffort)
            .expect("create");

        assert_eq!(overlays[0].display, 1);
        assert_eq!(overlays[0].state, SurfaceState::VisibleBlocking);
    }

    #[test]
    fn destroy_is_applied_once() {
        let rects = [Rect::new(0, 0, 800, 600)];
        let mut p = MockPlatform::new();
        let mut overlays = create_overlays(&mut p, &displays(&rects), CoveragePolicy::BestEffort)
            .expect("create");

        overlays[0].destroy(&mut p);
        overlays[0].destroy(&mut p);

        assert_eq!(overlays[0].state, SurfaceState::Destroyed);
        assert_eq!(p.live_surface_count(), 0);
        let destroys = p
            .calls()
            .iter()
            .filter(|c| matches!(c, MockCall::DestroySurface(_)))
            .count();
        assert_eq!(destroys, 1);
    }

    #[test]
    fn policy_parses_from_snake_case() {
        let p: CoveragePolicy = serde_json::from_str("\"require_all\"").unwrap();
        assert_eq!(p, CoveragePolicy::RequireAll);
    }
}
