use crate::{
    foundation::core::{Anchor, Rect, Region, Viewport},
    foundation::math::clamp01,
    scroll::scheduler::{FrameScheduler, FrameToken},
};

/// Progress above which a trailing-edge region claims the active slot.
pub const ACTIVATION_THRESHOLD: f64 = 0.1;
/// Primary progress at which the secondary region takes over.
pub const PRIMARY_HANDOFF: f64 = 0.99;

/// Host view of page geometry: the viewport and each region container's bounding box.
///
/// Rects are in viewport coordinates (top of the viewport is `y = 0`), matching a DOM
/// bounding client rect. `None` means the container is not mounted.
pub trait LayoutProbe {
    fn viewport(&self) -> Viewport;
    fn region_rect(&self, region: Region) -> Option<Rect>;
}

/// Progress of every region from one geometry snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionProgress([f64; 3]);

impl RegionProgress {
    pub fn new(primary: f64, secondary: f64, tertiary: f64) -> Self {
        Self([primary, secondary, tertiary])
    }

    pub fn get(&self, region: Region) -> f64 {
        self.0[region.index()]
    }
}

/// Result of one scroll tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollUpdate {
    pub progress: RegionProgress,
    pub active: Region,
}

/// Normalized `[0, 1]` progress of a region container.
///
/// Missing geometry yields `0`. Infinite ratios saturate and NaN maps to `0`.
pub fn region_progress(anchor: Anchor, rect: Option<Rect>, viewport_height: f64) -> f64 {
    let Some(rect) = rect else {
        return 0.0;
    };
    let height = rect.height();
    let raw = match anchor {
        // Exactly one viewport tall divides by zero: +inf once scrolled past, clamped to 1.
        Anchor::LeadingEdge => -rect.y0 / (height - viewport_height),
        Anchor::TrailingEdge => {
            let travel = viewport_height + height;
            if travel <= 0.0 {
                return 0.0;
            }
            1.0 - rect.y1 / travel
        }
    };
    clamp01(raw)
}

/// Pick the single active region. Priority order decides, not magnitude.
pub fn active_region(progress: &RegionProgress) -> Region {
    if progress.get(Region::Tertiary) > ACTIVATION_THRESHOLD {
        Region::Tertiary
    } else if progress.get(Region::Primary) >= PRIMARY_HANDOFF
        || progress.get(Region::Secondary) > ACTIVATION_THRESHOLD
    {
        Region::Secondary
    } else {
        Region::Primary
    }
}

/// Take one consistent geometry snapshot and derive progress and the active region.
pub fn sample(probe: &dyn LayoutProbe) -> ScrollUpdate {
    let vh = f64::from(probe.viewport().height);
    let rects = Region::ALL.map(|r| probe.region_rect(r));
    let values = Region::ALL.map(|r| region_progress(r.anchor(), rects[r.index()], vh));
    let progress = RegionProgress(values);
    ScrollUpdate {
        progress,
        active: active_region(&progress),
    }
}

/// Coalesces scroll events into at most one tick per display refresh.
#[derive(Debug, Default)]
pub struct ScrollTracker {
    pending: Option<FrameToken>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a scroll event. Schedules a tick unless one is already pending for this refresh.
    ///
    /// Returns `true` when a new tick was scheduled.
    pub fn on_scroll(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(scheduler.request_frame());
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn owns(&self, token: FrameToken) -> bool {
        self.pending == Some(token)
    }

    /// Run the scheduled tick if `token` belongs to this tracker.
    pub fn on_frame(&mut self, token: FrameToken, probe: &dyn LayoutProbe) -> Option<ScrollUpdate> {
        if !self.owns(token) {
            return None;
        }
        self.pending = None;
        Some(sample(probe))
    }

    pub fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(token) = self.pending.take() {
            scheduler.cancel_frame(token);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
