use std::sync::Arc;

use crate::{
    assets::loader::{LoadHandle, LoadProgress, LoadReport, Priority, SequenceLoader},
    assets::source::FrameSource,
    assets::store::FrameStore,
    config::SiteConfig,
    foundation::core::{Region, Viewport},
    foundation::error::ReelResult,
    overlay::{OverlayState, overlay_for},
    render::composite::{fill_in_place, over_in_place},
    render::renderer::{DrawOutcome, DrawStyle, FrameRenderer},
    render::surface::FrameRgba,
    render::vignette::Vignette,
    scroll::scheduler::{FrameScheduler, FrameToken},
    scroll::tracker::{LayoutProbe, RegionProgress, ScrollTracker, ScrollUpdate, sample},
};

/// Result of the startup load: high-priority sequences are settled, the rest are in flight.
pub struct SitePreload {
    pub progress: Arc<LoadProgress>,
    pub awaited: Vec<LoadReport>,
    pub background: Vec<LoadHandle>,
}

impl SitePreload {
    /// Wait for the background sequences too.
    pub fn finish(self) -> Vec<LoadReport> {
        let mut reports = self.awaited;
        reports.extend(self.background.into_iter().map(LoadHandle::wait));
        reports
    }
}

/// Load every high-priority sequence before returning and start the others in background.
///
/// Always returns once the awaited sequences have resolved, even if some of their frames
/// (or the whole load) failed; the caller can leave its loading state unconditionally.
pub fn preload(
    config: &SiteConfig,
    store: &FrameStore,
    source: Arc<dyn FrameSource>,
    threads: Option<usize>,
) -> ReelResult<SitePreload> {
    let progress = Arc::new(LoadProgress::new(config.high_priority_frames()));
    let loader = SequenceLoader::new(source, Arc::clone(&progress), threads)?;

    let mut background = Vec::new();
    for region in Region::ALL {
        if !config.sequence(region).high_priority {
            background.push(loader.spawn(store.shared(region), Priority::Background));
        }
    }

    let awaited = Region::ALL
        .into_iter()
        .filter(|r| config.sequence(*r).high_priority)
        .map(|r| loader.load_sequence(store.sequence(r), Priority::High))
        .collect();

    Ok(SitePreload {
        progress,
        awaited,
        background,
    })
}

/// Owns the frame store, the scroll tracker and one renderer per region, and routes host
/// events (scroll, resize, animation frames) between them.
pub struct ScrollScene {
    config: SiteConfig,
    store: FrameStore,
    renderers: [FrameRenderer; 3],
    tracker: ScrollTracker,
    progress: RegionProgress,
    active: Region,
    opacity: [f64; 3],
    viewport: Viewport,
}

impl ScrollScene {
    pub fn new(config: SiteConfig, store: FrameStore, viewport: Viewport) -> ReelResult<Self> {
        config.validate()?;
        let style = DrawStyle {
            background: config.background_rgba,
            vignette: Vignette::new(&config.vignette, config.background_rgba),
            search_radius: config.search_radius,
        };
        let [p, s, t] = Region::ALL.map(|r| {
            FrameRenderer::new(r, config.sequence(r).render, style, viewport)
        });
        Ok(Self {
            renderers: [p?, s?, t?],
            config,
            store,
            tracker: ScrollTracker::new(),
            progress: RegionProgress::default(),
            active: Region::Primary,
            opacity: [0.0; 3],
            viewport,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn active(&self) -> Region {
        self.active
    }

    pub fn progress(&self) -> RegionProgress {
        self.progress
    }

    pub fn renderer(&self, region: Region) -> &FrameRenderer {
        &self.renderers[region.index()]
    }

    /// Current visibility of a region's surface in `[0, 1]`.
    pub fn opacity(&self, region: Region) -> f64 {
        self.opacity[region.index()]
    }

    pub fn overlay(&self, region: Region) -> OverlayState {
        overlay_for(region, self.progress.get(region))
    }

    /// First paint: sample geometry once, draw every surface, show the active one.
    pub fn mount(&mut self, probe: &dyn LayoutProbe, scheduler: &mut dyn FrameScheduler) {
        let update = sample(probe);
        self.progress = update.progress;
        for region in Region::ALL {
            self.redraw(region);
        }
        self.activate(update.active, scheduler);
        self.opacity = [0.0; 3];
        self.opacity[update.active.index()] = 1.0;
    }

    /// Host scroll event. Coalesced to one tick per refresh.
    pub fn on_scroll(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        self.tracker.on_scroll(scheduler)
    }

    /// Host resize event: every surface follows the viewport and redraws immediately.
    pub fn on_resize(
        &mut self,
        viewport: Viewport,
        scheduler: &mut dyn FrameScheduler,
    ) -> ReelResult<()> {
        for region in Region::ALL {
            let r = &mut self.renderers[region.index()];
            r.resize(viewport, self.store.sequence(region), self.progress.get(region))?;
        }
        self.viewport = viewport;
        // The tick that was pending may carry stale geometry; sample afresh next refresh.
        self.tracker.cancel(scheduler);
        self.tracker.on_scroll(scheduler);
        Ok(())
    }

    /// Deliver a fired animation-frame token to whichever component requested it.
    pub fn on_animation_frame(
        &mut self,
        token: FrameToken,
        probe: &dyn LayoutProbe,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<DrawOutcome> {
        if let Some(update) = self.tracker.on_frame(token, probe) {
            self.apply(update, scheduler);
            return None;
        }
        for region in Region::ALL {
            let r = &mut self.renderers[region.index()];
            if r.owns(token) {
                return r.on_frame(token, self.store.sequence(region), self.progress.get(region));
            }
        }
        None
    }

    /// Move every surface's opacity toward its target by `dt_ms` of the cross-fade.
    pub fn advance_fade(&mut self, dt_ms: f64) {
        let step = if self.config.fade_ms > 0.0 {
            (dt_ms / self.config.fade_ms).max(0.0)
        } else {
            1.0
        };
        for region in Region::ALL {
            let target = if region == self.active { 1.0 } else { 0.0 };
            let o = &mut self.opacity[region.index()];
            *o = if *o < target {
                (*o + step).min(target)
            } else {
                (*o - step).max(target)
            };
        }
    }

    /// Blend visible surfaces over the background in page order.
    pub fn composite(&self) -> ReelResult<FrameRgba> {
        let first = self.renderers[0].surface();
        let mut data = vec![0u8; first.data().len()];
        fill_in_place(&mut data, self.config.background_rgba.premul());
        for region in Region::ALL {
            let o = self.opacity(region);
            if o > 0.0 {
                over_in_place(&mut data, self.renderer(region).surface().data(), o as f32)?;
            }
        }
        Ok(FrameRgba {
            width: u32::from(first.width()),
            height: u32::from(first.height()),
            data,
            premultiplied: true,
        })
    }

    /// Cancel every outstanding callback so nothing fires against a detached scene.
    pub fn teardown(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.tracker.cancel(scheduler);
        for r in &mut self.renderers {
            r.cancel(scheduler);
        }
    }

    fn apply(&mut self, update: ScrollUpdate, scheduler: &mut dyn FrameScheduler) {
        self.progress = update.progress;
        if update.active != self.active {
            tracing::debug!(from = %self.active, to = %update.active, "active region changed");
        }
        self.activate(update.active, scheduler);
    }

    fn activate(&mut self, active: Region, scheduler: &mut dyn FrameScheduler) {
        self.active = active;
        for r in &mut self.renderers {
            let is_active = r.region() == active;
            r.set_active(is_active, scheduler);
        }
        self.renderers[active.index()].request_redraw(scheduler);
    }

    fn redraw(&mut self, region: Region) -> DrawOutcome {
        self.renderers[region.index()].render(self.store.sequence(region), self.progress.get(region))
    }
}

#[cfg(test)]
#[path = "../tests/unit/shell.rs"]
mod tests;
