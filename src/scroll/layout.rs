use crate::{
    foundation::core::{Rect, Region, Viewport},
    foundation::error::{ReelError, ReelResult},
    scroll::tracker::LayoutProbe,
};

/// The page as three stacked region containers, each `section_height_vh` viewports tall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackedLayout {
    viewport: Viewport,
    section_height_vh: f64,
    scroll_y: f64,
}

impl StackedLayout {
    pub fn new(viewport: Viewport, section_height_vh: f64) -> ReelResult<Self> {
        if !section_height_vh.is_finite() || section_height_vh <= 0.0 {
            return Err(ReelError::validation("section_height_vh must be > 0"));
        }
        Ok(Self {
            viewport,
            section_height_vh,
            scroll_y: 0.0,
        })
    }

    pub fn section_height(&self) -> f64 {
        f64::from(self.viewport.height) * self.section_height_vh
    }

    pub fn page_height(&self) -> f64 {
        self.section_height() * Region::ALL.len() as f64
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.page_height() - f64::from(self.viewport.height)).max(0.0)
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Scroll to an absolute offset, clamped to the page.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = if y.is_finite() {
            y.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
    }

    /// Scroll to a fraction of the reachable range.
    pub fn scroll_to_fraction(&mut self, fraction: f64) {
        self.scroll_to(self.max_scroll() * fraction);
    }

    /// Resize the viewport, keeping the same relative scroll position.
    pub fn resize(&mut self, viewport: Viewport) {
        let max = self.max_scroll();
        let fraction = if max > 0.0 { self.scroll_y / max } else { 0.0 };
        self.viewport = viewport;
        self.scroll_to_fraction(fraction);
    }
}

impl LayoutProbe for StackedLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn region_rect(&self, region: Region) -> Option<Rect> {
        let h = self.section_height();
        let top = region.index() as f64 * h - self.scroll_y;
        Some(Rect::new(0.0, top, f64::from(self.viewport.width), top + h))
    }
}
