use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp01;

/// Maximum offset probed around the target index when its frame is not ready.
pub const FALLBACK_SEARCH_RADIUS: usize = 14;

/// How a frame is scaled into the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Fill the surface, cropping the overflowing axis.
    #[default]
    Cover,
    /// Fit the whole frame inside the surface, letterboxing the other axis.
    Contain,
}

/// Static per-region drawing parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderParams {
    #[serde(default)]
    pub fit: FitMode,
    /// Horizontal alignment for cover fit: 0 pins the left edge, 1 the right edge.
    #[serde(default = "default_align")]
    pub align: f64,
    /// Extra scale applied after fitting; 1.0 is a plain fit.
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_align() -> f64 {
    0.5
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            fit: FitMode::Cover,
            align: default_align(),
            zoom: default_zoom(),
        }
    }
}

impl RenderParams {
    pub fn new(fit: FitMode, align: f64, zoom: f64) -> ReelResult<Self> {
        let p = Self { fit, align, zoom };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if !self.align.is_finite() || !(0.0..=1.0).contains(&self.align) {
            return Err(ReelError::validation("render align must be within [0, 1]"));
        }
        if !self.zoom.is_finite() || self.zoom < 1.0 {
            return Err(ReelError::validation("render zoom must be >= 1"));
        }
        Ok(())
    }
}

/// Map a progress value to a frame index in `[0, frame_count - 1]`.
///
/// Returns `0` for an empty sequence.
pub fn target_index(progress: f64, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let raw = (clamp01(progress) * frame_count as f64).floor() as usize;
    raw.min(frame_count - 1)
}

/// Find the closest index around `index` for which `is_valid` holds.
///
/// Offsets are probed in order `0, 1, ..., radius`; at each offset `index - offset` is
/// checked before `index + offset`. Out-of-range candidates are skipped.
pub fn nearest_valid_index(
    index: usize,
    frame_count: usize,
    radius: usize,
    is_valid: impl Fn(usize) -> bool,
) -> Option<usize> {
    if frame_count == 0 {
        return None;
    }
    if index < frame_count && is_valid(index) {
        return Some(index);
    }
    for offset in 1..=radius {
        if let Some(prev) = index.checked_sub(offset)
            && prev < frame_count
            && is_valid(prev)
        {
            return Some(prev);
        }
        let next = index + offset;
        if next < frame_count && is_valid(next) {
            return Some(next);
        }
    }
    None
}

/// Destination rectangle of a `frame`-sized image drawn into a `surface`-sized target.
pub fn fit_rect(surface: Size, frame: Size, params: &RenderParams) -> Rect {
    let surface_aspect = surface.width / surface.height;
    let frame_aspect = frame.width / frame.height;
    let zoom = params.zoom;

    match params.fit {
        FitMode::Cover => {
            let (w, h) = if surface_aspect > frame_aspect {
                (surface.width * zoom, (surface.width / frame_aspect) * zoom)
            } else {
                ((surface.height * frame_aspect) * zoom, surface.height * zoom)
            };
            let x = (surface.width - w) * params.align;
            let y = (surface.height - h) * 0.5;
            Rect::new(x, y, x + w, y + h)
        }
        FitMode::Contain => {
            let (w, h) = if surface_aspect > frame_aspect {
                ((surface.height * frame_aspect) * zoom, surface.height * zoom)
            } else {
                (surface.width * zoom, (surface.width / frame_aspect) * zoom)
            };
            let x = (surface.width - w) / 2.0;
            let y = (surface.height - h) / 2.0;
            Rect::new(x, y, x + w, y + h)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
