use crate::{
    assets::decode::FrameImage,
    assets::store::Sequence,
    foundation::core::{Affine, Region, Rgba8, Size, Viewport},
    foundation::error::ReelResult,
    render::composite::fill_in_place,
    render::fit::{RenderParams, fit_rect, nearest_valid_index, target_index},
    render::surface::Surface,
    render::vignette::Vignette,
    scroll::scheduler::{FrameScheduler, FrameToken},
};

/// Page-wide drawing style shared by every region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawStyle {
    pub background: Rgba8,
    pub vignette: Vignette,
    pub search_radius: usize,
}

/// What a render call did to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Frame `index` was drawn (possibly a neighbour of the target).
    Drawn { index: usize },
    /// No valid frame near the target; the surface kept its previous contents.
    Skipped,
}

/// Draw the frame selected by `progress` into `surface`.
///
/// Never fails: a missing frame or a drawing error leaves the surface untouched.
pub fn render_progress(
    surface: &mut Surface,
    sequence: &Sequence,
    progress: f64,
    params: &RenderParams,
    style: &DrawStyle,
) -> DrawOutcome {
    let n = sequence.frame_count();
    let target = target_index(progress, n);
    let Some(index) = nearest_valid_index(target, n, style.search_radius, |i| {
        sequence.is_ready(i)
    }) else {
        tracing::trace!(region = %sequence.region(), target, "no valid frame in range");
        return DrawOutcome::Skipped;
    };
    let Some(frame) = sequence.ready_frame(index) else {
        return DrawOutcome::Skipped;
    };

    match draw_frame(surface, frame, params, style) {
        Ok(()) => DrawOutcome::Drawn { index },
        Err(e) => {
            tracing::warn!(region = %sequence.region(), index, error = %e, "frame draw failed");
            DrawOutcome::Skipped
        }
    }
}

/// Clear to the background, draw `frame` fitted per `params`, then apply the vignette.
pub fn draw_frame(
    surface: &mut Surface,
    frame: &FrameImage,
    params: &RenderParams,
    style: &DrawStyle,
) -> ReelResult<()> {
    let (w, h) = (surface.width(), surface.height());
    let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
    let dest = fit_rect(surface.size(), Size::new(fw, fh), params);

    fill_in_place(surface.data_mut(), style.background.premul());

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let [r, g, b, a] = style.background.0;
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(w),
        f64::from(h),
    ));

    let transform = Affine::translate((dest.x0, dest.y0))
        * Affine::scale_non_uniform(dest.width() / fw, dest.height() / fh);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(frame.paint());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, fw, fh));

    ctx.flush();
    ctx.render_to_pixmap(&mut surface.pixmap);

    style
        .vignette
        .apply_in_place(surface.data_mut(), u32::from(w), u32::from(h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// One region's canvas: owns its surface and its pending redraw request.
///
/// Only an active renderer schedules redraws; deactivation cancels the pending request and
/// hides the surface while keeping it allocated.
#[derive(Debug)]
pub struct FrameRenderer {
    region: Region,
    params: RenderParams,
    style: DrawStyle,
    surface: Surface,
    active: bool,
    pending: Option<FrameToken>,
    last_drawn: Option<usize>,
}

impl FrameRenderer {
    pub fn new(
        region: Region,
        params: RenderParams,
        style: DrawStyle,
        viewport: Viewport,
    ) -> ReelResult<Self> {
        params.validate()?;
        Ok(Self {
            region,
            params,
            style,
            surface: Surface::new(viewport)?,
            active: false,
            pending: None,
            last_drawn: None,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Whether the surface is shown. Inactive surfaces are hidden, not dropped.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn owns(&self, token: FrameToken) -> bool {
        self.pending == Some(token)
    }

    pub fn last_drawn(&self) -> Option<usize> {
        self.last_drawn
    }

    /// Draw immediately.
    pub fn render(&mut self, sequence: &Sequence, progress: f64) -> DrawOutcome {
        let outcome = render_progress(
            &mut self.surface,
            sequence,
            progress,
            &self.params,
            &self.style,
        );
        if let DrawOutcome::Drawn { index } = outcome {
            self.last_drawn = Some(index);
        }
        outcome
    }

    /// Track the viewport size and redraw right away, independent of scroll state.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        sequence: &Sequence,
        progress: f64,
    ) -> ReelResult<DrawOutcome> {
        self.surface.resize(viewport)?;
        Ok(self.render(sequence, progress))
    }

    /// Show or hide this region. Hiding cancels any pending redraw.
    pub fn set_active(&mut self, active: bool, scheduler: &mut dyn FrameScheduler) {
        self.active = active;
        if !active {
            self.cancel(scheduler);
        }
    }

    /// Ask for a redraw on the next refresh. No-op while inactive or already pending.
    ///
    /// Returns `true` when a new request was made.
    pub fn request_redraw(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if !self.active || self.pending.is_some() {
            return false;
        }
        self.pending = Some(scheduler.request_frame());
        true
    }

    /// Run the scheduled redraw if `token` belongs to this renderer.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        sequence: &Sequence,
        progress: f64,
    ) -> Option<DrawOutcome> {
        if !self.owns(token) {
            return None;
        }
        self.pending = None;
        Some(self.render(sequence, progress))
    }

    pub fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(token) = self.pending.take() {
            scheduler.cancel_frame(token);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
