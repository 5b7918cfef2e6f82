use crate::{
    config::VignetteConfig,
    foundation::core::Rgba8,
    foundation::error::{ReelError, ReelResult},
    render::composite::over,
};

/// Radial gradient centered on the surface: transparent at the center, reaching
/// `max_alpha` of the tint color at `radius_factor * width` and staying there beyond it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vignette {
    pub radius_factor: f64,
    pub max_alpha: f64,
    pub tint: Rgba8,
}

impl Vignette {
    pub fn new(config: &VignetteConfig, tint: Rgba8) -> Self {
        Self {
            radius_factor: config.radius_factor,
            max_alpha: config.max_alpha,
            tint,
        }
    }

    /// Tint opacity at surface position `(x, y)`.
    pub fn alpha_at(&self, x: f64, y: f64, width: f64, height: f64) -> f64 {
        let radius = width * self.radius_factor;
        if radius <= 0.0 {
            return self.max_alpha;
        }
        let (dx, dy) = (x - width / 2.0, y - height / 2.0);
        let t = ((dx * dx + dy * dy).sqrt() / radius).min(1.0);
        self.max_alpha * t
    }

    /// Composite the gradient over a premultiplied RGBA8 surface.
    pub fn apply_in_place(&self, data: &mut [u8], width: u32, height: u32) -> ReelResult<()> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(ReelError::render(
                "vignette expects a buffer matching width*height*4",
            ));
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let [r, g, b, a] = self.tint.0;
        let tint_alpha = f64::from(a) / 255.0;

        for (i, px) in data.chunks_exact_mut(4).enumerate() {
            let x = (i % width as usize) as f64 + 0.5;
            let y = (i / width as usize) as f64 + 0.5;
            let alpha = self.alpha_at(x, y, w, h) * tint_alpha;
            let a8 = (alpha * 255.0).round().clamp(0.0, 255.0) as u8;
            if a8 == 0 {
                continue;
            }
            let src = Rgba8([r, g, b, a8]).premul();
            let out = over([px[0], px[1], px[2], px[3]], src, 1.0);
            px.copy_from_slice(&out);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/vignette.rs"]
mod tests;
