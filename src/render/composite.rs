use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255;

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    over_coverage(dst, src, coverage(opacity))
}

/// Blend a whole surface over another of the same size.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    let k = coverage(opacity);
    if k == 0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over_coverage([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], k);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Opacity as an 8-bit coverage; NaN and negatives are fully transparent.
fn coverage(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn over_coverage(dst: PremulRgba8, src: PremulRgba8, k: u8) -> PremulRgba8 {
    let src = src.map(|c| mul_div255(u16::from(c), u16::from(k)));
    if src[3] == 0 {
        return dst;
    }
    let keep = 255 - u16::from(src[3]);
    std::array::from_fn(|i| src[i].saturating_add(mul_div255(u16::from(dst[i]), keep)))
}

/// Overwrite every pixel with `rgba`.
pub fn fill_in_place(dst: &mut [u8], rgba: PremulRgba8) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}
