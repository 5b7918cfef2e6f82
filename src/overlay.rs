//! Text overlay choreography that rides on top of each region's frame sequence.
//!
//! These are pure functions of a region's scroll progress; hosts apply the returned
//! opacity and offset to whatever content they lay over the canvas.

use crate::foundation::core::Region;

/// Visual state of a region's overlay content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayState {
    /// Content opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical offset; pixels for hero/contact, percent of own height for style.
    pub translate_y: f64,
    /// Whether the content should receive pointer input.
    pub interactive: bool,
}

pub fn overlay_for(region: Region, progress: f64) -> OverlayState {
    match region {
        Region::Primary => hero_overlay(progress),
        Region::Secondary => style_overlay(progress),
        Region::Tertiary => contact_overlay(progress),
    }
}

/// Fades in right after the page starts scrolling and out over the last fifth.
pub fn hero_overlay(p: f64) -> OverlayState {
    let opacity = if p > 0.8 {
        1.0 - (p - 0.8) * 5.0
    } else if p > 0.05 {
        1.0
    } else {
        0.0
    };
    OverlayState {
        opacity: opacity.clamp(0.0, 1.0),
        translate_y: (1.0 - p) * 50.0,
        interactive: p > 0.1,
    }
}

/// Rises in over `[0.1, 0.4)`, then drifts up and out over `[0.4, 1.0]`.
pub fn style_overlay(p: f64) -> OverlayState {
    let (opacity, translate_y) = if (0.1..0.4).contains(&p) {
        let local = (p - 0.1) / 0.3;
        (local, (1.0 - local) * 100.0)
    } else if (0.4..=1.0).contains(&p) {
        let local = (p - 0.4) / 0.6;
        (1.0 - local, -local * 100.0)
    } else {
        (0.0, 100.0)
    };
    OverlayState {
        opacity,
        translate_y,
        interactive: opacity > 0.5,
    }
}

pub fn contact_overlay(p: f64) -> OverlayState {
    let opacity = if p > 0.1 {
        if p > 0.9 { 1.0 - (p - 0.9) * 10.0 } else { 1.0 }
    } else {
        0.0
    };
    OverlayState {
        opacity: opacity.clamp(0.0, 1.0),
        translate_y: (1.0 - (p * 2.0).min(1.0)) * 100.0,
        interactive: p > 0.2,
    }
}
