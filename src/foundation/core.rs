use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Point, Rect, Size};

/// One of the three scroll-driven page regions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Hero region at the top of the page.
    Primary,
    /// "Style" statement region.
    Secondary,
    /// Contact region at the bottom of the page.
    Tertiary,
}

impl Region {
    /// All regions in page order.
    pub const ALL: [Region; 3] = [Region::Primary, Region::Secondary, Region::Tertiary];

    /// Stable position of the region in page order (0, 1, 2).
    pub fn index(self) -> usize {
        match self {
            Region::Primary => 0,
            Region::Secondary => 1,
            Region::Tertiary => 2,
        }
    }

    /// Which container edge drives this region's progress formula.
    pub fn anchor(self) -> Anchor {
        match self {
            Region::Primary => Anchor::LeadingEdge,
            Region::Secondary | Region::Tertiary => Anchor::TrailingEdge,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::Primary => "primary",
            Region::Secondary => "secondary",
            Region::Tertiary => "tertiary",
        }
    }

    /// Parse a region from its lowercase name.
    pub fn parse(name: &str) -> ReelResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "primary" | "hero" => Ok(Region::Primary),
            "secondary" | "style" => Ok(Region::Secondary),
            "tertiary" | "contact" => Ok(Region::Tertiary),
            other => Err(ReelError::validation(format!("unknown region '{other}'"))),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress formula selector.
///
/// `LeadingEdge` measures how far the container top has scrolled past the viewport top,
/// normalized by the container's excess height. `TrailingEdge` measures how far the
/// container bottom has travelled through a viewport extended by the container height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    LeadingEdge,
    TrailingEdge,
}

/// Straight-alpha RGBA8 color as written in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    /// Page base background (`#1E1E1E`).
    pub const BACKGROUND: Rgba8 = Rgba8([30, 30, 30, 255]);

    /// Convert to premultiplied RGBA8.
    pub fn premul(self) -> [u8; 4] {
        let [r, g, b, a] = self.0;
        let premul = |c: u8| -> u8 { ((u16::from(c) * u16::from(a) + 127) / 255) as u8 };
        [premul(r), premul(g), premul(b), a]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::BACKGROUND
    }
}

/// Viewport dimensions in CSS pixels, which double as surface pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}
