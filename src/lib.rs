//! Scrollreel renders scroll-driven image sequences.
//!
//! A page is split into three stacked regions, each backed by a numbered frame sequence.
//! Scroll position maps to per-region progress, progress maps to a frame index, and the
//! active region's frame is drawn onto a CPU surface:
//!
//! - Load a [`SiteConfig`] and [`preload`] its sequences into a [`FrameStore`]
//! - Drive a [`ScrollScene`] with scroll, resize and animation-frame events
//! - Read back the [`composite`](ScrollScene::composite) of the visible surfaces
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod assets;
/// Page configuration.
pub mod config;
/// Overlay curves for content laid over each region.
pub mod overlay;
pub(crate) mod render;
pub(crate) mod scroll;
/// Scene orchestration and startup loading.
pub mod shell;

pub use crate::foundation::core::{Affine, Anchor, Point, Rect, Region, Rgba8, Size, Viewport};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::decode::{FrameImage, decode_frame};
pub use crate::assets::loader::{
    LoadHandle, LoadProgress, LoadReport, Priority, SequenceLoader,
};
pub use crate::assets::source::{DirSource, FrameSource, frame_url, normalize_rel_path};
pub use crate::assets::store::{FrameSlot, FrameStore, Sequence, SlotState};
pub use crate::config::{SequenceConfig, SiteConfig, VignetteConfig};
pub use crate::overlay::{OverlayState, contact_overlay, hero_overlay, overlay_for, style_overlay};
pub use crate::render::composite::{PremulRgba8, over};
pub use crate::render::fit::{
    FALLBACK_SEARCH_RADIUS, FitMode, RenderParams, fit_rect, nearest_valid_index, target_index,
};
pub use crate::render::renderer::{
    DrawOutcome, DrawStyle, FrameRenderer, draw_frame, render_progress,
};
pub use crate::render::surface::{FrameRgba, Surface};
pub use crate::render::vignette::Vignette;
pub use crate::scroll::layout::StackedLayout;
pub use crate::scroll::scheduler::{FrameScheduler, FrameToken, ManualFrameClock};
pub use crate::scroll::tracker::{
    ACTIVATION_THRESHOLD, LayoutProbe, PRIMARY_HANDOFF, RegionProgress, ScrollTracker,
    ScrollUpdate, active_region, region_progress, sample,
};
pub use crate::shell::{ScrollScene, SitePreload, preload};
