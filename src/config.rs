use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::{Region, Rgba8},
    foundation::error::{ReelError, ReelResult},
    render::fit::{FALLBACK_SEARCH_RADIUS, FitMode, RenderParams},
};

/// Per-region sequence source and drawing parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceConfig {
    /// Resource prefix; frame identifiers append `NNN_delay-0.04s.<format>`.
    pub base: String,
    #[serde(flatten)]
    pub render: RenderParams,
    /// Await this sequence before first paint and count it on the loading screen.
    #[serde(default)]
    pub high_priority: bool,
}

/// Radial darkening applied after every frame draw.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VignetteConfig {
    /// Gradient end radius as a fraction of surface width.
    pub radius_factor: f64,
    /// Tint opacity reached at (and beyond) the end radius.
    pub max_alpha: f64,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            radius_factor: 0.9,
            max_alpha: 0.45,
        }
    }
}

/// Complete page description: sequences, colors, and choreography constants.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_frame_count")]
    pub frame_count: usize,
    #[serde(default = "default_image_format")]
    pub image_format: String,
    #[serde(default)]
    pub background_rgba: Rgba8,
    #[serde(default)]
    pub vignette: VignetteConfig,
    /// Visibility cross-fade duration between region surfaces.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: f64,
    /// Height of each region container in viewport heights.
    #[serde(default = "default_section_height_vh")]
    pub section_height_vh: f64,
    /// Fallback search radius around a missing frame.
    #[serde(default = "default_search_radius")]
    pub search_radius: usize,
    pub primary: SequenceConfig,
    pub secondary: SequenceConfig,
    pub tertiary: SequenceConfig,
}

fn default_frame_count() -> usize {
    192
}

fn default_image_format() -> String {
    "webp".to_string()
}

fn default_fade_ms() -> f64 {
    1000.0
}

fn default_section_height_vh() -> f64 {
    3.0
}

fn default_search_radius() -> usize {
    FALLBACK_SEARCH_RADIUS
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            frame_count: default_frame_count(),
            image_format: default_image_format(),
            background_rgba: Rgba8::BACKGROUND,
            vignette: VignetteConfig::default(),
            fade_ms: default_fade_ms(),
            section_height_vh: default_section_height_vh(),
            search_radius: default_search_radius(),
            primary: SequenceConfig {
                base: "seq1/frame_".to_string(),
                render: RenderParams {
                    fit: FitMode::Cover,
                    align: 0.5,
                    zoom: 1.0,
                },
                high_priority: true,
            },
            secondary: SequenceConfig {
                base: "seq2/frame_".to_string(),
                render: RenderParams {
                    fit: FitMode::Cover,
                    align: 0.2,
                    zoom: 1.05,
                },
                high_priority: false,
            },
            tertiary: SequenceConfig {
                base: "seq3/frame_".to_string(),
                render: RenderParams {
                    fit: FitMode::Cover,
                    align: 0.5,
                    zoom: 1.1,
                },
                high_priority: false,
            },
        }
    }
}

impl SiteConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read site config '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    pub fn from_json_slice(bytes: &[u8]) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_slice(bytes)
            .map_err(|e| ReelError::serde(format!("site config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    pub fn sequence(&self, region: Region) -> &SequenceConfig {
        match region {
            Region::Primary => &self.primary,
            Region::Secondary => &self.secondary,
            Region::Tertiary => &self.tertiary,
        }
    }

    /// Total frames counted by the loading screen (high-priority sequences only).
    pub fn high_priority_frames(&self) -> usize {
        Region::ALL
            .iter()
            .filter(|r| self.sequence(**r).high_priority)
            .count()
            * self.frame_count
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.frame_count == 0 || self.frame_count > 999 {
            return Err(ReelError::validation(
                "frame_count must be within [1, 999] (three-digit frame names)",
            ));
        }
        if self.image_format.trim().is_empty() {
            return Err(ReelError::validation("image_format must be non-empty"));
        }
        if !self.fade_ms.is_finite() || self.fade_ms < 0.0 {
            return Err(ReelError::validation("fade_ms must be >= 0"));
        }
        if !self.section_height_vh.is_finite() || self.section_height_vh <= 0.0 {
            return Err(ReelError::validation("section_height_vh must be > 0"));
        }
        let v = &self.vignette;
        if !v.radius_factor.is_finite() || v.radius_factor <= 0.0 {
            return Err(ReelError::validation("vignette radius_factor must be > 0"));
        }
        if !v.max_alpha.is_finite() || !(0.0..=1.0).contains(&v.max_alpha) {
            return Err(ReelError::validation(
                "vignette max_alpha must be within [0, 1]",
            ));
        }
        for region in Region::ALL {
            let seq = self.sequence(region);
            if seq.base.is_empty() {
                return Err(ReelError::validation(format!(
                    "{region} sequence base must be non-empty"
                )));
            }
            seq.render
                .validate()
                .map_err(|e| ReelError::validation(format!("{region} sequence: {e}")))?;
        }
        Ok(())
    }
}
