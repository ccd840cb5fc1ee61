//! Rendition planning: fit the canonical source size into each tier's box.

use emotia_core::models::TIER_COUNT;
use emotia_core::AppError;

/// One target size class. `id` doubles as the storage key suffix and purge generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tier {
    pub id: u8,
    pub max_width: u32,
    pub max_height: u32,
}

impl Tier {
    pub const fn new(id: u8, max_width: u32, max_height: u32) -> Self {
        Self {
            id,
            max_width,
            max_height,
        }
    }

    /// Zero-based position in the per-tier dimension arrays.
    pub fn index(&self) -> usize {
        usize::from(self.id.saturating_sub(1))
    }
}

/// The fixed, ordered tier set every emote is published at.
pub const TIERS: [Tier; TIER_COUNT] = [
    Tier::new(1, 96, 32),
    Tier::new(2, 192, 64),
    Tier::new(3, 288, 96),
    Tier::new(4, 384, 128),
];

/// Output size decided for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedRendition {
    pub tier: Tier,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Source has degenerate dimensions ({width}x{height})")]
    DegenerateSource { width: u32, height: u32 },

    #[error("Rendition dimension {0} does not fit the record")]
    DimensionOverflow(u32),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::DegenerateSource { .. } => AppError::InvalidInput(err.to_string()),
            PlanError::DimensionOverflow(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Scale `(width, height)` to fit inside `(max_width, max_height)` keeping aspect ratio.
///
/// Integer floor on the scaled side, never below 1. A source already inside the box is
/// returned as-is unless `allow_upscale` is set.
pub fn fit_within(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
    allow_upscale: bool,
) -> (u32, u32) {
    if !allow_upscale && width <= max_width && height <= max_height {
        return (width, height);
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (bw, bh) = (u64::from(max_width), u64::from(max_height));

    // width/height >= bw/bh means the width hits the box first
    let (out_w, out_h) = if w * bh >= h * bw {
        (bw, h * bw / w)
    } else {
        (w * bh / h, bh)
    };

    (out_w.max(1) as u32, out_h.max(1) as u32)
}

/// Computes per-tier output sizes.
#[derive(Debug, Clone)]
pub struct RenditionPlanner {
    tiers: Vec<Tier>,
    allow_upscale: bool,
}

impl Default for RenditionPlanner {
    fn default() -> Self {
        Self::new(TIERS.to_vec())
    }
}

impl RenditionPlanner {
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self {
            tiers,
            allow_upscale: false,
        }
    }

    pub fn with_upscale(mut self, allow_upscale: bool) -> Self {
        self.allow_upscale = allow_upscale;
        self
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Plan every tier in order for a source of the given canonical size.
    pub fn plan(&self, width: u32, height: u32) -> Result<Vec<PlannedRendition>, PlanError> {
        if width == 0 || height == 0 {
            return Err(PlanError::DegenerateSource { width, height });
        }

        Ok(self
            .tiers
            .iter()
            .map(|tier| {
                let (w, h) = fit_within(
                    width,
                    height,
                    tier.max_width,
                    tier.max_height,
                    self.allow_upscale,
                );
                PlannedRendition {
                    tier: *tier,
                    width: w,
                    height: h,
                }
            })
            .collect())
    }
}

/// Per-tier width and height arrays as stored on the emote record.
pub fn dimension_arrays(
    renditions: &[PlannedRendition],
) -> Result<([i16; TIER_COUNT], [i16; TIER_COUNT]), PlanError> {
    let mut widths = [0i16; TIER_COUNT];
    let mut heights = [0i16; TIER_COUNT];

    for rendition in renditions {
        let idx = rendition.tier.index();
        if idx >= TIER_COUNT {
            continue;
        }
        widths[idx] = i16::try_from(rendition.width)
            .map_err(|_| PlanError::DimensionOverflow(rendition.width))?;
        heights[idx] = i16::try_from(rendition.height)
            .map_err(|_| PlanError::DimensionOverflow(rendition.height))?;
    }

    Ok((widths, heights))
}
