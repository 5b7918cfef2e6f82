use std::sync::{Arc, OnceLock};

use crate::{
    assets::decode::FrameImage,
    assets::source::frame_url,
    config::SiteConfig,
    foundation::core::Region,
    foundation::error::{ReelError, ReelResult},
};

/// Settled state of one frame slot.
#[derive(Clone, Debug)]
pub enum SlotState {
    Loaded(Arc<FrameImage>),
    Failed,
}

/// Observable state of one frame slot, including the not-yet-settled case.
#[derive(Clone, Copy, Debug)]
pub enum FrameSlot<'a> {
    Unloaded,
    Loaded(&'a FrameImage),
    Failed,
}

/// One region's image sequence: exactly `frame_count` write-once slots.
///
/// Slots settle at most once (`unloaded -> loaded | failed`) and never revert, so readers can
/// inspect the sequence while loader threads are still filling it.
pub struct Sequence {
    region: Region,
    base: String,
    format: String,
    slots: Box<[OnceLock<SlotState>]>,
}

impl Sequence {
    pub fn new(
        region: Region,
        base: impl Into<String>,
        format: impl Into<String>,
        frame_count: usize,
    ) -> Self {
        Self {
            region,
            base: base.into(),
            format: format.into(),
            slots: (0..frame_count).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn frame_count(&self) -> usize {
        self.slots.len()
    }

    /// Resource identifier of frame `index`.
    pub fn url(&self, index: usize) -> String {
        frame_url(&self.base, index, &self.format)
    }

    pub fn slot(&self, index: usize) -> FrameSlot<'_> {
        match self.slots.get(index).and_then(OnceLock::get) {
            None => FrameSlot::Unloaded,
            Some(SlotState::Loaded(img)) => FrameSlot::Loaded(img),
            Some(SlotState::Failed) => FrameSlot::Failed,
        }
    }

    /// Loaded, fully decoded frame at `index`, if any.
    pub fn ready_frame(&self, index: usize) -> Option<&FrameImage> {
        match self.slot(index) {
            FrameSlot::Loaded(img) if img.is_ready() => Some(img),
            _ => None,
        }
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.ready_frame(index).is_some()
    }

    /// Settle slot `index`. Returns `false` if the slot was already settled or out of range.
    pub fn settle(&self, index: usize, state: SlotState) -> bool {
        self.slots
            .get(index)
            .is_some_and(|cell| cell.set(state).is_ok())
    }

    /// Counts of `(loaded, failed, unloaded)` slots.
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut loaded = 0;
        let mut failed = 0;
        for cell in self.slots.iter() {
            match cell.get() {
                Some(SlotState::Loaded(_)) => loaded += 1,
                Some(SlotState::Failed) => failed += 1,
                None => {}
            }
        }
        (loaded, failed, self.slots.len() - loaded - failed)
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (loaded, failed, unloaded) = self.counts();
        f.debug_struct("Sequence")
            .field("region", &self.region)
            .field("base", &self.base)
            .field("loaded", &loaded)
            .field("failed", &failed)
            .field("unloaded", &unloaded)
            .finish()
    }
}

/// The three region sequences, shared between the presentation shell and loader threads.
#[derive(Clone, Debug)]
pub struct FrameStore {
    sequences: [Arc<Sequence>; 3],
}

impl FrameStore {
    /// Accepts sequences in any order; each is filed under its own region.
    ///
    /// Two sequences for the same region are rejected.
    pub fn new(sequences: [Sequence; 3]) -> ReelResult<Self> {
        let mut slots: [Option<Arc<Sequence>>; 3] = [None, None, None];
        for seq in sequences {
            let region = seq.region();
            let slot = &mut slots[region.index()];
            if slot.is_some() {
                return Err(ReelError::validation(format!(
                    "duplicate {region} sequence in frame store"
                )));
            }
            *slot = Some(Arc::new(seq));
        }
        let [Some(p), Some(s), Some(t)] = slots else {
            return Err(ReelError::validation("frame store needs one sequence per region"));
        };
        Ok(Self {
            sequences: [p, s, t],
        })
    }

    /// Build empty sequences for every region described in `config`.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            sequences: Region::ALL.map(|region| {
                Arc::new(Sequence::new(
                    region,
                    config.sequence(region).base.clone(),
                    config.image_format.clone(),
                    config.frame_count,
                ))
            }),
        }
    }

    pub fn sequence(&self, region: Region) -> &Sequence {
        &self.sequences[region.index()]
    }

    pub fn shared(&self, region: Region) -> Arc<Sequence> {
        Arc::clone(&self.sequences[region.index()])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
