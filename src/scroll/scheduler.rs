use std::collections::BTreeSet;

/// Handle of one requested animation-frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken(pub u64);

/// Host facility that fires a callback on the next display refresh.
///
/// The host delivers fired tokens back to the owner of the request (see
/// [`crate::ScrollScene::on_animation_frame`]); a cancelled token must never be delivered.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Deterministic scheduler driven by explicit [`ManualFrameClock::next_refresh`] calls.
///
/// Used by the CLI scroll simulation and by tests in place of a browser refresh loop.
#[derive(Debug, Default)]
pub struct ManualFrameClock {
    next_id: u64,
    pending: BTreeSet<FrameToken>,
    refreshes: u64,
}

impl ManualFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one display refresh, returning every token due in request order.
    pub fn next_refresh(&mut self) -> Vec<FrameToken> {
        self.refreshes += 1;
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, token: FrameToken) -> bool {
        self.pending.contains(&token)
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl FrameScheduler for ManualFrameClock {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id);
        self.next_id += 1;
        self.pending.insert(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.remove(&token);
    }
}
