use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread::JoinHandle,
};

use rayon::prelude::*;

use crate::{
    assets::decode::decode_frame,
    assets::source::FrameSource,
    assets::store::{Sequence, SlotState},
    foundation::core::Region,
    foundation::error::{ReelError, ReelResult},
};

/// Shared counter of settled frames observed by a loading screen.
///
/// Increments are monotonic and saturate at `total`, whatever the completion order.
#[derive(Debug)]
pub struct LoadProgress {
    count: AtomicUsize,
    total: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            count: AtomicUsize::new(0),
            total,
        }
    }

    /// Count one settled frame. Returns the counter value after the increment.
    pub fn advance(&self) -> usize {
        let total = self.total;
        match self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
                (c < total).then_some(c + 1)
            }) {
            Ok(prev) => prev + 1,
            Err(cur) => cur,
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.count() >= self.total
    }

    /// Rounded completion percentage in `[0, 100]`.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.count() as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Whether a sequence feeds the loading-screen progress counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    /// Awaited before first paint; counted toward [`LoadProgress`].
    High,
    /// Loaded behind the first paint; not counted.
    Background,
}

/// Outcome of loading one sequence. Always produced, even when the load was cut short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub region: Region,
    pub loaded: usize,
    pub failed: usize,
    pub total: usize,
    /// The load stopped before every slot settled (worker panic or lost thread).
    pub aborted: bool,
}

impl LoadReport {
    fn from_sequence(sequence: &Sequence, aborted: bool) -> Self {
        let (loaded, failed, _) = sequence.counts();
        Self {
            region: sequence.region(),
            loaded,
            failed,
            total: sequence.frame_count(),
            aborted,
        }
    }

    pub fn settled(&self) -> usize {
        self.loaded + self.failed
    }
}

/// Fetches and decodes every frame of a sequence on a rayon pool.
#[derive(Clone)]
pub struct SequenceLoader {
    source: Arc<dyn FrameSource>,
    progress: Arc<LoadProgress>,
    pool: Arc<rayon::ThreadPool>,
}

impl SequenceLoader {
    /// `threads: None` lets rayon pick the worker count.
    pub fn new(
        source: Arc<dyn FrameSource>,
        progress: Arc<LoadProgress>,
        threads: Option<usize>,
    ) -> ReelResult<Self> {
        Ok(Self {
            source,
            progress,
            pool: Arc::new(build_thread_pool(threads)?),
        })
    }

    pub fn progress(&self) -> &Arc<LoadProgress> {
        &self.progress
    }

    /// Load every slot of `sequence` and block until all fetches have settled.
    ///
    /// Individual failures mark their slot `failed`. A panic inside a fetch is caught and
    /// reported as an aborted load rather than propagated.
    #[tracing::instrument(skip(self, sequence), fields(region = %sequence.region()))]
    pub fn load_sequence(&self, sequence: &Sequence, priority: Priority) -> LoadReport {
        let n = sequence.frame_count();
        let run = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                (0..n)
                    .into_par_iter()
                    .for_each(|i| self.load_frame(sequence, i, priority));
            });
        }));

        let report = LoadReport::from_sequence(sequence, run.is_err());
        if report.aborted {
            tracing::error!(
                region = %report.region,
                settled = report.settled(),
                total = report.total,
                "sequence load aborted"
            );
        } else {
            tracing::info!(
                region = %report.region,
                loaded = report.loaded,
                failed = report.failed,
                "sequence loaded"
            );
        }
        report
    }

    /// Load `sequence` on a dedicated thread; the caller continues immediately.
    pub fn spawn(&self, sequence: Arc<Sequence>, priority: Priority) -> LoadHandle {
        let loader = self.clone();
        let worker_seq = Arc::clone(&sequence);
        let spawned = std::thread::Builder::new()
            .name(format!("scrollreel-load-{}", sequence.region()))
            .spawn(move || loader.load_sequence(&worker_seq, priority));

        let handle = match spawned {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::error!(region = %sequence.region(), error = %e, "failed to spawn loader thread");
                None
            }
        };
        LoadHandle { sequence, handle }
    }

    fn load_frame(&self, sequence: &Sequence, index: usize, priority: Priority) {
        let url = sequence.url(index);
        let state = match self.source.fetch(&url).and_then(|bytes| decode_frame(&bytes)) {
            Ok(img) => SlotState::Loaded(Arc::new(img)),
            Err(e) => {
                tracing::debug!(%url, error = %e, "frame unavailable");
                SlotState::Failed
            }
        };

        if sequence.settle(index, state) && priority == Priority::High {
            self.progress.advance();
        }
    }
}

/// A background sequence load in flight.
pub struct LoadHandle {
    sequence: Arc<Sequence>,
    handle: Option<JoinHandle<LoadReport>>,
}

impl LoadHandle {
    pub fn region(&self) -> Region {
        self.sequence.region()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Block until the load resolves. Never fails: a lost worker yields an aborted report.
    pub fn wait(self) -> LoadReport {
        let Some(handle) = self.handle else {
            return LoadReport::from_sequence(&self.sequence, true);
        };
        match handle.join() {
            Ok(report) => report,
            Err(_) => {
                tracing::error!(region = %self.sequence.region(), "loader thread panicked");
                LoadReport::from_sequence(&self.sequence, true)
            }
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "loader 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .thread_name(|i| format!("scrollreel-fetch-{i}"))
        .build()
        .map_err(|e| ReelError::load(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
