use super::*;
use crate::scroll::scheduler::ManualFrameClock;

struct FixedProbe {
    viewport: Viewport,
    rects: [Option<Rect>; 3],
}

impl LayoutProbe for FixedProbe {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn region_rect(&self, region: Region) -> Option<Rect> {
        self.rects[region.index()]
    }
}

fn rect(top: f64, height: f64) -> Option<Rect> {
    Some(Rect::new(0.0, top, 100.0, top + height))
}

#[test]
fn leading_edge_progress() {
    let vh = 100.0;
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(0.0, 300.0), vh), 0.0);
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(-100.0, 300.0), vh), 0.5);
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(-200.0, 300.0), vh), 1.0);
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(-900.0, 300.0), vh), 1.0);
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(50.0, 300.0), vh), 0.0);
}

#[test]
fn trailing_edge_progress() {
    let vh = 100.0;
    // Bottom at the extended viewport end: nothing travelled yet.
    assert_eq!(region_progress(Anchor::TrailingEdge, rect(100.0, 300.0), vh), 0.0);
    assert_eq!(region_progress(Anchor::TrailingEdge, rect(-100.0, 300.0), vh), 0.5);
    assert_eq!(region_progress(Anchor::TrailingEdge, rect(-300.0, 300.0), vh), 1.0);
    assert_eq!(region_progress(Anchor::TrailingEdge, rect(900.0, 300.0), vh), 0.0);
}

#[test]
fn missing_or_degenerate_geometry_is_zero() {
    assert_eq!(region_progress(Anchor::LeadingEdge, None, 100.0), 0.0);
    assert_eq!(region_progress(Anchor::TrailingEdge, None, 100.0), 0.0);
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(0.0, 100.0), 100.0), 0.0);
    assert_eq!(region_progress(Anchor::TrailingEdge, rect(0.0, 0.0), 0.0), 0.0);
}

#[test]
fn viewport_tall_hero_completes_once_scrolled() {
    let vh = 100.0;
    // height == vh: any scroll past the top divides by zero toward +inf.
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(-50.0, 100.0), vh), 1.0);
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(50.0, 100.0), vh), 0.0);
    // height < vh: the ratio takes the sign of the top edge.
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(10.0, 60.0), vh), 0.25);
    assert_eq!(region_progress(Anchor::LeadingEdge, rect(-10.0, 60.0), vh), 0.0);

    let update = sample(&FixedProbe {
        viewport: Viewport::new(100, 100),
        rects: [rect(-150.0, 100.0), rect(-50.0, 100.0), rect(250.0, 100.0)],
    });
    assert_eq!(update.progress.get(Region::Primary), 1.0);
    assert_eq!(update.active, Region::Secondary);
}

#[test]
fn active_region_priority_order() {
    assert_eq!(
        active_region(&RegionProgress::new(1.0, 0.05, 0.15)),
        Region::Tertiary
    );
    assert_eq!(
        active_region(&RegionProgress::new(0.99, 0.0, 0.0)),
        Region::Secondary
    );
    assert_eq!(
        active_region(&RegionProgress::new(0.2, 0.11, 0.0)),
        Region::Secondary
    );
    assert_eq!(
        active_region(&RegionProgress::new(0.0, 0.0, 0.0)),
        Region::Primary
    );
    assert_eq!(
        active_region(&RegionProgress::new(0.98, 0.1, 0.1)),
        Region::Primary
    );
}

#[test]
fn sample_uses_one_snapshot_and_tolerates_unmounted_regions() {
    let probe = FixedProbe {
        viewport: Viewport::new(100, 100),
        rects: [rect(-200.0, 300.0), None, rect(-100.0, 300.0)],
    };
    let update = sample(&probe);
    assert_eq!(update.progress.get(Region::Primary), 1.0);
    assert_eq!(update.progress.get(Region::Secondary), 0.0);
    assert_eq!(update.progress.get(Region::Tertiary), 0.5);
    assert_eq!(update.active, Region::Tertiary);
}

#[test]
fn scroll_events_coalesce_within_one_refresh() {
    let mut clock = ManualFrameClock::new();
    let mut tracker = ScrollTracker::new();
    let probe = FixedProbe {
        viewport: Viewport::new(100, 100),
        rects: [rect(0.0, 300.0), rect(300.0, 300.0), rect(600.0, 300.0)],
    };

    assert!(tracker.on_scroll(&mut clock));
    assert!(!tracker.on_scroll(&mut clock));
    assert!(!tracker.on_scroll(&mut clock));
    assert_eq!(clock.pending(), 1);

    let due = clock.next_refresh();
    assert_eq!(due.len(), 1);
    let update = tracker.on_frame(due[0], &probe).unwrap();
    assert_eq!(update.active, Region::Primary);
    assert!(!tracker.is_pending());

    // Stale or foreign tokens are ignored.
    assert!(tracker.on_frame(due[0], &probe).is_none());

    assert!(tracker.on_scroll(&mut clock));
    tracker.cancel(&mut clock);
    assert_eq!(clock.pending(), 0);
    assert!(!tracker.is_pending());
}
