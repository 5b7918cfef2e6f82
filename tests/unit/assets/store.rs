use super::*;

fn frame() -> Arc<FrameImage> {
    Arc::new(FrameImage::from_premul_rgba8(&[1, 2, 3, 255], 1, 1).unwrap())
}

#[test]
fn new_sequence_has_fixed_length_of_unloaded_slots() {
    let seq = Sequence::new(Region::Primary, "hero/frame_", "webp", 192);
    assert_eq!(seq.frame_count(), 192);
    assert_eq!(seq.counts(), (0, 0, 192));
    assert!(matches!(seq.slot(0), FrameSlot::Unloaded));
    assert!(matches!(seq.slot(191), FrameSlot::Unloaded));
    assert!(matches!(seq.slot(192), FrameSlot::Unloaded));
    assert_eq!(seq.url(7), "hero/frame_007_delay-0.04s.webp");
}

#[test]
fn slots_settle_once_and_never_revert() {
    let seq = Sequence::new(Region::Secondary, "s_", "png", 4);
    assert!(seq.settle(1, SlotState::Loaded(frame())));
    assert!(!seq.settle(1, SlotState::Failed));
    assert!(seq.is_ready(1));

    assert!(seq.settle(2, SlotState::Failed));
    assert!(!seq.settle(2, SlotState::Loaded(frame())));
    assert!(matches!(seq.slot(2), FrameSlot::Failed));
    assert!(!seq.is_ready(2));

    assert!(!seq.settle(9, SlotState::Failed));
    assert_eq!(seq.counts(), (1, 1, 2));
}

#[test]
fn store_indexes_sequences_by_region() {
    let store = FrameStore::from_config(&SiteConfig::default());
    for region in Region::ALL {
        assert_eq!(store.sequence(region).region(), region);
        assert_eq!(store.sequence(region).frame_count(), 192);
    }
    let shared = store.shared(Region::Tertiary);
    shared.settle(0, SlotState::Failed);
    assert_eq!(store.sequence(Region::Tertiary).counts(), (0, 1, 191));
}

#[test]
fn store_files_sequences_by_their_own_region() {
    let store = FrameStore::new([
        Sequence::new(Region::Tertiary, "contact/frame_", "webp", 4),
        Sequence::new(Region::Primary, "hero/frame_", "webp", 4),
        Sequence::new(Region::Secondary, "style/frame_", "webp", 4),
    ])
    .unwrap();
    for region in Region::ALL {
        assert_eq!(store.sequence(region).region(), region);
    }
    assert_eq!(store.sequence(Region::Primary).base(), "hero/frame_");
    assert_eq!(store.sequence(Region::Tertiary).base(), "contact/frame_");
}

#[test]
fn store_rejects_duplicate_regions() {
    let err = FrameStore::new([
        Sequence::new(Region::Primary, "a_", "png", 2),
        Sequence::new(Region::Primary, "b_", "png", 2),
        Sequence::new(Region::Tertiary, "c_", "png", 2),
    ]);
    assert!(matches!(err, Err(ReelError::Validation(_))));
}
