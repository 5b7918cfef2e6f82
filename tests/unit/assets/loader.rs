use std::{collections::HashSet, io::Cursor};

use super::*;
use crate::assets::store::FrameSlot;

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 1, image::Rgba([40, 50, 60, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Serves a PNG for every identifier except those whose frame index is listed in `broken`.
struct FlakySource {
    png: Vec<u8>,
    broken: HashSet<usize>,
    panic_on: Option<usize>,
}

impl FlakySource {
    fn new(broken: impl IntoIterator<Item = usize>) -> Self {
        Self {
            png: tiny_png(),
            broken: broken.into_iter().collect(),
            panic_on: None,
        }
    }
}

fn index_of(url: &str) -> usize {
    let digits = url
        .rsplit_once("_delay")
        .map(|(head, _)| &head[head.len() - 3..])
        .unwrap();
    digits.parse().unwrap()
}

impl FrameSource for FlakySource {
    fn fetch(&self, url: &str) -> ReelResult<Vec<u8>> {
        let i = index_of(url);
        if self.panic_on == Some(i) {
            panic!("simulated network stack crash");
        }
        if self.broken.contains(&i) {
            return Err(ReelError::load(format!("404 {url}")));
        }
        Ok(self.png.clone())
    }
}

fn loader(source: FlakySource, total: usize) -> SequenceLoader {
    SequenceLoader::new(Arc::new(source), Arc::new(LoadProgress::new(total)), Some(4)).unwrap()
}

#[test]
fn failures_count_toward_progress_and_never_exceed_total() {
    let seq = Sequence::new(Region::Primary, "hero/frame_", "png", 192);
    let l = loader(FlakySource::new([0, 17, 64, 100, 191]), 192);

    let report = l.load_sequence(&seq, Priority::High);

    assert_eq!(report.loaded, 187);
    assert_eq!(report.failed, 5);
    assert!(!report.aborted);
    assert_eq!(l.progress().count(), 192);
    assert!(l.progress().is_complete());
    assert_eq!(l.progress().percent(), 100);
    assert!(matches!(seq.slot(17), FrameSlot::Failed));
    assert!(seq.is_ready(18));

    // A second pass settles nothing new and must not push the counter past N.
    l.load_sequence(&seq, Priority::High);
    assert_eq!(l.progress().count(), 192);
}

#[test]
fn background_sequences_do_not_feed_progress() {
    let seq = Sequence::new(Region::Secondary, "style/frame_", "png", 12);
    let l = loader(FlakySource::new([]), 12);
    let report = l.load_sequence(&seq, Priority::Background);
    assert_eq!(report.loaded, 12);
    assert_eq!(l.progress().count(), 0);
}

#[test]
fn progress_advance_saturates() {
    let p = LoadProgress::new(3);
    assert_eq!(p.advance(), 1);
    assert_eq!(p.advance(), 2);
    assert_eq!(p.advance(), 3);
    assert_eq!(p.advance(), 3);
    assert_eq!(p.count(), 3);
}

#[test]
fn progress_advance_is_clamped_under_contention() {
    let p = Arc::new(LoadProgress::new(100));
    std::thread::scope(|s| {
        for _ in 0..8 {
            let p = Arc::clone(&p);
            s.spawn(move || {
                for _ in 0..50 {
                    p.advance();
                }
            });
        }
    });
    assert_eq!(p.count(), 100);
}

#[test]
fn percent_rounds() {
    let p = LoadProgress::new(576);
    for _ in 0..3 {
        p.advance();
    }
    assert_eq!(p.percent(), 1);
    assert_eq!(LoadProgress::new(0).percent(), 100);
}

#[test]
fn panicking_source_resolves_as_aborted() {
    let seq = Sequence::new(Region::Tertiary, "contact/frame_", "png", 8);
    let mut src = FlakySource::new([]);
    src.panic_on = Some(3);
    let l = loader(src, 8);

    let report = l.load_sequence(&seq, Priority::High);
    assert!(report.aborted);
    assert!(matches!(seq.slot(3), FrameSlot::Unloaded));
    assert!(l.progress().count() <= 8);
}

#[test]
fn spawned_load_can_be_awaited() {
    let seq = Arc::new(Sequence::new(Region::Secondary, "style/frame_", "png", 16));
    let l = loader(FlakySource::new([5]), 16);
    let handle = l.spawn(Arc::clone(&seq), Priority::Background);
    assert_eq!(handle.region(), Region::Secondary);
    let report = handle.wait();
    assert_eq!(report.loaded, 15);
    assert_eq!(report.failed, 1);
    assert_eq!(seq.counts(), (15, 1, 0));
}

#[test]
fn zero_threads_is_rejected() {
    let err = SequenceLoader::new(
        Arc::new(FlakySource::new([])),
        Arc::new(LoadProgress::new(1)),
        Some(0),
    );
    assert!(err.is_err());
}
