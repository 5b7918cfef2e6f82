use super::*;

#[test]
fn frame_url_zero_pads_to_three_digits() {
    assert_eq!(
        frame_url("seq1/frame_", 37, "webp"),
        "seq1/frame_037_delay-0.04s.webp"
    );
    assert_eq!(frame_url("f_", 0, "png"), "f_000_delay-0.04s.png");
    assert_eq!(frame_url("f_", 191, "png"), "f_191_delay-0.04s.png");
}

#[test]
fn normalize_path_cross_platform() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn dir_source_missing_file_is_error() {
    let src = DirSource::new(std::env::temp_dir().join("scrollreel_definitely_missing_dir"));
    assert!(src.fetch("frame_000_delay-0.04s.png").is_err());
    assert!(src.fetch("../escape.png").is_err());
}
