use super::*;

fn vignette(tint: Rgba8) -> Vignette {
    Vignette::new(&VignetteConfig::default(), tint)
}

#[test]
fn alpha_is_zero_at_center_and_saturates_at_radius() {
    let v = vignette(Rgba8::BACKGROUND);
    assert_eq!(v.alpha_at(50.0, 25.0, 100.0, 50.0), 0.0);
    let half = v.alpha_at(50.0 + 45.0, 25.0, 100.0, 50.0);
    assert!((half - 0.45 * 0.5).abs() < 1e-12);
    assert_eq!(v.alpha_at(50.0 + 90.0, 25.0, 100.0, 50.0), 0.45);
    assert_eq!(v.alpha_at(-500.0, -500.0, 100.0, 50.0), 0.45);
}

#[test]
fn vignette_darkens_edges_more_than_center() {
    let v = vignette(Rgba8([0, 0, 0, 255]));
    let (w, h) = (64u32, 32u32);
    let mut data = [255u8, 255, 255, 255].repeat((w * h) as usize);
    v.apply_in_place(&mut data, w, h).unwrap();

    let px = |x: u32, y: u32| data[((y * w + x) * 4) as usize];
    let center = px(32, 16);
    let corner = px(0, 0);
    assert!(center >= 250, "center darkened to {center}");
    assert!(corner < center);
    assert_eq!(data[3], 255);
}

#[test]
fn background_tint_over_background_is_invisible() {
    let v = vignette(Rgba8::BACKGROUND);
    let (w, h) = (16u32, 8u32);
    let mut data = [30u8, 30, 30, 255].repeat((w * h) as usize);
    v.apply_in_place(&mut data, w, h).unwrap();
    for px in data.chunks_exact(4) {
        for c in &px[..3] {
            assert!((i32::from(*c) - 30).abs() <= 1);
        }
    }
}

#[test]
fn mismatched_buffer_is_rejected() {
    let v = vignette(Rgba8::BACKGROUND);
    let mut data = vec![0u8; 12];
    assert!(v.apply_in_place(&mut data, 2, 2).is_err());
}
