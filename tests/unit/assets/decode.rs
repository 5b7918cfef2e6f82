use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_frame_png_dimensions() {
    let frame = decode_frame(&png_bytes(3, 2, [10, 20, 30, 255])).unwrap();
    assert_eq!(frame.width, 3);
    assert_eq!(frame.height, 2);
    assert!(frame.is_ready());
}

#[test]
fn premultiply_applies_alpha() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128,
            0,
            0,
            0,
            0
        ]
    );
}

#[test]
fn decode_frame_rejects_garbage() {
    assert!(decode_frame(b"not an image").is_err());
}

#[test]
fn from_premul_rejects_length_mismatch() {
    assert!(FrameImage::from_premul_rgba8(&[0u8; 7], 1, 2).is_err());
    assert!(FrameImage::from_premul_rgba8(&[0u8; 4], 70_000, 1).is_err());
}
