use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

#[test]
fn decodes_png_dimensions_and_pixels() {
    let prepared = decode_image(&png_bytes(6, 4, [10, 200, 30, 255])).unwrap();
    assert_eq!((prepared.width, prepared.height), (6, 4));
    assert_eq!(prepared.rgba8.len(), 6 * 4 * 4);
    assert_eq!(&prepared.rgba8[0..4], &[10, 200, 30, 255]);
}

#[test]
fn alpha_is_preserved_straight() {
    let prepared = decode_image(&png_bytes(2, 2, [200, 100, 50, 128])).unwrap();
    // Straight alpha: color channels are not premultiplied on decode.
    assert_eq!(&prepared.rgba8[0..4], &[200, 100, 50, 128]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
}
