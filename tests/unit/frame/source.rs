use super::*;
use image::Rgba;

fn solid(width: u32, height: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(px))
}

#[test]
fn pixels_are_taken_directly() {
    let input = FrameInput::from(solid(2, 2, [1, 2, 3, 4]));
    let accepted = FramePixels::accept(input, false, (None, None), Rgba8::BLACK).unwrap();
    assert!(matches!(accepted.pixels, FramePixels::Direct(_)));
    assert_eq!(accepted.dimensions, (2, 2));
    let data = accepted.pixels.acquire(2, 2, Rgba8::BLACK).unwrap();
    assert_eq!(&data[..4], &[1, 2, 3, 4]);
}

#[test]
fn wrong_buffer_length_is_invalid_image() {
    let input = FrameInput::Pixels(ImageData::new(2, 2, vec![0; 15]));
    let err = FramePixels::accept(input, false, (None, None), Rgba8::BLACK)
        .err()
        .unwrap();
    assert!(matches!(err, GifError::InvalidImage(_)));
}

#[test]
fn unsupported_sources_are_invalid_image() {
    let float = DynamicImage::ImageRgba32F(image::Rgba32FImage::new(2, 2));
    let input = FrameInput::from(float);
    assert!(matches!(input, FrameInput::Unsupported(_)));
    let err = FramePixels::accept(input, false, (None, None), Rgba8::BLACK)
        .err()
        .unwrap();
    assert!(matches!(err, GifError::InvalidImage(_)));
}

#[test]
fn rgb8_images_are_widened_to_rgba() {
    let rgb = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(1, 1, image::Rgb([9, 8, 7])));
    match FrameInput::from(rgb) {
        FrameInput::Pixels(img) => assert_eq!(img.data, vec![9, 8, 7, 255]),
        other => panic!("expected pixels, got {other:?}"),
    }
}

#[test]
fn drawables_are_lazy_until_dispatch_and_fill_background() {
    let sprite = solid(1, 1, [200, 0, 0, 255]);
    let input = FrameInput::Drawable(Arc::new(sprite));
    let accepted = FramePixels::accept(input, false, (None, None), Rgba8::BLACK).unwrap();
    assert!(accepted.pixels.is_lazy());

    let bg = Rgba8::from_hex("#00ff00").unwrap();
    let data = accepted.pixels.acquire(2, 1, bg).unwrap();
    assert_eq!(&data[..], &[200, 0, 0, 255, 0, 255, 0, 255]);
}

#[test]
fn surfaces_are_read_at_acquire_time() {
    let canvas = Arc::new(Mutex::new(solid(2, 1, [0, 0, 0, 255])));
    let input = FrameInput::Surface(canvas.clone());
    let accepted = FramePixels::accept(input, false, (None, None), Rgba8::BLACK).unwrap();

    canvas.lock().unwrap().put_pixel(1, 0, Rgba([5, 5, 5, 255]));
    let data = accepted.pixels.acquire(2, 1, Rgba8::BLACK).unwrap();
    assert_eq!(&data[4..], &[5, 5, 5, 255]);
}

#[test]
fn copy_reads_surface_at_add_time() {
    let canvas = Arc::new(Mutex::new(solid(2, 1, [0, 0, 0, 255])));
    let input = FrameInput::Surface(canvas.clone());
    let accepted = FramePixels::accept(input, true, (None, None), Rgba8::BLACK).unwrap();
    assert!(matches!(accepted.pixels, FramePixels::Copied(_)));

    canvas.lock().unwrap().put_pixel(1, 0, Rgba([5, 5, 5, 255]));
    let data = accepted.pixels.acquire(2, 1, Rgba8::BLACK).unwrap();
    assert_eq!(&data[4..], &[0, 0, 0, 255]);
}

#[test]
fn surface_reads_outside_bounds_are_transparent() {
    let canvas = Mutex::new(solid(1, 1, [7, 7, 7, 255]));
    let data = canvas.read_pixels(2, 1).unwrap();
    assert_eq!(data, vec![7, 7, 7, 255, 0, 0, 0, 0]);
}
