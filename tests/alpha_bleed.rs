use image::{Rgba, RgbaImage};
use ventoy_assist::alpha_bleed::bleed_transparent_edges;

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[test]
fn colour_spreads_ring_by_ring_with_zero_alpha() {
    let mut img = RgbaImage::from_pixel(5, 5, CLEAR);
    img.put_pixel(2, 2, Rgba([200, 40, 40, 255]));

    bleed_transparent_edges(&mut img);

    assert_eq!(*img.get_pixel(2, 2), Rgba([200, 40, 40, 255]));
    // first ring
    assert_eq!(*img.get_pixel(1, 1), Rgba([200, 40, 40, 0]));
    assert_eq!(*img.get_pixel(2, 3), Rgba([200, 40, 40, 0]));
    // second ring, reached only through the first
    assert_eq!(*img.get_pixel(0, 0), Rgba([200, 40, 40, 0]));
    assert_eq!(*img.get_pixel(4, 2), Rgba([200, 40, 40, 0]));
    assert!(img.pixels().filter(|p| p[3] == 0).all(|p| p[0] == 200));
}

#[test]
fn transparent_pixel_takes_average_of_opaque_neighbours() {
    let mut img = RgbaImage::from_pixel(3, 3, CLEAR);
    img.put_pixel(0, 1, Rgba([255, 0, 0, 255]));
    img.put_pixel(2, 1, Rgba([0, 0, 255, 255]));

    bleed_transparent_edges(&mut img);

    assert_eq!(*img.get_pixel(1, 1), Rgba([127, 0, 127, 0]));
    assert_eq!(*img.get_pixel(1, 0), Rgba([127, 0, 127, 0]));
    assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 0]));
    assert_eq!(*img.get_pixel(2, 2), Rgba([0, 0, 255, 0]));
}

#[test]
fn ring_does_not_sample_itself() {
    let mut img = RgbaImage::from_pixel(4, 1, CLEAR);
    img.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
    img.put_pixel(3, 0, Rgba([0, 200, 0, 255]));

    bleed_transparent_edges(&mut img);

    assert_eq!(*img.get_pixel(1, 0), Rgba([100, 100, 100, 0]));
    assert_eq!(*img.get_pixel(2, 0), Rgba([0, 200, 0, 0]));
}

#[test]
fn fully_transparent_image_is_unchanged() {
    let mut img = RgbaImage::from_pixel(4, 4, CLEAR);
    bleed_transparent_edges(&mut img);
    assert!(img.pixels().all(|p| *p == CLEAR));
}

#[test]
fn opaque_and_translucent_pixels_are_untouched() {
    let mut img = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 128]));
    img.put_pixel(1, 1, Rgba([90, 90, 90, 255]));
    let before = img.clone();

    bleed_transparent_edges(&mut img);
    assert_eq!(img, before);
}
