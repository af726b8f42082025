use image::{DynamicImage, Rgba, RgbaImage};

/// Scale a 16-bit channel down to 8 bits. Truncates, so `0..=256` maps to 0.
const fn to_u8(channel: u16) -> u8 {
    (channel / 257) as u8
}

/// Complement the color channels of a pixel, keeping its alpha.
pub const fn invert_pixel(px: Rgba<u16>) -> Rgba<u8> {
    let [r, g, b, a] = px.0;
    Rgba([
        255 - to_u8(r),
        255 - to_u8(g),
        255 - to_u8(b),
        to_u8(a),
    ])
}

/// Produce a newly allocated inverted copy of `img` with the same bounds.
///
/// The source is widened to 16 bits per channel first so 8-bit and 16-bit
/// inputs go through the same downsample before inversion.
pub fn invert(img: &DynamicImage) -> RgbaImage {
    let src = img.to_rgba16();
    let mut inverted = RgbaImage::new(src.width(), src.height());

    for (x, y, px) in src.enumerate_pixels() {
        inverted.put_pixel(x, y, invert_pixel(*px));
    }

    inverted
}
