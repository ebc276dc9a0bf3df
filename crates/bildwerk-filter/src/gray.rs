// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entry checks for grayscale inputs.

use bildwerk_core::{BildwerkError, Result};
use image::{DynamicImage, GrayImage, Luma};

/// Reject images the engine cannot process. Every public operator calls this
/// before looking at its parameters.
pub fn check_image(image: &GrayImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(BildwerkError::UnsupportedImage(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

/// Borrow a decoded image as 8-bit single-channel samples.
///
/// Anything else (colour, alpha, 16-bit, float) is refused rather than
/// converted; conversion is the caller's decision.
pub fn ensure_luma8(image: &DynamicImage) -> Result<&GrayImage> {
    let gray = image.as_luma8().ok_or_else(|| {
        BildwerkError::UnsupportedImage(format!(
            "expected 8-bit grayscale, got {:?}",
            image.color()
        ))
    })?;
    check_image(gray)?;
    Ok(gray)
}

/// Convert any decoded image to 8-bit luma with BT.601 weights
/// (0.299 R + 0.587 G + 0.114 B), rounded.
///
/// Uses 14-bit fixed point, so the result is exact for gray inputs and
/// matches the usual `RGB -> GRAY` conversion of scanning tools. Alpha is
/// dropped. 8-bit grayscale input is returned unchanged.
pub fn luma_bt601(image: DynamicImage) -> GrayImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;

    let rgb = match image {
        DynamicImage::ImageLuma8(gray) => return gray,
        other => other.to_rgb8(),
    };
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = R * r as u32 + G * g as u32 + B * b as u32 + (1 << (SHIFT - 1));
        Luma([(weighted >> SHIFT) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, RgbaImage};

    #[test]
    fn empty_image_is_unsupported() {
        let err = check_image(&GrayImage::new(0, 4)).unwrap_err();
        assert!(matches!(err, BildwerkError::UnsupportedImage(_)));
    }

    #[test]
    fn luma8_passes_through() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 2, Luma([9u8])));
        let gray = ensure_luma8(&img).unwrap();
        assert_eq!(gray.dimensions(), (3, 2));
    }

    #[test]
    fn colour_is_refused() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(matches!(
            ensure_luma8(&img),
            Err(BildwerkError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn primaries_use_bt601_weights() {
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let gray = luma_bt601(DynamicImage::ImageRgb8(img));
        assert_eq!(gray.as_raw(), &vec![76u8, 150, 29]);
    }

    #[test]
    fn neutral_colours_keep_their_level() {
        for v in [0u8, 1, 127, 128, 254, 255] {
            let img = RgbImage::from_pixel(1, 1, Rgb([v, v, v]));
            assert_eq!(luma_bt601(DynamicImage::ImageRgb8(img)).get_pixel(0, 0).0[0], v);
        }
    }

    #[test]
    fn alpha_is_dropped() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 3]));
        let gray = luma_bt601(DynamicImage::ImageRgba8(img));
        assert!(gray.pixels().all(|p| p.0[0] == 76));
    }
}
