//! Fixed slide template geometry.
//!
//! All template positions are in inches; [`Frame::to_emu`] converts them to
//! the English Metric Units used by OOXML (914400 EMU per inch).

use serde::{Deserialize, Serialize};

/// EMUs per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Slide width in inches (standard 4:3).
pub const SLIDE_WIDTH_IN: f64 = 10.0;

/// Slide height in inches (standard 4:3).
pub const SLIDE_HEIGHT_IN: f64 = 7.5;

/// Upper bound on an illustration's displayed width.
pub const IMAGE_MAX_WIDTH_IN: f64 = 6.5;

/// Width an illustration gets per unit of aspect ratio, before capping.
pub const IMAGE_BASE_WIDTH_IN: f64 = 3.4;

/// Top of the band illustrations are centered in; it runs to the slide bottom.
pub const IMAGE_BAND_TOP_IN: f64 = 3.6;

/// Slide background color (alice blue).
pub const BACKGROUND_RGB: (u8, u8, u8) = (240, 248, 255);

/// Title font size in points.
pub const TITLE_FONT_PT: f64 = 28.0;

/// Description font size in points.
pub const DESCRIPTION_FONT_PT: f64 = 16.0;

/// Title text box.
pub const TITLE_FRAME: Frame = Frame::new(0.5, 0.2, 9.0, 0.5);

/// Description text box.
pub const DESCRIPTION_FRAME: Frame = Frame::new(0.5, 0.8, 9.0, 2.8);

/// Convert inches to EMUs, rounding to the nearest unit.
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Format an RGB triple as an OOXML hex color ("F0F8FF").
pub fn rgb_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("{:02X}{:02X}{:02X}", r, g, b)
}

/// A positioned rectangle, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The same rectangle in EMUs.
    pub fn to_emu(&self) -> EmuFrame {
        EmuFrame {
            x: inches_to_emu(self.left),
            y: inches_to_emu(self.top),
            cx: inches_to_emu(self.width),
            cy: inches_to_emu(self.height),
        }
    }
}

/// A positioned rectangle, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmuFrame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Display size of an illustration with aspect ratio `r = width / height`.
///
/// Width is `min(IMAGE_MAX_WIDTH_IN, IMAGE_BASE_WIDTH_IN * r)` and height
/// keeps the ratio. Non-positive or non-finite ratios are treated as square.
pub fn image_size(aspect_ratio: f64) -> (f64, f64) {
    let r = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        1.0
    };
    let width = IMAGE_MAX_WIDTH_IN.min(IMAGE_BASE_WIDTH_IN * r);
    (width, width / r)
}

/// Where an illustration goes on the slide.
///
/// Centered horizontally on the full slide width and vertically in the band
/// from [`IMAGE_BAND_TOP_IN`] to the bottom edge.
pub fn image_frame(aspect_ratio: f64) -> Frame {
    let (width, height) = image_size(aspect_ratio);
    let left = (SLIDE_WIDTH_IN - width) / 2.0;
    let top = IMAGE_BAND_TOP_IN + (SLIDE_HEIGHT_IN - IMAGE_BAND_TOP_IN - height) / 2.0;
    Frame::new(left, top, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_square_image() {
        let frame = image_frame(1.0);
        assert!((frame.width - 3.4).abs() < EPSILON);
        assert!((frame.height - 3.4).abs() < EPSILON);
        assert!((frame.left - 3.3).abs() < EPSILON);
        assert!((frame.top - 3.85).abs() < EPSILON);
    }

    #[test]
    fn test_wide_image_is_capped() {
        let frame = image_frame(2.0);
        assert!((frame.width - 6.5).abs() < EPSILON);
        assert!((frame.height - 3.25).abs() < EPSILON);
        assert!((frame.left - 1.75).abs() < EPSILON);
    }

    #[test]
    fn test_ratio_preserved_and_capped_for_any_ratio() {
        let ratios = [0.05, 0.25, 0.5, 0.75, 1.0, 1.333, 1.5, 1.9117, 2.0, 3.0, 10.0, 100.0];
        for r in ratios {
            let (width, height) = image_size(r);
            assert!(width <= IMAGE_MAX_WIDTH_IN + EPSILON, "r={}", r);
            assert!(((width / height) - r).abs() < 1e-9 * r.max(1.0), "r={}", r);
        }
    }

    #[test]
    fn test_image_centered_in_band() {
        for r in [0.5, 1.0, 2.5] {
            let frame = image_frame(r);
            let right_margin = SLIDE_WIDTH_IN - frame.left - frame.width;
            assert!((frame.left - right_margin).abs() < EPSILON);

            let above = frame.top - IMAGE_BAND_TOP_IN;
            let below = SLIDE_HEIGHT_IN - frame.top - frame.height;
            assert!((above - below).abs() < EPSILON);
        }
    }

    #[test]
    fn test_degenerate_ratio_is_square() {
        assert_eq!(image_size(0.0), image_size(1.0));
        assert_eq!(image_size(f64::NAN), image_size(1.0));
    }

    #[test]
    fn test_emu_conversion() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(10.0), 9_144_000);
        assert_eq!(inches_to_emu(7.5), 6_858_000);
        assert_eq!(
            TITLE_FRAME.to_emu(),
            EmuFrame {
                x: 457_200,
                y: 182_880,
                cx: 8_229_600,
                cy: 457_200
            }
        );
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex(BACKGROUND_RGB), "F0F8FF");
        assert_eq!(rgb_hex((0, 1, 255)), "0001FF");
    }
}
