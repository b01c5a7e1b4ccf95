//! Crop-geometry computation.
//!
//! Turns fixed margin constants plus probed source dimensions into a
//! validated crop rectangle. Downstream encoders require even dimensions
//! (4:2:0 chroma subsampling), so the computed width and height are rounded
//! to the nearest integer, rejected if non-positive, and then forced even
//! by decrementing. The result is either fully valid or an error, never a
//! partially-valid rectangle.

use crate::config::WIDESCREEN_ASPECT;
use crate::error::{CoreError, CoreResult};

use std::fmt;
use std::path::Path;

/// Pixel margins cropped off each edge of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    /// Margins with all four edges configured independently.
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Margins where left/right are derived from top/bottom via the 16/9
    /// aspect multiplier, matching the horizontal extent of a watermark
    /// strip of the given height.
    pub fn widescreen(top: f64, bottom: f64) -> Self {
        Self {
            top,
            bottom,
            left: WIDESCREEN_ASPECT * top,
            right: WIDESCREEN_ASPECT * bottom,
        }
    }
}

/// A validated crop rectangle: offsets plus even, positive dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Renders the rectangle as an ffmpeg crop filter expression.
    pub fn filter(&self) -> String {
        format!(
            "crop={}:{}:{}:{}",
            self.width, self.height, self.x, self.y
        )
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={},y={},w={},h={}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Computes the crop rectangle for a source of the given dimensions.
///
/// Offsets are truncated, dimensions rounded to the nearest integer.
/// Returns `CoreError::InvalidGeometry` when the margins leave no positive
/// area; otherwise both dimensions are forced even by decrementing.
pub fn compute_crop(
    source_path: &Path,
    src_width: u32,
    src_height: u32,
    margins: &Margins,
) -> CoreResult<CropRect> {
    let x = margins.left as u32;
    let y = margins.top as u32;
    let width = (f64::from(src_width) - margins.left - margins.right).round() as i64;
    let height = (f64::from(src_height) - margins.top - margins.bottom).round() as i64;

    if width <= 0 || height <= 0 {
        return Err(CoreError::InvalidGeometry {
            path: source_path.display().to_string(),
            width,
            height,
        });
    }

    let mut width = width as u32;
    let mut height = height as u32;
    if width % 2 == 1 {
        width -= 1;
    }
    if height % 2 == 1 {
        height -= 1;
    }

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crop(w: u32, h: u32, margins: Margins) -> CoreResult<CropRect> {
        compute_crop(Path::new("test.mp4"), w, h, &margins)
    }

    #[test]
    fn widescreen_margins_derive_left_right() {
        let m = Margins::widescreen(0.0, 50.0);
        assert_eq!(m.left, 0.0);
        assert!((m.right - 800.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn full_hd_with_bottom_watermark_strip() {
        // 16/9 * 50 = 88.888..., so w = round(1920 - 88.888) = 1831 -> 1830
        let rect = crop(1920, 1080, Margins::widescreen(0.0, 50.0)).unwrap();
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
        assert_eq!(rect.width, 1830);
        assert_eq!(rect.height, 1030);
    }

    #[test]
    fn explicit_margins_match_expected_rectangle() {
        let rect = crop(1920, 1080, Margins::new(0.0, 50.0, 0.0, 88.0)).unwrap();
        assert_eq!(rect, CropRect { x: 0, y: 0, width: 1832, height: 1030 });
    }

    #[test]
    fn dimensions_are_always_even_and_positive() {
        for (w, h, top, bottom, left, right) in [
            (1921u32, 1081u32, 1.0, 2.0, 3.0, 4.0),
            (640, 480, 0.0, 25.0, 0.0, 44.4),
            (100, 100, 10.0, 11.0, 12.0, 13.0),
            (720, 576, 7.5, 7.5, 13.3, 13.3),
        ] {
            let rect = crop(w, h, Margins::new(top, bottom, left, right)).unwrap();
            assert_eq!(rect.width % 2, 0, "odd width for {w}x{h}");
            assert_eq!(rect.height % 2, 0, "odd height for {w}x{h}");
            assert!(rect.width > 0 && rect.height > 0);

            // Parity forcing removes at most one pixel per axis.
            let expected_w = (f64::from(w) - left - right).round() as u32;
            let expected_h = (f64::from(h) - top - bottom).round() as u32;
            assert!(rect.width == expected_w || rect.width == expected_w - 1);
            assert!(rect.height == expected_h || rect.height == expected_h - 1);
        }
    }

    #[test]
    fn margins_swallowing_the_frame_are_rejected() {
        assert!(matches!(
            crop(100, 100, Margins::new(0.0, 0.0, 60.0, 60.0)),
            Err(CoreError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            crop(100, 100, Margins::new(50.0, 50.0, 0.0, 0.0)),
            Err(CoreError::InvalidGeometry { .. })
        ));
        // Exactly consumed is also invalid (w == 0).
        assert!(crop(100, 100, Margins::new(0.0, 100.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn filter_expression_is_ffmpeg_ordered() {
        let rect = CropRect { x: 0, y: 140, width: 1920, height: 800 };
        assert_eq!(rect.filter(), "crop=1920:800:0:140");
    }
}
