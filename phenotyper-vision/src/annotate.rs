//! Landmark overlays for visual inspection.

use image::{DynamicImage, Rgb, RgbImage};

use crate::landmarks::{ImageDimensions, Landmark, LandmarkSet, Point, FOREHEAD_TOP_CANDIDATES};
use crate::measure::BASE_SEGMENTS;

pub const DEFAULT_RADIUS: u32 = 4;
pub const MARKER: Rgb<u8> = Rgb([255, 0, 0]);

/// Which landmarks to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Every point in the mesh.
    All,
    /// Only the points the measurement engine reads.
    Measured,
}

/// Copy `img` and draw a filled disc of `radius` pixels on each selected landmark.
pub fn annotate(img: &DynamicImage, landmarks: &LandmarkSet, overlay: Overlay, radius: u32) -> RgbImage {
    let mut out = img.to_rgb8();
    let dims = ImageDimensions::new(out.width(), out.height());

    match overlay {
        Overlay::All => {
            for &p in landmarks.points() {
                draw_disc(&mut out, dims, p, radius);
            }
        }
        Overlay::Measured => {
            for landmark in measured_landmarks() {
                draw_disc(&mut out, dims, landmarks[landmark], radius);
            }
        }
    }
    out
}

fn measured_landmarks() -> impl Iterator<Item = Landmark> {
    BASE_SEGMENTS
        .into_iter()
        .flat_map(|s| [s.start, s.end])
        .chain(FOREHEAD_TOP_CANDIDATES)
}

fn draw_disc(img: &mut RgbImage, dims: ImageDimensions, p: Point, radius: u32) {
    let cx = p.x * dims.width as f64;
    let cy = p.y * dims.height as f64;
    let r = radius as f64;

    let x0 = (cx - r).floor().max(0.0) as u32;
    let y0 = (cy - r).floor().max(0.0) as u32;
    let x1 = ((cx + r).ceil().max(0.0) as u32).min(dims.width.saturating_sub(1));
    let y1 = ((cy + r).ceil().max(0.0) as u32).min(dims.height.saturating_sub(1));

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, MARKER);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh_with(point: Point) -> LandmarkSet {
        LandmarkSet::new(vec![point; 468]).unwrap()
    }

    #[test]
    fn draws_marker_at_landmark() {
        let img = DynamicImage::new_rgb8(100, 100);
        let out = annotate(&img, &mesh_with(Point::new(0.5, 0.25)), Overlay::All, 2);
        assert_eq!(*out.get_pixel(50, 25), MARKER);
        assert_eq!(*out.get_pixel(52, 25), MARKER);
        assert_eq!(*out.get_pixel(54, 25), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(10, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn markers_near_the_border_are_clipped() {
        let img = DynamicImage::new_rgb8(20, 20);
        let out = annotate(&img, &mesh_with(Point::new(0.0, 1.0)), Overlay::Measured, 4);
        assert_eq!(*out.get_pixel(0, 19), MARKER);
    }

    #[test]
    fn measured_overlay_covers_engine_landmarks() {
        let landmarks: Vec<_> = measured_landmarks().collect();
        assert!(landmarks.contains(&Landmark::Chin));
        assert!(landmarks.contains(&Landmark::JawLeft));
        assert!(landmarks.contains(&Landmark::TempleLeft));
    }
}
