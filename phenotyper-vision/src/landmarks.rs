//! Face mesh landmark topology and coordinate types.
//!
//! Every index used by the measurement engine refers to the canonical
//! 468-point face mesh layout (the refined 478-point variant only appends
//! iris points, so it is accepted as well). Swapping in a detector with a
//! different topology silently changes what each [`Landmark`] points at and
//! is a breaking change for every ratio in this crate.

use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, Result};

/// Number of points in the canonical face mesh.
pub const MESH_TOPOLOGY_POINTS: usize = 468;

/// A landmark position normalized to `[0, 1]` of the image width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Accepts both `{"x": .., "y": ..}` and `[x, y]` / `[x, y, z]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Object { x: f64, y: f64 },
    Pair([f64; 2]),
    Triple([f64; 3]),
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Object { x, y } => Point::new(x, y),
            PointRepr::Pair([x, y]) | PointRepr::Triple([x, y, _]) => Point::new(x, y),
        }
    }
}

/// Named mesh positions referenced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Landmark {
    UpperLipCenter = 0,
    BrowMidpoint = 8,
    BrowRidge = 9,
    ForeheadCenter = 10,
    LowerLipCenter = 17,
    NoseAlaRight = 48,
    ForeheadMidRight = 67,
    NoseBase = 94,
    ForeheadOuterRight = 103,
    ForeheadInnerRight = 109,
    CheekboneRight = 137,
    Chin = 152,
    JawRight = 172,
    TempleLeft = 251,
    NoseAlaLeft = 278,
    ForeheadOuterLeftLower = 284,
    ForeheadMidLeft = 297,
    ForeheadOuterLeft = 332,
    ForeheadInnerLeft = 338,
    CheekboneLeft = 366,
    JawLeft = 397,
}

impl Landmark {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Candidates for the top of the forehead; the topmost one (minimum y) wins.
pub const FOREHEAD_TOP_CANDIDATES: [Landmark; 9] = [
    Landmark::ForeheadCenter,
    Landmark::ForeheadMidRight,
    Landmark::ForeheadInnerRight,
    Landmark::ForeheadOuterRight,
    Landmark::ForeheadMidLeft,
    Landmark::ForeheadInnerLeft,
    Landmark::ForeheadOuterLeft,
    Landmark::ForeheadOuterLeftLower,
    Landmark::TempleLeft,
];

/// Landmarks for a single detected face.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Fails when the set is too small for the mesh topology, which
    /// guarantees every [`Landmark`] lookup afterwards is in range.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < MESH_TOPOLOGY_POINTS {
            return Err(MeasureError::Topology {
                expected: MESH_TOPOLOGY_POINTS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Build a set from a flat model tensor laid out as `[x0, y0, (z0), x1, ...]`,
    /// mapping each raw `(x, y)` pair to a normalized point with `to_point`.
    pub fn from_flat<F>(values: &[f32], stride: usize, to_point: F) -> Result<Self>
    where
        F: Fn(f32, f32) -> Point,
    {
        if stride < 2 {
            return Err(MeasureError::Stride(stride));
        }
        let points = values
            .chunks_exact(stride)
            .map(|c| to_point(c[0], c[1]))
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, landmark: Landmark) -> Point {
        self.points[landmark.index()]
    }

    /// The forehead candidate with the smallest y (image y grows downward).
    /// Ties keep the earliest candidate.
    pub fn forehead_top(&self) -> Point {
        let mut best = self.get(FOREHEAD_TOP_CANDIDATES[0]);
        for &candidate in &FOREHEAD_TOP_CANDIDATES[1..] {
            let p = self.get(candidate);
            if p.y < best.y {
                best = p;
            }
        }
        best
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Point>::deserialize(deserializer)?;
        LandmarkSet::new(points).map_err(serde::de::Error::custom)
    }
}

impl std::ops::Index<Landmark> for LandmarkSet {
    type Output = Point;

    fn index(&self, landmark: Landmark) -> &Self::Output {
        &self.points[landmark.index()]
    }
}

/// Pixel size of the frame the landmarks were computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Euclidean distance in pixels between two normalized points.
    pub fn pixel_distance(&self, a: Point, b: Point) -> f64 {
        let w = self.width as f64;
        let h = self.height as f64;
        let dx = b.x * w - a.x * w;
        let dy = b.y * h - a.y * h;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_mesh(n: usize) -> Vec<Point> {
        vec![Point::new(0.5, 0.5); n]
    }

    #[test]
    fn rejects_short_landmark_sets() {
        let err = LandmarkSet::new(flat_mesh(68)).unwrap_err();
        assert_eq!(
            err,
            MeasureError::Topology {
                expected: 468,
                actual: 68
            }
        );
        assert!(LandmarkSet::new(flat_mesh(468)).is_ok());
        assert!(LandmarkSet::new(flat_mesh(478)).is_ok());
    }

    #[test]
    fn pixel_distance_scales_each_axis() {
        let dims = ImageDimensions::new(200, 100);
        let d = dims.pixel_distance(Point::new(0.0, 0.0), Point::new(0.3, 0.4));
        // 60 px horizontally, 40 px vertically
        assert!((d - (60.0f64.powi(2) + 40.0f64.powi(2)).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn forehead_top_picks_minimum_y() {
        let mut points = flat_mesh(468);
        points[Landmark::ForeheadInnerLeft.index()] = Point::new(0.55, 0.1);
        points[Landmark::ForeheadCenter.index()] = Point::new(0.5, 0.2);
        let set = LandmarkSet::new(points).unwrap();
        assert_eq!(set.forehead_top(), Point::new(0.55, 0.1));
    }

    #[test]
    fn forehead_top_ties_keep_first_candidate() {
        let mut points = flat_mesh(468);
        points[Landmark::ForeheadCenter.index()] = Point::new(0.1, 0.5);
        let set = LandmarkSet::new(points).unwrap();
        assert_eq!(set.forehead_top(), Point::new(0.1, 0.5));
    }

    #[test]
    fn from_flat_maps_every_chunk() {
        let mut values = Vec::new();
        for i in 0..468 {
            values.extend_from_slice(&[96.0, 48.0, i as f32]);
        }
        let set = LandmarkSet::from_flat(&values, 3, |x, y| {
            Point::new((x / 192.0) as f64, (y / 192.0) as f64)
        })
        .unwrap();
        assert_eq!(set.len(), 468);
        assert_eq!(set[Landmark::Chin], Point::new(0.5, 0.25));
    }

    #[test]
    fn from_flat_rejects_strides_without_both_coordinates() {
        let values = vec![0.5f32; 468 * 3];
        for stride in [0, 1] {
            let err = LandmarkSet::from_flat(&values, stride, |x, y| Point::new(x as f64, y as f64))
                .unwrap_err();
            assert_eq!(err, MeasureError::Stride(stride));
        }
        assert!(LandmarkSet::from_flat(&values, 2, |x, y| Point::new(x as f64, y as f64)).is_ok());
    }

    #[test]
    fn point_accepts_object_and_array_forms() {
        let pts: Vec<Point> = serde_json::from_str(r#"[{"x":0.1,"y":0.2},[0.3,0.4],[0.5,0.6,0.7]]"#).unwrap();
        assert_eq!(
            pts,
            vec![Point::new(0.1, 0.2), Point::new(0.3, 0.4), Point::new(0.5, 0.6)]
        );
    }
}
