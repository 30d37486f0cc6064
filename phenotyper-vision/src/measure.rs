//! Phenotype measurement engine.
//!
//! Turns one face mesh into six reference-normalized distances and four
//! independent anthropometric classifications. Pure and allocation-light:
//! safe to call from any number of threads at once.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classify::{
    classify_face, classify_jaw, classify_lip, classify_nose, FaceType, JawType, LipType, Locale,
    NoseType,
};
use crate::landmarks::{ImageDimensions, Landmark, LandmarkSet};

/// A labelled landmark pair measured in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: Landmark,
    pub end: Landmark,
    /// Wire label, part of the client contract.
    pub label: &'static str,
    /// English name for display.
    pub name: &'static str,
}

impl Segment {
    const fn new(start: Landmark, end: Landmark, label: &'static str, name: &'static str) -> Self {
        Self {
            start,
            end,
            label,
            name,
        }
    }

    pub fn display_label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.name,
            Locale::Ru => self.label,
        }
    }

    pub fn pixel_length(&self, landmarks: &LandmarkSet, dims: ImageDimensions) -> f64 {
        dims.pixel_distance(landmarks[self.start], landmarks[self.end])
    }
}

/// Brow ridge to chin; the unit every ratio is expressed in.
pub const REFERENCE: Segment =
    Segment::new(Landmark::BrowRidge, Landmark::Chin, "Длина лица", "face length");

pub const FACE_WIDTH: Segment = Segment::new(
    Landmark::CheekboneRight,
    Landmark::CheekboneLeft,
    "Ширина лица",
    "face width",
);
pub const NOSE_WIDTH: Segment =
    Segment::new(Landmark::NoseAlaRight, Landmark::NoseAlaLeft, "Ширина носа", "nose width");
pub const NOSE_LENGTH: Segment =
    Segment::new(Landmark::BrowMidpoint, Landmark::NoseBase, "Длина носа", "nose length");
pub const LIP_LENGTH: Segment = Segment::new(
    Landmark::UpperLipCenter,
    Landmark::LowerLipCenter,
    "Длина губ",
    "lip length",
);
pub const JAW_WIDTH: Segment =
    Segment::new(Landmark::JawRight, Landmark::JawLeft, "Ширина челюсти", "jaw width");

/// Output order of the base measurements. Clients depend on both the labels
/// and this order, byte for byte.
pub const BASE_SEGMENTS: [Segment; 6] = [
    REFERENCE,
    FACE_WIDTH,
    NOSE_WIDTH,
    NOSE_LENGTH,
    LIP_LENGTH,
    JAW_WIDTH,
];

/// Display label for a wire label; unknown labels pass through unchanged.
pub fn display_label(label: &str, locale: Locale) -> &str {
    BASE_SEGMENTS
        .iter()
        .find(|s| s.label == label)
        .map_or(label, |s| s.display_label(locale))
}

/// One normalized base measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "comment")]
    pub label: String,
    pub value: f64,
}

/// Everything the engine derives from a detected face.
///
/// The scalar ratios are rounded for reporting; the type labels were
/// classified from the unrounded values.
#[derive(Debug, Clone, PartialEq)]
pub struct Phenotype {
    pub measurements: Vec<Measurement>,
    pub face_type: FaceType,
    pub face_ratio_pct: f64,
    pub nose_type: NoseType,
    pub nose_ratio_pct: f64,
    pub jaw_type: JawType,
    pub jaw_width_norm: f64,
    pub lip_type: LipType,
    pub lip_length_norm: f64,
}

/// Divide by the reference distance, or 0 when the reference is degenerate.
pub fn normalize(distance_px: f64, reference_px: f64) -> f64 {
    if reference_px > 0.0 {
        distance_px / reference_px
    } else {
        0.0
    }
}

/// `numerator / denominator * 100`, or 0 when the denominator is not positive.
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Round to `decimals` places on the exact decimal expansion of `value`,
/// ties to even. `0.03125` goes to `0.0312` and `87.25` to `87.2`.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Run the full measurement over one face.
///
/// `dims` must be the size of the frame the landmarks were detected on.
pub fn measure(landmarks: &LandmarkSet, dims: ImageDimensions) -> Phenotype {
    let reference_px = REFERENCE.pixel_length(landmarks, dims);

    let measurements = BASE_SEGMENTS
        .iter()
        .map(|segment| {
            let px = segment.pixel_length(landmarks, dims);
            let value = round_to(normalize(px, reference_px), 4);
            debug!("{}: {:.2}px -> {:.4}", segment.label, px, value);
            Measurement {
                label: segment.label.to_string(),
                value,
            }
        })
        .collect();

    let face_length_px = dims.pixel_distance(landmarks.forehead_top(), landmarks[Landmark::Chin]);
    let face_width_px = FACE_WIDTH.pixel_length(landmarks, dims);
    let face_ratio_pct = percent(face_width_px, face_length_px);

    let nose_width_norm = normalize(NOSE_WIDTH.pixel_length(landmarks, dims), reference_px);
    let nose_length_norm = normalize(NOSE_LENGTH.pixel_length(landmarks, dims), reference_px);
    let nose_ratio_pct = percent(nose_width_norm, nose_length_norm);

    let jaw_width_norm = normalize(JAW_WIDTH.pixel_length(landmarks, dims), reference_px);
    let lip_length_norm = normalize(LIP_LENGTH.pixel_length(landmarks, dims), reference_px);

    debug!(
        "reference={:.2}px face={:.2}% nose={:.2}% jaw={:.4} lip={:.4}",
        reference_px, face_ratio_pct, nose_ratio_pct, jaw_width_norm, lip_length_norm
    );

    Phenotype {
        measurements,
        face_type: classify_face(face_ratio_pct),
        face_ratio_pct: round_to(face_ratio_pct, 1),
        nose_type: classify_nose(nose_ratio_pct),
        nose_ratio_pct: round_to(nose_ratio_pct, 1),
        jaw_type: classify_jaw(jaw_width_norm),
        jaw_width_norm: round_to(jaw_width_norm, 4),
        lip_type: classify_lip(lip_length_norm),
        lip_length_norm: round_to(lip_length_norm, 4),
    }
}
