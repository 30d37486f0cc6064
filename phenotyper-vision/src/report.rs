//! Measurement report handed to callers and serialized for clients.

use serde::{Deserialize, Serialize};

use crate::classify::{FaceType, JawType, LipType, NoseType};
use crate::error::MeasureError;
use crate::landmarks::{ImageDimensions, LandmarkSet};
use crate::measure::{measure, Measurement, Phenotype};

/// Either a full phenotype or the reason none could be measured.
///
/// On the wire this is one flat record where every key is always present:
/// a failed report has `error` set, an empty `measurements` array and null
/// classifications; a measured report has `error: null` and every field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireReport", try_from = "WireReport")]
pub enum MeasurementReport {
    Measured(Phenotype),
    Failed { reason: String },
}

impl MeasurementReport {
    pub fn face_not_detected() -> Self {
        MeasurementReport::Failed {
            reason: MeasureError::FaceNotDetected.to_string(),
        }
    }

    /// Caller-level wrapper: the engine only runs when a face was found.
    pub fn from_detection(landmarks: Option<&LandmarkSet>, dims: ImageDimensions) -> Self {
        match landmarks {
            Some(landmarks) => MeasurementReport::Measured(measure(landmarks, dims)),
            None => Self::face_not_detected(),
        }
    }

    pub fn phenotype(&self) -> Option<&Phenotype> {
        match self {
            MeasurementReport::Measured(phenotype) => Some(phenotype),
            MeasurementReport::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MeasurementReport::Measured(_) => None,
            MeasurementReport::Failed { reason } => Some(reason),
        }
    }

    pub fn measurements(&self) -> &[Measurement] {
        self.phenotype().map_or(&[], |p| p.measurements.as_slice())
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, MeasurementReport::Measured(_))
    }
}

/// Flat serialized form; field names and order are part of the client contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireReport {
    measurements: Vec<Measurement>,
    face_type: Option<FaceType>,
    face_ratio_pct: Option<f64>,
    nose_type: Option<NoseType>,
    nose_ratio_pct: Option<f64>,
    jaw_type: Option<JawType>,
    jaw_width_norm: Option<f64>,
    lip_type: Option<LipType>,
    lip_length_norm: Option<f64>,
    error: Option<String>,
}

impl From<MeasurementReport> for WireReport {
    fn from(report: MeasurementReport) -> Self {
        match report {
            MeasurementReport::Measured(p) => WireReport {
                measurements: p.measurements,
                face_type: Some(p.face_type),
                face_ratio_pct: Some(p.face_ratio_pct),
                nose_type: Some(p.nose_type),
                nose_ratio_pct: Some(p.nose_ratio_pct),
                jaw_type: Some(p.jaw_type),
                jaw_width_norm: Some(p.jaw_width_norm),
                lip_type: Some(p.lip_type),
                lip_length_norm: Some(p.lip_length_norm),
                error: None,
            },
            MeasurementReport::Failed { reason } => WireReport {
                error: Some(reason),
                ..WireReport::default()
            },
        }
    }
}

impl TryFrom<WireReport> for MeasurementReport {
    type Error = String;

    fn try_from(wire: WireReport) -> Result<Self, Self::Error> {
        if let Some(reason) = wire.error {
            let populated = !wire.measurements.is_empty()
                || wire.face_type.is_some()
                || wire.face_ratio_pct.is_some()
                || wire.nose_type.is_some()
                || wire.nose_ratio_pct.is_some()
                || wire.jaw_type.is_some()
                || wire.jaw_width_norm.is_some()
                || wire.lip_type.is_some()
                || wire.lip_length_norm.is_some();
            if populated {
                return Err(format!("report has error {reason:?} but also carries results"));
            }
            return Ok(MeasurementReport::Failed { reason });
        }

        match (
            wire.face_type,
            wire.face_ratio_pct,
            wire.nose_type,
            wire.nose_ratio_pct,
            wire.jaw_type,
            wire.jaw_width_norm,
            wire.lip_type,
            wire.lip_length_norm,
        ) {
            (
                Some(face_type),
                Some(face_ratio_pct),
                Some(nose_type),
                Some(nose_ratio_pct),
                Some(jaw_type),
                Some(jaw_width_norm),
                Some(lip_type),
                Some(lip_length_norm),
            ) => Ok(MeasurementReport::Measured(Phenotype {
                measurements: wire.measurements,
                face_type,
                face_ratio_pct,
                nose_type,
                nose_ratio_pct,
                jaw_type,
                jaw_width_norm,
                lip_type,
                lip_length_norm,
            })),
            _ => Err("report has neither an error nor a complete set of classifications".to_string()),
        }
    }
}
