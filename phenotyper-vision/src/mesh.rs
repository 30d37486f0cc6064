//! Face mesh landmark detection.
//!
//! [`FaceMesh`] runs a MediaPipe-style face landmark network through ONNX
//! Runtime. The network sees a 192x192 letterboxed RGB frame scaled to
//! `[0, 1]` and produces:
//! - a landmark tensor of 468 (or 478 with iris refinement) points,
//!   `x, y, z` each, in input pixels
//! - a single face presence logit
//!
//! Anything implementing [`LandmarkDetector`] can stand in for it, which is
//! how the pipeline is tested without model weights.

use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use log::debug;
use ndarray::Array4;
use ort::{session::Session, value::Value};

use crate::landmarks::{LandmarkSet, Point, MESH_TOPOLOGY_POINTS};
use crate::preprocess::Letterbox;

pub const MESH_INPUT_SIZE: u32 = 192;
pub const DEFAULT_MIN_FACE_CONFIDENCE: f32 = 0.5;

const COORDS_PER_POINT: usize = 3;

/// Source of face landmarks for a single face.
pub trait LandmarkDetector {
    /// Returns `Ok(None)` when no face is present, which is distinct from
    /// an error running the detector.
    fn detect(&mut self, img: &DynamicImage) -> Result<Option<LandmarkSet>>;
}

impl<D: LandmarkDetector + ?Sized> LandmarkDetector for Box<D> {
    fn detect(&mut self, img: &DynamicImage) -> Result<Option<LandmarkSet>> {
        (**self).detect(img)
    }
}

pub struct FaceMesh {
    session: Session,
    min_confidence: f32,
}

impl FaceMesh {
    pub fn new(session: Session, min_confidence: f32) -> Self {
        Self {
            session,
            min_confidence,
        }
    }

    pub fn load(path: &Path, min_confidence: f32) -> Result<Self> {
        Ok(Self::new(crate::model::mesh_session(path)?, min_confidence))
    }
}

impl LandmarkDetector for FaceMesh {
    fn detect(&mut self, img: &DynamicImage) -> Result<Option<LandmarkSet>> {
        let (width, height) = img.dimensions();
        let letterbox = Letterbox::fit(img, MESH_INPUT_SIZE);
        let size = MESH_INPUT_SIZE as usize;

        let input_array = Array4::from_shape_vec((1, 3, size, size), letterbox.chw_unit())?;
        let input_tensor = Value::from_array(input_array)?;

        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let mut output_data: Vec<(Vec<i64>, Vec<f32>)> = Vec::new();
        for (_name, output) in outputs.iter() {
            let (shape, data) = output.try_extract_tensor::<f32>()?;
            output_data.push((shape.iter().copied().collect(), data.to_vec()));
        }

        let raw = decode_outputs(&output_data)?;
        let confidence = sigmoid(raw.presence_logit);
        if confidence < self.min_confidence {
            debug!(
                "face presence {:.3} below threshold {:.3}",
                confidence, self.min_confidence
            );
            return Ok(None);
        }

        let landmarks = LandmarkSet::from_flat(raw.coords, COORDS_PER_POINT, |x, y| {
            let (sx, sy) = letterbox.to_source(x, y);
            Point::new(sx as f64 / width as f64, sy as f64 / height as f64)
        })?;
        debug!(
            "face mesh: {} landmarks, presence {:.3}",
            landmarks.len(),
            confidence
        );
        Ok(Some(landmarks))
    }
}

/// Borrowed view of the two tensors the mesh network produces.
#[derive(Debug)]
pub struct RawMesh<'a> {
    pub coords: &'a [f32],
    pub presence_logit: f32,
}

/// Pick the landmark and presence tensors out of the model outputs.
///
/// Exported graphs disagree on output order and on extra singleton
/// dimensions, so tensors are identified by element count.
pub fn decode_outputs(outputs: &[(Vec<i64>, Vec<f32>)]) -> Result<RawMesh<'_>> {
    let coords = outputs
        .iter()
        .map(|(_, data)| data.as_slice())
        .find(|data| {
            data.len() % COORDS_PER_POINT == 0
                && data.len() / COORDS_PER_POINT >= MESH_TOPOLOGY_POINTS
        });
    let presence = outputs.iter().find(|(_, data)| data.len() == 1);

    match (coords, presence) {
        (Some(coords), Some((_, presence))) => Ok(RawMesh {
            coords,
            presence_logit: presence[0],
        }),
        _ => {
            let shapes: Vec<_> = outputs.iter().map(|(shape, _)| shape.clone()).collect();
            anyhow::bail!(
                "unexpected face mesh outputs {:?}, expected a [.., {}] landmark tensor and a [1, 1] presence score",
                shapes,
                MESH_TOPOLOGY_POINTS * COORDS_PER_POINT
            )
        }
    }
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
