use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};
use log::{debug, info};

use crate::landmarks::{ImageDimensions, LandmarkSet};
use crate::mesh::{FaceMesh, LandmarkDetector};
use crate::preprocess::{limit_dimension, MAX_IMAGE_DIMENSION};
use crate::report::MeasurementReport;

/// Result of analysing one photo.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: MeasurementReport,
    /// Size of the normalized frame the landmarks refer to.
    pub dimensions: ImageDimensions,
    pub landmarks: Option<LandmarkSet>,
    /// The normalized frame itself, for annotation.
    pub image: DynamicImage,
}

/// Full pipeline: normalize size → detect mesh → measure.
///
/// The pipeline owns its detector; build one per worker rather than sharing.
pub struct Pipeline<D = FaceMesh> {
    pub detector: D,
    pub max_dimension: u32,
}

impl Pipeline<FaceMesh> {
    pub fn with_face_mesh(model_path: &Path, min_confidence: f32) -> Result<Self> {
        let detector = FaceMesh::load(model_path, min_confidence)
            .context("Failed to initialize face mesh detector")?;
        Ok(Self::new(detector))
    }
}

impl<D: LandmarkDetector> Pipeline<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            max_dimension: MAX_IMAGE_DIMENSION,
        }
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Analyse a decoded image. A missing face is a normal outcome reported
    /// through the returned report, not an `Err`.
    pub fn analyze(&mut self, img: DynamicImage) -> Result<Analysis> {
        let img = limit_dimension(img, self.max_dimension);
        let (width, height) = img.dimensions();
        let dimensions = ImageDimensions::new(width, height);

        let landmarks = self
            .detector
            .detect(&img)
            .context("detecting face landmarks")?;

        match &landmarks {
            Some(set) => debug!("{} landmarks on {}x{} frame", set.len(), width, height),
            None => info!("No face detected in {}x{} frame", width, height),
        }

        let report = MeasurementReport::from_detection(landmarks.as_ref(), dimensions);
        Ok(Analysis {
            report,
            dimensions,
            landmarks,
            image: img,
        })
    }

    /// Decode an encoded image (JPEG, PNG, WebP, ...) and analyse it.
    pub fn analyze_bytes(&mut self, bytes: &[u8]) -> Result<Analysis> {
        if bytes.is_empty() {
            anyhow::bail!("Empty image");
        }
        let img = image::load_from_memory(bytes).context("Invalid image")?;
        self.analyze(img)
    }
}
