//! # phenotyper-vision
//!
//! Facial phenotype measurement from face mesh landmarks.
//!
//! - [`measure`](measure::measure): six reference-normalized distances plus
//!   face, nose, jaw and lip classifications from one landmark set
//! - [`FaceMesh`]: ONNX face mesh adapter producing those landmarks
//! - [`Pipeline`]: photo in, [`MeasurementReport`] out
//!
//! The engine itself is pure; only the detector holds a model session.

pub mod annotate;
pub mod classify;
mod error;
pub mod landmarks;
pub mod measure;
pub mod mesh;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod report;

pub use classify::{FaceType, JawType, LipType, Locale, NoseType};
pub use error::{MeasureError, Result};
pub use landmarks::{ImageDimensions, Landmark, LandmarkSet, Point};
pub use measure::{measure, Measurement, Phenotype};
pub use mesh::{FaceMesh, LandmarkDetector};
pub use pipeline::{Analysis, Pipeline};
pub use report::MeasurementReport;
