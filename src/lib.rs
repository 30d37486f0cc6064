pub mod config;
pub mod history;
pub mod render;
pub mod storage;

// Re-export vision types for convenience
pub use phenotyper_vision::{
    annotate, measure, Analysis, ImageDimensions, LandmarkSet, Locale, MeasurementReport,
    Phenotype, Pipeline,
};
