use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeasureError {
    /// The upstream detector found no face in the frame.
    #[error("Face not detected")]
    FaceNotDetected,

    #[error("landmark set has {actual} points, the face mesh topology needs at least {expected}")]
    Topology { expected: usize, actual: usize },

    #[error("landmark tensor stride {0} is too small, each point needs at least x and y")]
    Stride(usize),
}

pub type Result<T> = std::result::Result<T, MeasureError>;
