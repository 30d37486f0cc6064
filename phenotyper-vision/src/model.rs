use std::path::Path;

use anyhow::{Context, Result};
#[allow(unused_imports)]
use ort::{
    ep::{self, ExecutionProvider},
    session::{
        builder::{GraphOptimizationLevel, SessionBuilder},
        Session,
    },
};

pub fn session_builder() -> Result<SessionBuilder> {
    #[allow(unused_mut)]
    let mut builder =
        Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::<()>::from)?;

    #[cfg(feature = "openvino")]
    {
        let ep = ep::OpenVINO::default();
        if ep.is_available()? {
            ep.register(&mut builder)?;
        } else {
            log::warn!("openvino feature is enabled, onnx runtime not compiled with openvino")
        }
    }

    #[cfg(feature = "cuda")]
    {
        let ep = ep::CUDA::default();
        if ep.is_available()? {
            ep.register(&mut builder)?;
        } else {
            log::warn!("cuda feature is enabled, onnx runtime not compiled with cuda")
        }
    }

    Ok(builder)
}

/// Load the face mesh landmark model from an ONNX file.
pub fn mesh_session(path: &Path) -> Result<Session> {
    if !path.exists() {
        anyhow::bail!("face mesh model not found at {}", path.display());
    }
    log::debug!("loading face mesh model from {}", path.display());
    session_builder()?
        .commit_from_file(path)
        .with_context(|| format!("load face mesh model {}", path.display()))
}
