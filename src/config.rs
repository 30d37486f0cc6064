use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use phenotyper_vision::mesh::DEFAULT_MIN_FACE_CONFIDENCE;
use phenotyper_vision::preprocess::MAX_IMAGE_DIMENSION;
use phenotyper_vision::{annotate, Locale};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("", "", "phenotyper"));

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| match option_env!("PHENOTYPER_CONFIG_PATH") {
    Some(path) => PathBuf::from(path),
    None => PROJECT_DIRS
        .as_ref()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("/usr/local/etc/phenotyper/config.toml")),
});

pub static STORE_PREFIX: Lazy<PathBuf> = Lazy::new(|| match option_env!("PHENOTYPER_STORE_PREFIX") {
    Some(path) => PathBuf::from(path),
    None => PROJECT_DIRS
        .as_ref()
        .map(|dirs| dirs.data_dir().join("reports"))
        .unwrap_or_else(|| PathBuf::from("/usr/local/share/phenotyper/reports")),
});

static DEFAULT_MESH_MODEL: Lazy<PathBuf> = Lazy::new(|| match option_env!("PHENOTYPER_MODEL_PATH") {
    Some(path) => PathBuf::from(path),
    None => PROJECT_DIRS
        .as_ref()
        .map(|dirs| dirs.data_dir().join("models/face_landmark.onnx"))
        .unwrap_or_else(|| PathBuf::from("/usr/local/share/phenotyper/models/face_landmark.onnx")),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ONNX face landmark model.
    pub mesh_model: PathBuf,
    pub min_face_confidence: f32,
    /// Longer image side is scaled down to this before detection.
    pub max_image_dimension: u32,
    pub locale: Locale,
    pub annotation_radius: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mesh_model: DEFAULT_MESH_MODEL.clone(),
            min_face_confidence: DEFAULT_MIN_FACE_CONFIDENCE,
            max_image_dimension: MAX_IMAGE_DIMENSION,
            locale: Locale::default(),
            annotation_radius: annotate::DEFAULT_RADIUS,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(CONFIG_PATH.as_path());
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(CONFIG_PATH.as_path());
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data).with_context(|| format!("writing config {}", path.display()))?;
    Ok(())
}
