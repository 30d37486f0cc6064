use crate::config::STORE_PREFIX;
use anyhow::{Context, Result};
use phenotyper_vision::MeasurementReport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const REPORTS_FILE: &str = "reports.bin";
const STAGED_FILE: &str = "reports.bin.tmp";

/// One saved analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    /// Where the photo or landmarks came from, usually a file path.
    pub source: String,
    pub report: MeasurementReport,
}

impl ReportRecord {
    pub fn new(source: impl Into<String>, report: MeasurementReport) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            report,
        }
    }
}

/// Per-subject report history kept as postcard files under one root.
#[derive(Debug, Clone)]
pub struct ReportStore {
    root: PathBuf,
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::open(STORE_PREFIX.as_path())
    }
}

impl ReportStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn subject_path(&self, subject: &str) -> Result<PathBuf> {
        if subject.is_empty()
            || subject == "."
            || subject == ".."
            || subject.contains(['/', '\\'])
        {
            anyhow::bail!("Invalid subject name: {:?}", subject);
        }
        Ok(self.root.join(subject))
    }

    /// Records in insertion order; a subject with no history yields an empty list.
    pub fn load_records(&self, subject: &str) -> Result<Vec<ReportRecord>> {
        let file = self.subject_path(subject)?.join(REPORTS_FILE);

        if !file.exists() {
            return Ok(vec![]);
        }

        let data = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
        postcard::from_bytes(&data).with_context(|| format!("decoding {}", file.display()))
    }

    pub fn save_record(&self, subject: &str, record: ReportRecord) -> Result<()> {
        let path = self.subject_path(subject)?;
        std::fs::create_dir_all(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut records = self.load_records(subject)?;
        records.push(record);
        let file = path.join(REPORTS_FILE);
        let data = postcard::to_allocvec(&records)?;

        // Stage, then rename over the history file.
        let staged = path.join(STAGED_FILE);
        std::fs::write(&staged, data).with_context(|| format!("writing {}", staged.display()))?;
        std::fs::rename(&staged, &file)
            .with_context(|| format!("replacing {}", file.display()))?;
        Ok(())
    }

    pub fn purge(&self, subject: &str) -> Result<()> {
        let path = self.subject_path(subject)?;
        if path.exists() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("removing {}", path.display()))?;
        }
        Ok(())
    }
}
