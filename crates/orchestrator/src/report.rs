//! Run results and their on-disk form.

use anyhow::{Context, Result};
use data_loader::{Description, Score, UserKey};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// One successfully processed user, as written to the results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserKey,
    pub ratings: IndexMap<String, Score>,
    pub prompt: String,
    pub description: Description,
    /// `None` in test mode
    pub embedding: Option<Vec<f32>>,
}

/// Everything a run produced: records in dataset order and failures in the
/// order they happened
#[derive(Debug, Default)]
pub struct RunReport {
    pub records: Vec<UserRecord>,
    pub errors: IndexMap<String, String>,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Where `persist` put things
#[derive(Debug, Clone)]
pub struct PersistSummary {
    pub results_path: PathBuf,
    pub errors_path: Option<PathBuf>,
    pub record_count: usize,
    pub error_count: usize,
}

pub fn results_file_name(dataset_name: &str) -> String {
    format!("{}_description.json", dataset_name)
}

pub fn errors_file_name(dataset_name: &str) -> String {
    format!("{}_errors.json", dataset_name)
}

/// Write the report into `folder`.
///
/// `{dataset}_description.json` is always written. `{dataset}_errors.json` is
/// written only when some user failed, and a leftover one from an earlier run
/// is removed otherwise.
pub fn persist(report: &RunReport, folder: &Path, dataset_name: &str) -> Result<PersistSummary> {
    fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create result folder {}", folder.display()))?;

    let results_path = folder.join(results_file_name(dataset_name));
    write_json_atomic(&results_path, &report.records)?;

    let errors_path = folder.join(errors_file_name(dataset_name));
    let errors_path = if report.has_errors() {
        write_json_atomic(&errors_path, &report.errors)?;
        Some(errors_path)
    } else {
        if errors_path.exists() {
            fs::remove_file(&errors_path).with_context(|| {
                format!("Failed to remove stale errors file {}", errors_path.display())
            })?;
        }
        None
    };

    info!(
        "Saved {} descriptions to {}",
        report.records.len(),
        results_path.display()
    );
    if let Some(path) = &errors_path {
        warn!(
            "{} users failed, see {}",
            report.errors.len(),
            path.display()
        );
    }

    Ok(PersistSummary {
        results_path,
        errors_path,
        record_count: report.records.len(),
        error_count: report.errors.len(),
    })
}

/// Pretty-print `value` into a sibling temp file, then rename it over `path`
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;
        writer.flush()?;
    }

    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32) -> UserRecord {
        UserRecord {
            id: UserKey::Numeric(id),
            ratings: IndexMap::from([("Heat (1995)".to_string(), 4)]),
            prompt: "I am a Male of age 18-24 and I rank movies as follows: Heat (1995): 4".into(),
            description: Description::Text("Likes crime.".into()),
            embedding: Some(vec![0.5, 0.25]),
        }
    }

    #[test]
    fn test_record_json_shape() {
        let value = serde_json::to_value(record(3)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["ratings"]["Heat (1995)"], 4);
        assert_eq!(value["description"], "Likes crime.");
        assert_eq!(value["embedding"][1], 0.25);
    }

    #[test]
    fn test_persist_without_errors() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("embeddings");
        let report = RunReport {
            records: vec![record(1), record(2)],
            errors: IndexMap::new(),
        };

        let summary = persist(&report, &folder, "ml-1m").unwrap();

        assert_eq!(summary.results_path, folder.join("ml-1m_description.json"));
        assert!(summary.errors_path.is_none());
        assert!(!folder.join("ml-1m_errors.json").exists());

        let text = fs::read_to_string(&summary.results_path).unwrap();
        let back: Vec<UserRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report.records);
        assert!(text.contains("\n  "), "output should be pretty printed");
    }

    #[test]
    fn test_persist_replaces_stale_errors_file() {
        let dir = tempfile::tempdir().unwrap();
        let failed = RunReport {
            records: vec![],
            errors: IndexMap::from([("A1".to_string(), "boom".to_string())]),
        };
        let summary = persist(&failed, dir.path(), "amazon").unwrap();
        let errors_path = summary.errors_path.unwrap();

        let errors: IndexMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&errors_path).unwrap()).unwrap();
        assert_eq!(errors["A1"], "boom");

        persist(&RunReport::default(), dir.path(), "amazon").unwrap();
        assert!(!errors_path.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("amazon_description.json")).unwrap(),
            "[]"
        );
    }
}
