use anyhow::Context;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::Result, model::Document};

/// Outcome of writing a batch of independent files. Nothing is rolled back on failure.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn merge(&mut self, other: WriteReport) {
        self.written.extend(other.written);
        self.failed.extend(other.failed);
    }

    pub(crate) fn record(&mut self, path: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => {
                tracing::info!("Saved {}", path.display());
                self.written.push(path);
            }
            Err(err) => {
                tracing::error!("Failed to write {}: {err:#}", path.display());
                self.failed.push((path, format!("{err:#}")));
            }
        }
    }
}

/// Write each document to `<root>/<reference>` as pretty printed JSON.
pub fn write_documents<T: Serialize>(root: &Path, documents: &[Document<T>]) -> WriteReport {
    let mut report = WriteReport::default();

    for document in documents {
        let path = root.join(document.reference.as_str());
        let result = write_json(&path, &document.body);
        report.record(path, result);
    }

    report
}

/// Replace the file at `path` with the JSON form of `value`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    write_file(path, &json)
}

pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
