use std::{fs, path::PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use shared::protocol::CSV_BLOB_MIME;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("export writer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// CSV export body split into its newline-delimited chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvBlob {
    pub lines: Vec<String>,
    pub mime_type: &'static str,
}

impl CsvBlob {
    pub fn from_body(body: &str) -> Self {
        Self {
            lines: body.split('\n').map(str::to_string).collect(),
            mime_type: CSV_BLOB_MIME,
        }
    }

    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

/// `2024-05-01T10:20:30.123Z` becomes `2024-05-01T10:20:30_123Z.csv`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "{}.csv",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace('.', "_")
    )
}

/// Called from a blocking worker thread.
pub trait FileSaver: Send + Sync {
    fn save(&self, blob: &CsvBlob, file_name: &str) -> Result<(), ExportError>;
}

pub struct DirectoryFileSaver {
    dir: PathBuf,
}

impl DirectoryFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSaver for DirectoryFileSaver {
    fn save(&self, blob: &CsvBlob, file_name: &str) -> Result<(), ExportError> {
        let path = self.dir.join(file_name);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, blob.contents()))
            .map_err(|source| ExportError::Write { path, source })
    }
}
