//! Delivery of export documents
//!
//! The exchange service only builds documents; getting one in front of the
//! user (a file on disk, stdout, ...) is the caller's job, done through a
//! `Presenter`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::{JournalError, JournalResult};

use super::json::ExportDocument;

/// Hands a finished export to the user
pub trait Presenter {
    /// What the caller gets back once the document has been delivered
    type Receipt;

    fn present(&self, document: &ExportDocument) -> JournalResult<Self::Receipt>;
}

/// Where a `FilePresenter` writes
#[derive(Debug, Clone)]
enum Destination {
    /// A directory; the file name is derived from the export time
    Directory(PathBuf),
    /// An exact file path
    File(PathBuf),
}

/// Writes documents to disk and returns the written path
#[derive(Debug, Clone)]
pub struct FilePresenter {
    destination: Destination,
    pretty: bool,
}

impl FilePresenter {
    /// Write into `dir` under the document's suggested file name
    pub fn into_dir(dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            destination: Destination::Directory(dir.into()),
            pretty,
        }
    }

    /// Write to exactly `path`
    pub fn to_file(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            destination: Destination::File(path.into()),
            pretty,
        }
    }

    fn target(&self, document: &ExportDocument) -> PathBuf {
        match &self.destination {
            Destination::Directory(dir) => dir.join(document.file_name()),
            Destination::File(path) => path.clone(),
        }
    }
}

impl Presenter for FilePresenter {
    type Receipt = PathBuf;

    fn present(&self, document: &ExportDocument) -> JournalResult<PathBuf> {
        let path = self.target(document);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                JournalError::Export(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = File::create(&path).map_err(|e| {
            JournalError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let mut writer = BufWriter::new(file);
        document.write_to(&mut writer, self.pretty)?;
        writer
            .flush()
            .map_err(|e| JournalError::Export(format!("Failed to flush export: {}", e)))?;

        Ok(path)
    }
}

/// Prints the document to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutPresenter {
    pub pretty: bool,
}

impl Presenter for StdoutPresenter {
    type Receipt = ();

    fn present(&self, document: &ExportDocument) -> JournalResult<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        document.write_to(&mut handle, self.pretty)?;
        writeln!(handle)?;
        Ok(())
    }
}
