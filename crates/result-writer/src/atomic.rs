// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII guard for all-or-nothing file creation.
//!
//! [`AtomicFile`] owns a temporary file created next to the final path, so
//! the closing rename never crosses a filesystem boundary. Readers of the
//! final path see either the previous state or the complete new file,
//! never a partial one.

use crate::WriteError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A file that only appears at its final path once committed.
///
/// # Example
/// ```no_run
/// use result_writer::AtomicFile;
/// use std::io::Write;
/// use std::path::Path;
///
/// let mut out = AtomicFile::create(Path::new("/code/submission.csv")).unwrap();
/// out.file_mut().write_all(b"qid,answer\n").unwrap();
/// out.commit().unwrap();   // visible at the final path only now
/// ```
pub struct AtomicFile {
    target: PathBuf,
    /// `None` once committed.
    temp: Option<NamedTempFile>,
}

impl AtomicFile {
    /// Creates a temporary file in `target`'s directory.
    pub fn create(target: &Path) -> Result<Self, WriteError> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        let temp = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|source| WriteError::Io {
                path: target.to_path_buf(),
                source,
            })?;

        tracing::trace!("staging {} at {}", target.display(), temp.path().display());
        Ok(Self {
            target: target.to_path_buf(),
            temp: Some(temp),
        })
    }

    /// The final path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The temporary file's current path.
    pub fn temp_path(&self) -> &Path {
        self.temp().path()
    }

    /// Mutable access to the temporary file for writing.
    pub fn file_mut(&mut self) -> &mut File {
        self.temp
            .as_mut()
            .expect("temp file exists until commit")
            .as_file_mut()
    }

    /// Flushes the temporary file to disk and renames it to the final path.
    pub fn commit(mut self) -> Result<PathBuf, WriteError> {
        let temp = self.temp.take().expect("temp file exists until commit");
        let io_err = |source| WriteError::Io {
            path: self.target.clone(),
            source,
        };

        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&self.target).map_err(|e| io_err(e.error))?;

        tracing::debug!("committed {}", self.target.display());
        Ok(self.target.clone())
    }

    fn temp(&self) -> &NamedTempFile {
        self.temp.as_ref().expect("temp file exists until commit")
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        // NamedTempFile removes itself on drop.
        if let Some(temp) = self.temp.take() {
            tracing::debug!(
                "discarding uncommitted {} ({})",
                self.target.display(),
                temp.path().display(),
            );
        }
    }
}

impl std::fmt::Debug for AtomicFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("target", &self.target)
            .field("committed", &self.temp.is_none())
            .finish()
    }
}
