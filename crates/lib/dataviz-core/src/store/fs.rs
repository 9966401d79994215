use std::path::{Path, PathBuf};
use std::time::SystemTime;
use std::{error::Error, fmt};

use chrono::{DateTime, Local};
use dataviz_store::models::{DataFile, ImageFile, PlotArtifact};
use dataviz_store::schema::{CSV_EXTENSION, IMAGE_EXTENSION};
use tracing::debug;

/// Which configured directory an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    Data,
    Output,
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => f.write_str("Data"),
            Self::Output => f.write_str("Output"),
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    DirectoryNotFound { role: DirectoryRole, path: PathBuf },
    FileNotFound { filename: String, available: Vec<String> },
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryNotFound { role, path } => {
                write!(f, "{role} directory '{}' does not exist.", path.display())
            }
            Self::FileNotFound {
                filename,
                available,
            } => write!(
                f,
                "File '{filename}' not found in data directory. Available files: {available:?}"
            ),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to the dataset directory and write access to the artifact
/// directory. Nothing is cached; every call goes to disk.
#[derive(Debug, Clone)]
pub struct DataStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl DataStore {
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Lists every regular file in the input directory, sorted by name.
    ///
    /// # Errors
    /// Returns `StoreError::DirectoryNotFound` if the input directory is
    /// missing, or `StoreError::Io` if it cannot be read.
    pub fn list_data_files(&self) -> StoreResult<Vec<DataFile>> {
        self.ensure_dir(DirectoryRole::Data)?;
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.input_dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let path = entry.path();
            files.push(DataFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: metadata.len(),
                extension: path
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy()))
                    .unwrap_or_default(),
            });
        }
        files.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(files)
    }

    /// Names of the `.csv` files in the input directory; empty when the
    /// directory is missing or unreadable.
    #[must_use]
    pub fn csv_file_names(&self) -> Vec<String> {
        self.list_data_files()
            .map(|files| {
                files
                    .into_iter()
                    .filter(|file| file.extension == format!(".{CSV_EXTENSION}"))
                    .map(|file| file.name)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves a bare file name inside the input directory.
    ///
    /// # Errors
    /// Returns `StoreError::FileNotFound`, listing the available CSV files,
    /// when the name does not refer to an existing file in the directory.
    pub fn resolve_data_file(&self, filename: &str) -> StoreResult<PathBuf> {
        let is_bare_name = Path::new(filename)
            .file_name()
            .is_some_and(|name| name == filename);
        let path = self.input_dir.join(filename);
        if is_bare_name && path.is_file() {
            debug!(path = %path.display(), "resolved data file");
            return Ok(path);
        }
        Err(StoreError::FileNotFound {
            filename: filename.to_string(),
            available: self.csv_file_names(),
        })
    }

    /// Writes a rendered artifact, replacing any file of the same name.
    ///
    /// # Errors
    /// Returns `StoreError::DirectoryNotFound` if the output directory is
    /// missing, or `StoreError::Io` if the write fails.
    pub fn write_artifact(&self, file_name: &str, bytes: &[u8]) -> StoreResult<PlotArtifact> {
        self.ensure_dir(DirectoryRole::Output)?;
        let output_path = self.output_dir.join(file_name);
        std::fs::write(&output_path, bytes)?;
        let metadata = std::fs::metadata(&output_path)?;
        debug!(path = %output_path.display(), bytes = metadata.len(), "wrote artifact");
        Ok(PlotArtifact {
            created_at: created_at(&metadata),
            size_bytes: metadata.len(),
            output_path,
        })
    }

    /// Lists rendered images, newest first.
    ///
    /// # Errors
    /// Returns `StoreError::DirectoryNotFound` if the output directory is
    /// missing, or `StoreError::Io` if it cannot be read.
    pub fn list_images(&self) -> StoreResult<Vec<ImageFile>> {
        self.ensure_dir(DirectoryRole::Output)?;
        let mut images = Vec::new();
        for entry in std::fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != IMAGE_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            images.push(ImageFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: metadata.len(),
                created_at: created_at(&metadata),
            });
        }
        images.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| left.name.cmp(&right.name))
        });
        Ok(images)
    }

    fn ensure_dir(&self, role: DirectoryRole) -> StoreResult<()> {
        let path = match role {
            DirectoryRole::Data => &self.input_dir,
            DirectoryRole::Output => &self.output_dir,
        };
        if path.is_dir() {
            Ok(())
        } else {
            Err(StoreError::DirectoryNotFound {
                role,
                path: path.clone(),
            })
        }
    }
}

/// Last write time, so an overwritten artifact counts as new. Falls back to
/// birth time where modification time is unavailable.
fn created_at(metadata: &std::fs::Metadata) -> DateTime<Local> {
    let time = metadata
        .modified()
        .or_else(|_| metadata.created())
        .unwrap_or_else(|_| SystemTime::now());
    DateTime::<Local>::from(time)
}
