//! Directory-level cleaning

use crate::cleaner::Cleaner;
use crate::error::CleanerError;
use phasemine_domain::Document;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of cleaning one file
#[derive(Debug, Clone)]
pub struct CleanedFile {
    /// File name, identical in input and output directories
    pub file_name: String,

    /// Size of the raw text in bytes
    pub bytes_in: usize,

    /// Size of the cleaned text in bytes
    pub bytes_out: usize,
}

/// Outcome of a directory run
#[derive(Debug, Clone, Default)]
pub struct CleanSummary {
    /// Files cleaned and written
    pub cleaned: Vec<CleanedFile>,

    /// Files that disappeared or could not be read
    pub skipped: Vec<String>,
}

/// List the documents in `dir` carrying `extension`, sorted by file name
pub fn list_documents(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == extension))
        .collect();
    paths.sort();
    Ok(paths)
}

impl Cleaner {
    /// Clean every document in `input_dir` into `output_dir`
    ///
    /// Output files keep their input name. A file that vanished or cannot be
    /// decoded is skipped with a warning; failing to write output is an error.
    pub fn clean_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<CleanSummary, CleanerError> {
        fs::create_dir_all(output_dir)?;

        let paths = list_documents(input_dir, &self.config().extension)?;
        info!(
            "Cleaning {} document(s) from {} into {}",
            paths.len(),
            input_dir.display(),
            output_dir.display()
        );

        let mut summary = CleanSummary::default();
        for path in paths {
            let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };

            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    summary.skipped.push(file_name);
                    continue;
                }
            };

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.clone());
            let cleaned = self.clean(&Document::new(stem, raw.as_str()));

            fs::write(output_dir.join(&file_name), &cleaned.text)?;
            info!("Cleaned {} ({} -> {} bytes)", file_name, raw.len(), cleaned.text.len());

            summary.cleaned.push(CleanedFile {
                file_name,
                bytes_in: raw.len(),
                bytes_out: cleaned.text.len(),
            });
        }

        Ok(summary)
    }
}
