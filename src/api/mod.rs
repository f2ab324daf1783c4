use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{ConvertOptions, OutputMode};
use crate::convert::{convert, ConvertError, FileConversion};
use crate::frontend::lite;
use crate::rename::RenameTables;
use crate::stats::{SharedStatistics, Statistics};

pub use crate::convert::apply_edits;

#[cfg(test)]
mod tests;

/// Why a file could not be converted or written.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("{}: {source}", .path.display())]
    Convert {
        path: PathBuf,
        /// The text that failed, for rendering the conflict.
        text: String,
        source: ConvertError,
    },
}

impl FileError {
    pub fn path(&self) -> &Path {
        match self {
            FileError::Read { path, .. }
            | FileError::Write { path, .. }
            | FileError::Convert { path, .. } => path,
        }
    }
}

/// One converted file, not yet written anywhere.
#[derive(Clone, Debug)]
pub struct ConvertedFile {
    pub path: PathBuf,
    pub source: String,
    pub output: String,
    pub conversion: FileConversion,
}

impl ConvertedFile {
    pub fn is_unchanged(&self) -> bool {
        self.conversion.edits.is_empty()
    }
}

/// Convert CUDA source text with the built-in front-end.
pub fn convert_source(
    source: &str,
    tables: &RenameTables,
    options: &ConvertOptions,
) -> Result<FileConversion, ConvertError> {
    let file = lite::parse(source, &tables.device_functions);
    convert(&file, tables, options)
}

/// Read and convert one file.
pub fn convert_path(
    path: &Path,
    tables: &RenameTables,
    options: &ConvertOptions,
) -> Result<ConvertedFile, FileError> {
    let source = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let conversion = match convert_source(&source, tables, options) {
        Ok(c) => c,
        Err(source_err) => {
            return Err(FileError::Convert {
                path: path.to_path_buf(),
                text: source,
                source: source_err,
            })
        }
    };
    let output = conversion.apply(&source);
    info!(
        path = %path.display(),
        edits = conversion.edits.len(),
        diagnostics = conversion.diagnostics.len(),
        "converted"
    );
    Ok(ConvertedFile {
        path: path.to_path_buf(),
        source,
        output,
        conversion,
    })
}

/// Write a converted file according to `mode`. Returns the path written.
pub fn write_output(file: &ConvertedFile, mode: &OutputMode) -> Result<Option<PathBuf>, FileError> {
    let Some(target) = mode.output_path(&file.path) else {
        return Ok(None);
    };
    if let Some(backup) = mode.backup_path(&file.path) {
        fs::copy(&file.path, &backup).map_err(|source| FileError::Write {
            path: backup.clone(),
            source,
        })?;
    }
    fs::write(&target, &file.output).map_err(|source| FileError::Write {
        path: target.clone(),
        source,
    })?;
    Ok(Some(target))
}

/// Results of a batch run, in input order, plus the run-wide statistics.
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<Result<ConvertedFile, FileError>>,
    pub stats: Statistics,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }
}

/// Convert many files in parallel. Each file has its own engine state;
/// only the statistics aggregate is shared.
pub fn convert_batch(
    paths: &[PathBuf],
    tables: &RenameTables,
    options: &ConvertOptions,
) -> BatchReport {
    let shared = SharedStatistics::new();
    let results = paths
        .par_iter()
        .map(|path| {
            let result = convert_path(path, tables, options);
            match &result {
                Ok(file) => shared.add(&file.conversion.stats),
                Err(e) => {
                    warn!("{}", e);
                    shared.add(&Statistics {
                        files_failed: 1,
                        ..Statistics::default()
                    });
                }
            }
            result
        })
        .collect();
    BatchReport {
        results,
        stats: shared.into_inner(),
    }
}
