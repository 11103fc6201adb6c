//! Cassette loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cassette::decoder::{decoder_for, DecodeError};
use crate::stub::{Stub, StubError};

/// Error type for cassette loading. Any of these aborts the whole load.
#[derive(Debug, Error)]
pub enum CassetteError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported cassette format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("invalid declaration #{index} in {}: {source}", .path.display())]
    Declaration {
        path: PathBuf,
        index: usize,
        #[source]
        source: StubError,
    },
}

/// Cassette files under `path`, in load order.
///
/// A file is returned as-is if its extension is known. A directory yields its
/// direct children with a known extension, sorted by file name; subdirectories
/// and other files are skipped.
pub fn cassette_files(path: &Path) -> Result<Vec<PathBuf>, CassetteError> {
    let io_error = |source| CassetteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_error)?;
    if !metadata.is_dir() {
        if decoder_for(path).is_none() {
            return Err(CassetteError::UnsupportedFormat(path.to_path_buf()));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let file_path = entry.path();
        if file_path.is_file() && decoder_for(&file_path).is_some() {
            files.push(file_path);
        } else {
            tracing::trace!(path = %file_path.display(), "Skipping non-cassette entry");
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Decode one cassette file into stubs, in document order.
pub fn read_cassette(file: &Path) -> Result<Vec<Stub>, CassetteError> {
    let decoder = decoder_for(file).ok_or_else(|| CassetteError::UnsupportedFormat(file.to_path_buf()))?;
    let content = fs::read_to_string(file).map_err(|source| CassetteError::Io {
        path: file.to_path_buf(),
        source,
    })?;

    let declarations = decoder.decode(&content).map_err(|source| CassetteError::Decode {
        path: file.to_path_buf(),
        source,
    })?;

    declarations
        .into_iter()
        .enumerate()
        .map(|(index, declaration)| {
            declaration.into_stub().map_err(|source| CassetteError::Declaration {
                path: file.to_path_buf(),
                index,
                source,
            })
        })
        .collect()
}

/// Decode every cassette under `path` (file or directory).
pub fn load_path(path: &Path) -> Result<Vec<Stub>, CassetteError> {
    let files = cassette_files(path)?;
    if files.is_empty() {
        tracing::warn!(path = %path.display(), "No cassette files found");
    }

    let mut stubs = Vec::new();
    for file in &files {
        let loaded = read_cassette(file)?;
        tracing::debug!(file = %file.display(), count = loaded.len(), "Cassette decoded");
        stubs.extend(loaded);
    }

    tracing::info!(path = %path.display(), files = files.len(), stubs = stubs.len(), "Cassettes loaded");
    Ok(stubs)
}

/// Decode the cassettes under each path, in the order given.
pub fn load_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Stub>, CassetteError> {
    let mut stubs = Vec::new();
    for path in paths {
        stubs.extend(load_path(path.as_ref())?);
    }
    Ok(stubs)
}
