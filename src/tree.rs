use crate::codec::{ImagePayload, JpegCodec};
use crate::constants::{ELIGIBLE_EXTENSIONS, MAX_QUALITY, MAX_TRAVERSAL_DEPTH, OUTPUT_PREFIX};
use crate::error::{CompressionError, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one file attempt. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Written(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CompressionRecord {
    source: PathBuf,
    outcome: RecordOutcome,
}

impl CompressionRecord {
    fn written(source: PathBuf, output: PathBuf) -> Self {
        Self {
            source,
            outcome: RecordOutcome::Written(output),
        }
    }

    fn failed(source: PathBuf, detail: String) -> Self {
        Self {
            source,
            outcome: RecordOutcome::Failed(detail),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn outcome(&self) -> &RecordOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RecordOutcome::Written(_))
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.outcome {
            RecordOutcome::Written(path) => Some(path),
            RecordOutcome::Failed(_) => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match &self.outcome {
            RecordOutcome::Written(_) => None,
            RecordOutcome::Failed(detail) => Some(detail),
        }
    }
}

/// Ordered outcome list for one traversal invocation.
#[derive(Debug, Default)]
pub struct CompressionReport {
    records: Vec<CompressionRecord>,
}

impl CompressionReport {
    fn push(&mut self, record: CompressionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CompressionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Output paths of the successful records, in traversal order.
    pub fn outputs(&self) -> Vec<&Path> {
        self.records
            .iter()
            .filter_map(CompressionRecord::output_path)
            .collect()
    }

    /// `(source, error detail)` pairs for the failed records.
    pub fn failures(&self) -> Vec<(&Path, &str)> {
        self.records
            .iter()
            .filter_map(|r| r.error_detail().map(|d| (r.source(), d)))
            .collect()
    }
}

/// Whether a file's extension is in the supported readable set.
pub fn is_eligible_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| ELIGIBLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Destination path for a source filename: same directory level under the
/// destination root, marker prepended, extension left untouched.
pub fn mirrored_output_path(dest_dir: &Path, file_name: &OsStr) -> PathBuf {
    let mut name = OsString::from(OUTPUT_PREFIX);
    name.push(file_name);
    dest_dir.join(name)
}

/// Walks `source_root`, re-encodes every eligible file at `quality`, and
/// mirrors results under `dest_root`.
///
/// Per-file failures are recorded and traversal continues; only a missing
/// source root or an out-of-range quality fails the whole invocation. Each
/// directory level is fully processed before its subdirectories are entered,
/// and children are visited in name order so the report is reproducible.
pub fn compress_tree(
    codec: &JpegCodec,
    source_root: &Path,
    dest_root: &Path,
    quality: u8,
) -> Result<CompressionReport> {
    if quality > MAX_QUALITY {
        return Err(CompressionError::InvalidQuality(quality));
    }
    if !source_root.is_dir() {
        return Err(CompressionError::SourceNotFound(source_root.to_path_buf()));
    }

    let mut report = CompressionReport::default();
    compress_level(codec, source_root, dest_root, quality, 0, &mut report);
    Ok(report)
}

fn compress_level(
    codec: &JpegCodec,
    dir: &Path,
    dest_dir: &Path,
    quality: u8,
    depth: usize,
    report: &mut CompressionReport,
) {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!("pruning {} at traversal depth {}", dir.display(), depth);
        report.push(CompressionRecord::failed(
            dir.to_path_buf(),
            format!("maximum traversal depth ({MAX_TRAVERSAL_DEPTH}) reached, directory skipped"),
        ));
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            let err = CompressionError::Io {
                path: dir.to_path_buf(),
                source,
            };
            report.push(CompressionRecord::failed(dir.to_path_buf(), err.to_string()));
            return;
        }
    };

    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let err = CompressionError::Io {
                    path: dir.to_path_buf(),
                    source,
                };
                report.push(CompressionRecord::failed(dir.to_path_buf(), err.to_string()));
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if is_eligible_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    subdirs.sort();

    // Files of the current level first, then descend.
    for file in files {
        match compress_file(codec, &file, dest_dir, quality) {
            Ok(output) => {
                tracing::info!("compressed image saved to {}", output.display());
                report.push(CompressionRecord::written(file, output));
            }
            Err(err) => {
                tracing::warn!("failed to compress {}: {err}", file.display());
                report.push(CompressionRecord::failed(file, err.to_string()));
            }
        }
    }

    for subdir in subdirs {
        let mirrored = match subdir.file_name() {
            Some(name) => dest_dir.join(name),
            None => continue,
        };
        compress_level(codec, &subdir, &mirrored, quality, depth + 1, report);
    }
}

/// Read one file, re-encode it, and write the result into `dest_dir`.
///
/// The byte buffers live only for this call, so peak memory stays bounded to
/// one image regardless of tree size.
fn compress_file(
    codec: &JpegCodec,
    source: &Path,
    dest_dir: &Path,
    quality: u8,
) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| CompressionError::InvalidFileName(source.display().to_string()))?;

    fs::create_dir_all(dest_dir)
        .map_err(|_| CompressionError::DirectoryCreationFailed(dest_dir.to_path_buf()))?;

    let bytes = fs::read(source).map_err(|err| CompressionError::Io {
        path: source.to_path_buf(),
        source: err,
    })?;

    let payload = ImagePayload::new(bytes, source.to_path_buf());
    let encoded = codec.compress(payload, quality)?;

    let output = mirrored_output_path(dest_dir, file_name);
    fs::write(&output, &encoded).map_err(|err| CompressionError::Io {
        path: output.clone(),
        source: err,
    })?;

    Ok(output)
}
