use console::style;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::s3::{ObjectStore, PutObject, S3Error, detect_content_type};

/// Errors that abort a sync. Every one of them is fatal; nothing is retried.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Sync root does not exist or is not a directory: {}", path.display())]
    MissingRoot { path: PathBuf },

    #[error("Failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{} is not under sync root {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{} has a name that is not valid UTF-8 and cannot be used as a key", path.display())]
    InvalidKey { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to upload '{key}': {source}")]
    Upload {
        key: String,
        #[source]
        source: S3Error,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    pub bytes: u64,
}

/// Mirror every visible regular file under `root` into `bucket` as a public-read object.
///
/// Files are uploaded one at a time in walk order (sorted by name within each
/// directory). The first read or upload failure stops the walk; files already
/// uploaded stay in the bucket and later files are never attempted.
pub async fn sync_dir(
    store: &dyn ObjectStore,
    root: &Path,
    bucket: &str,
    pb: Option<&ProgressBar>,
) -> Result<SyncReport, SyncError> {
    if !root.is_dir() {
        return Err(SyncError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let mut report = SyncReport::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !should_upload(&entry) {
            continue;
        }

        let local_path = entry.path();
        let key = object_key(root, local_path)?;
        let content_type = detect_content_type(local_path);

        let line = format!(
            "{} -> {} {} {}",
            local_path.display(),
            style(&key).cyan(),
            content_type.mime.as_deref().unwrap_or("None"),
            content_type.encoding.unwrap_or("None"),
        );
        match pb {
            Some(pb) => {
                pb.set_message(key.clone());
                pb.println(line);
            }
            None => println!("{}", line),
        }

        let body = tokio::fs::read(local_path)
            .await
            .map_err(|source| SyncError::Read {
                path: local_path.to_path_buf(),
                source,
            })?;
        let size = body.len() as u64;

        store
            .put_object(PutObject {
                bucket: bucket.to_string(),
                key: key.clone(),
                body,
                content_type: content_type.mime_or_default().to_string(),
                public_read: true,
            })
            .await
            .map_err(|source| SyncError::Upload {
                key: key.clone(),
                source,
            })?;

        debug!("uploaded {} ({} bytes)", key, size);
        report.uploaded += 1;
        report.bytes += size;
        if let Some(pb) = pb {
            pb.inc(1);
        }
    }

    info!(
        "Synced {} file(s), {} bytes to {}",
        report.uploaded, report.bytes, bucket
    );
    Ok(report)
}

/// Hidden names (leading `.`) and anything that is not a regular file are skipped.
///
/// Only the entry's own name counts: files inside a hidden directory are
/// still uploaded. Symlinks are judged by their target.
fn should_upload(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    if entry.file_name().to_string_lossy().starts_with('.') {
        return false;
    }

    if entry.path_is_symlink() {
        entry.path().is_file()
    } else {
        entry.file_type().is_file()
    }
}

/// Object key for `path`: its path relative to `root`, joined with `/`.
///
/// Every component must be valid UTF-8; a lossy conversion could map two
/// local files onto one key.
pub fn object_key(root: &Path, path: &Path) -> Result<String, SyncError> {
    let outside = || SyncError::OutsideRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };

    let relative = path.strip_prefix(root).map_err(|_| outside())?;
    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| SyncError::InvalidKey {
                path: path.to_path_buf(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if parts.is_empty() {
        return Err(outside());
    }
    Ok(parts.join("/"))
}
