use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, warn};
use triad_model::RequestLogEntry;

use crate::error::JournalError;

/// Append-only record of the requests a tier has received.
///
/// The file holds a single pretty-printed JSON array. Every append reads the
/// array, pushes the new entry and replaces the file through a fsynced sibling
/// temp file, so a reader sees either the old or the new document.
/// Appends within one process are serialized by an internal lock.
#[derive(Debug)]
pub struct RequestLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry stamped with the current time.
    ///
    /// A log that exists but does not decode is left untouched and the call
    /// fails with [`JournalError::Decode`].
    pub async fn record(
        &self,
        endpoint: &str,
        action: &str,
    ) -> Result<RequestLogEntry, JournalError> {
        let _guard = self.lock.lock().await;

        let mut entries = read_entries(&self.path).await?;
        let entry = RequestLogEntry::new(endpoint, action, timestamp()?);
        entries.push(entry.clone());
        write_entries(&self.path, &entries).await?;

        debug!(
            endpoint,
            action,
            total = entries.len(),
            "request recorded"
        );
        Ok(entry)
    }

    /// Like [`record`](Self::record), but a failure is only logged.
    ///
    /// Request handlers use this: a broken log must never fail the request.
    pub async fn record_or_warn(&self, endpoint: &str, action: &str) {
        if let Err(e) = self.record(endpoint, action).await {
            warn!(endpoint, action, error = %e, "request log write failed; entry skipped");
        }
    }

    /// Everything recorded so far, oldest first.
    pub async fn entries(&self) -> Result<Vec<RequestLogEntry>, JournalError> {
        let _guard = self.lock.lock().await;
        read_entries(&self.path).await
    }
}

async fn read_entries(path: &Path) -> Result<Vec<RequestLogEntry>, JournalError> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(JournalError::io(path, e)),
    };
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&data).map_err(|source| JournalError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_entries(path: &Path, entries: &[RequestLogEntry]) -> Result<(), JournalError> {
    let mut data = serde_json::to_vec_pretty(entries).map_err(JournalError::Encode)?;
    data.push(b'\n');

    let tmp = tmp_path(path);
    if let Err(e) = replace_with(&tmp, path, &data).await {
        match fs::remove_file(&tmp).await {
            Ok(()) => {}
            Err(rm) if rm.kind() == ErrorKind::NotFound => {}
            Err(rm) => warn!(tmp = %tmp.display(), error = %rm, "stale temp log left behind"),
        }
        return Err(e);
    }
    sync_parent(path).await
}

async fn replace_with(tmp: &Path, path: &Path, data: &[u8]) -> Result<(), JournalError> {
    let mut file = fs::File::create(tmp)
        .await
        .map_err(|e| JournalError::io(tmp, e))?;
    file.write_all(data)
        .await
        .map_err(|e| JournalError::io(tmp, e))?;
    file.sync_all()
        .await
        .map_err(|e| JournalError::io(tmp, e))?;
    drop(file);

    fs::rename(tmp, path)
        .await
        .map_err(|e| JournalError::io(path, e))
}

/// Persist the rename itself.
#[cfg(unix)]
async fn sync_parent(path: &Path) -> Result<(), JournalError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let handle = fs::File::open(dir)
        .await
        .map_err(|e| JournalError::io(dir, e))?;
    handle
        .sync_all()
        .await
        .map_err(|e| JournalError::io(dir, e))
}

#[cfg(not(unix))]
async fn sync_parent(_path: &Path) -> Result<(), JournalError> {
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("requests_log.json"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn timestamp() -> Result<String, JournalError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let now = now.replace_nanosecond(0).unwrap_or(now);
    now.format(&Rfc3339)
        .map_err(|e| JournalError::Timestamp(e.to_string()))
}
