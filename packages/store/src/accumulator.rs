//! Appends to the JSON array dataset file.

use std::ffi::OsString;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt as _, AsyncSeekExt as _, AsyncWriteExt as _};
use trip_dataset_models::TripRecord;

use crate::StoreError;

/// Number of trailing bytes inspected before falling back to reading the
/// whole file when locating the closing bracket.
const TAIL_WINDOW: u64 = 4096;

/// Separator between two entries of the array.
const ENTRY_SEPARATOR: &str = ",\n  ";

/// What [`append_trips`] did to the dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The file was written from scratch (it did not exist or held `[]`).
    Created,
    /// Entries were spliced in front of the existing closing bracket.
    Extended,
    /// Nothing to write.
    Skipped,
}

/// Where the existing array ends.
#[derive(Debug, PartialEq, Eq)]
enum Tail {
    /// Keep the first `keep` bytes (everything through the last entry).
    Extend { keep: u64 },
    /// The file holds an array with no entries.
    Empty,
    /// The file does not end in `]` after a value or `[`.
    Malformed,
}

/// Appends `trips` to the JSON array file at `path`.
///
/// A missing file is created as `[\n  <trip>,\n  <trip>\n]\n`. An existing
/// file has its closing bracket (and the whitespace around it) cut off and
/// the new entries plus a fresh `\n]\n` appended.
///
/// The new content is built in a staging file next to `path` and renamed
/// over it, so `path` is either left as it was or replaced by a valid
/// array. A failed write never leaves it without its closing bracket.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or written, a trip
/// cannot be serialized, or the existing content is not a JSON array.
pub async fn append_trips(
    path: &Path,
    trips: &[TripRecord],
) -> Result<AppendOutcome, StoreError> {
    if trips.is_empty() {
        return Ok(AppendOutcome::Skipped);
    }

    let entries = trips
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?
        .join(ENTRY_SEPARATOR);

    let staging = staging_path(path);
    let staged = match stage(path, &staging, &entries).await {
        Ok(outcome) => outcome,
        Err(e) => {
            discard(&staging).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&staging, path).await {
        discard(&staging).await;
        return Err(io_error(path)(e));
    }

    Ok(staged)
}

/// Writes the appended dataset to `staging`, leaving `path` untouched.
async fn stage(path: &Path, staging: &Path, entries: &str) -> Result<AppendOutcome, StoreError> {
    if !tokio::fs::try_exists(path).await.map_err(io_error(path))? {
        write_fresh(staging, entries).await.map_err(io_error(staging))?;
        return Ok(AppendOutcome::Created);
    }
    tokio::fs::copy(path, staging)
        .await
        .map_err(io_error(staging))?;

    let io_err = io_error(staging);
    let mut file = tokio::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(staging)
        .await
        .map_err(&io_err)?;

    let len = file.metadata().await.map_err(&io_err)?.len();
    let mut window = TAIL_WINDOW.min(len);

    let tail = loop {
        let offset = len - window;
        file.seek(SeekFrom::Start(offset)).await.map_err(&io_err)?;

        #[allow(clippy::cast_possible_truncation)]
        let mut buf = vec![0u8; window as usize];
        file.read_exact(&mut buf).await.map_err(&io_err)?;

        match scan_tail(&buf, offset) {
            Some(tail) => break tail,
            None if window == len => break Tail::Malformed,
            None => window = len,
        }
    };

    match tail {
        Tail::Malformed => Err(StoreError::Malformed {
            path: path.display().to_string(),
        }),
        Tail::Empty => {
            drop(file);
            write_fresh(staging, entries).await.map_err(&io_err)?;
            Ok(AppendOutcome::Created)
        }
        Tail::Extend { keep } => {
            file.set_len(keep).await.map_err(&io_err)?;
            file.seek(SeekFrom::Start(keep)).await.map_err(&io_err)?;
            file.write_all(format!("{ENTRY_SEPARATOR}{entries}\n]\n").as_bytes())
                .await
                .map_err(&io_err)?;
            file.sync_all().await.map_err(&io_err)?;
            Ok(AppendOutcome::Extended)
        }
    }
}

async fn write_fresh(path: &Path, entries: &str) -> std::io::Result<()> {
    tokio::fs::write(path, format!("[\n  {entries}\n]\n")).await
}

/// `trips.json` is staged as `trips.json.tmp` in the same directory, so
/// the final rename never crosses filesystems.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn discard(staging: &Path) {
    match tokio::fs::remove_file(staging).await {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            log::warn!("Failed to remove staging file {}: {e}", staging.display());
        }
        _ => {}
    }
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Locates the closing bracket in the last bytes of the file.
///
/// `offset` is the position of `tail[0]` in the file. Returns `None` when
/// the window does not reach far enough back to decide.
fn scan_tail(tail: &[u8], offset: u64) -> Option<Tail> {
    let close = tail.iter().rposition(|b| !b.is_ascii_whitespace())?;
    if tail[close] != b']' {
        return Some(Tail::Malformed);
    }

    let last = tail[..close]
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())?;

    if tail[last] == b'[' {
        Some(Tail::Empty)
    } else {
        Some(Tail::Extend {
            keep: offset + last as u64 + 1,
        })
    }
}
