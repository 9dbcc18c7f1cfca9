//! Parallel seed scans
//!
//! Every seed is an independent draw on its own copy of the pots. Records
//! are appended to a JSONL file as they complete, one whole line at a time,
//! so the file can be tailed while a scan runs and a cancelled scan leaves
//! only complete records behind.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};
use wc_core::{run_seed, Pots, ScanLine, ScanMeta, ScanSettings};

/// Seeds between progress log lines.
const PROGRESS_EVERY: usize = 1000;

/// Append-only JSONL sink shared by the scan workers.
pub struct JsonlWriter {
    file: Mutex<File>,
}

impl JsonlWriter {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open scan output: {}", path.display()))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serialise `value` and write it as one line. Serialisation happens
    /// before the lock is taken.
    pub fn append<T: Serialize>(&self, value: &T) -> Result<()> {
        let mut line = serde_json::to_string(value).context("Failed to serialise scan record")?;
        line.push('\n');
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow!("scan output lock poisoned"))?;
        file.write_all(line.as_bytes())
            .context("Failed to write scan record")?;
        Ok(())
    }
}

/// Write the `{"meta": ...}` header when `path` does not exist yet.
/// Existing files are left for appending. Returns whether a header was written.
pub fn write_header_if_new(path: &Path, meta: ScanMeta) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    JsonlWriter::open(path)?.append(&ScanLine::Meta { meta })?;
    Ok(true)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub completed: usize,
    pub succeeded: usize,
    pub cancelled: bool,
}

/// Draw every seed in `seeds` on a pool of `workers` threads. Completion
/// order is unspecified. Once `cancel` is set, seeds not yet started are
/// skipped.
pub fn run_scan(
    pots: &Pots,
    seeds: Range<u32>,
    workers: usize,
    settings: &ScanSettings,
    writer: &JsonlWriter,
    cancel: &AtomicBool,
) -> Result<ScanSummary> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .context("Failed to build scan thread pool")?;

    let total = seeds.len();
    let completed = AtomicUsize::new(0);
    let succeeded = AtomicUsize::new(0);

    pool.install(|| {
        seeds.into_par_iter().try_for_each(|seed| -> Result<()> {
            if cancel.load(Ordering::Relaxed) {
                return Ok(());
            }
            let pots = pots.clone();
            let record = run_seed(&pots, seed, settings);
            if record.success {
                succeeded.fetch_add(1, Ordering::Relaxed);
            }
            writer.append(&record)?;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_EVERY == 0 {
                info!(done, total, "scan progress");
            }
            Ok(())
        })
    })?;

    let summary = ScanSummary {
        completed: completed.into_inner(),
        succeeded: succeeded.into_inner(),
        cancelled: cancel.load(Ordering::Relaxed),
    };
    if summary.cancelled {
        warn!(completed = summary.completed, total, "scan cancelled");
    }
    Ok(summary)
}

/// Read a scan file. Blank lines and lines that do not parse (a record cut
/// off by a crash) are skipped.
pub fn read_scan(path: &Path) -> Result<Vec<ScanLine>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open scan file: {}", path.display()))?;
    let mut lines = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ScanLine>(&line) {
            Ok(parsed) => lines.push(parsed),
            Err(err) => warn!(line = index + 1, error = %err, "skipping malformed scan line"),
        }
    }
    Ok(lines)
}
