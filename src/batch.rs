//! Walks a dataset directory and loads it one file at a time.

use crate::config::EtlConfig;
use crate::loader::{load_log_file, load_song_file, FileLoader, LoadStats};
use crate::sparkify_store::{SparkifyStore, TableCounts};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const DATA_FILE_EXTENSION: &str = "json";

/// Every `.json` file below `root`, as absolute paths.
///
/// The order is whatever the filesystem yields.
pub fn find_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("{} is not a valid directory.", root.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_json = entry
            .path()
            .extension()
            .map(|ext| ext == DATA_FILE_EXTENSION)
            .unwrap_or(false);
        if is_json {
            let path = std::path::absolute(entry.path())
                .with_context(|| format!("Failed to resolve {}", entry.path().display()))?;
            files.push(path);
        }
    }
    Ok(files)
}

/// Load every data file under `root` with `loader`, one transaction per file.
///
/// Returns the totals over all files.
pub fn process_data(
    store: &dyn SparkifyStore,
    root: &Path,
    loader: FileLoader,
) -> Result<ProcessedData> {
    let files = find_json_files(root)?;
    let num_files = files.len();
    println!("{} files found in {}", num_files, root.display());

    let mut totals = ProcessedData::default();
    for (i, file) in files.iter().enumerate() {
        store.begin_batch()?;
        let stats = loader(store, file).with_context(|| format!("Failed to load {:?}", file))?;
        store.commit_batch()?;
        totals.add(&stats);
        println!("{}/{} files processed.", i + 1, num_files);
    }
    debug!("Done with {}: {:?}", root.display(), totals);
    Ok(totals)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedData {
    pub files: usize,
    pub songs: usize,
    pub artists: usize,
    pub times: usize,
    pub users: usize,
    pub songplays: usize,
    pub unresolved_songplays: usize,
    pub skipped_events: usize,
}

impl ProcessedData {
    fn add(&mut self, stats: &LoadStats) {
        self.files += 1;
        self.songs += stats.songs;
        self.artists += stats.artists;
        self.times += stats.times;
        self.users += stats.users;
        self.songplays += stats.songplays;
        self.unresolved_songplays += stats.unresolved_songplays;
        self.skipped_events += stats.skipped_events;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub song_data: ProcessedData,
    pub log_data: ProcessedData,
    pub table_counts: TableCounts,
}

/// Load the song dataset, then the log dataset.
///
/// Songs go first since songplays look up songs and artists.
pub fn run(store: &dyn SparkifyStore, config: &EtlConfig) -> Result<RunSummary> {
    info!("Loading song data from {}", config.song_data_path.display());
    let song_data = process_data(store, &config.song_data_path, load_song_file)?;

    info!("Loading log data from {}", config.log_data_path.display());
    let log_data = process_data(store, &config.log_data_path, load_log_file)?;

    let table_counts = store.get_counts()?;
    info!(
        "Loaded {} song files and {} log files ({} songplays without a matching song)",
        song_data.files, log_data.files, log_data.unresolved_songplays
    );
    Ok(RunSummary {
        song_data,
        log_data,
        table_counts,
    })
}
