//! Dataset fixtures written into a temporary directory.

use super::constants::*;
use anyhow::Result;
use sparkify_etl::{EtlConfig, SchemaRegistry, SqliteSparkifyStore};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn song_record(
    song_id: &str,
    title: &str,
    duration: f64,
    artist_id: &str,
    artist_name: &str,
) -> String {
    serde_json::json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 0,
    })
    .to_string()
}

/// One event log line. `song` is `(title, artist name, length)`.
pub fn log_event(
    page: &str,
    ts: i64,
    user_id: i64,
    first_name: &str,
    level: &str,
    song: Option<(&str, &str, f64)>,
) -> String {
    let (title, artist, length) = match song {
        Some((title, artist, length)) => (
            serde_json::json!(title),
            serde_json::json!(artist),
            serde_json::json!(length),
        ),
        None => (
            serde_json::Value::Null,
            serde_json::Value::Null,
            serde_json::Value::Null,
        ),
    };
    serde_json::json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": first_name,
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Kirby",
        "length": length,
        "level": level,
        "location": "Chicago-Naperville-Elgin, IL-IN-WI",
        "method": "PUT",
        "page": page,
        "registration": 1540052464796.0_f64,
        "sessionId": 585,
        "song": title,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (Windows NT 6.1; WOW64)",
        "userId": user_id.to_string(),
    })
    .to_string()
}

/// A song_data/log_data tree plus a database path, all under one temp dir.
pub struct TestDataset {
    pub dir: TempDir,
}

impl TestDataset {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("song_data"))?;
        fs::create_dir_all(dir.path().join("log_data"))?;
        Ok(Self { dir })
    }

    /// Two songs by two artists, one file each, nested like the real dataset,
    /// and one log file: a NextSong play of song 1 between two other pages.
    pub fn standard() -> Result<Self> {
        let dataset = Self::new()?;
        dataset.write_song_file(
            "A/A/A/TRAAAAW128F429D538.json",
            &[song_record(
                SONG_1_ID,
                SONG_1_TITLE,
                SONG_1_DURATION,
                ARTIST_1_ID,
                ARTIST_1_NAME,
            )],
        )?;
        dataset.write_song_file(
            "A/B/C/TRABCEI128F424C983.json",
            &[song_record(
                SONG_2_ID,
                SONG_2_TITLE,
                SONG_2_DURATION,
                ARTIST_2_ID,
                ARTIST_2_NAME,
            )],
        )?;
        dataset.write_log_file(
            "2018/11/2018-11-06-events.json",
            &[
                log_event("Home", PLAY_TS - 60_000, USER_ID, USER_FIRST_NAME, "free", None),
                log_event(
                    "NextSong",
                    PLAY_TS,
                    USER_ID,
                    USER_FIRST_NAME,
                    "free",
                    Some((SONG_1_TITLE, ARTIST_1_NAME, SONG_1_DURATION)),
                ),
                log_event("Logout", PLAY_TS + 60_000, USER_ID, USER_FIRST_NAME, "free", None),
            ],
        )?;
        Ok(dataset)
    }

    fn write_lines(root: &Path, relative: &str, lines: &[String]) -> Result<PathBuf> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, lines.join("\n"))?;
        Ok(path)
    }

    pub fn write_song_file(&self, relative: &str, lines: &[String]) -> Result<PathBuf> {
        Self::write_lines(&self.song_data_path(), relative, lines)
    }

    pub fn write_log_file(&self, relative: &str, lines: &[String]) -> Result<PathBuf> {
        Self::write_lines(&self.log_data_path(), relative, lines)
    }

    pub fn song_data_path(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_data_path(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("sparkifydb.sqlite")
    }

    pub fn config(&self) -> EtlConfig {
        EtlConfig {
            song_data_path: self.song_data_path(),
            log_data_path: self.log_data_path(),
            db_path: self.db_path(),
            reset: false,
        }
    }

    pub fn open_store(&self) -> Result<SqliteSparkifyStore> {
        SqliteSparkifyStore::new(self.db_path(), SchemaRegistry::sparkify())
    }
}
