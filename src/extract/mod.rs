//! Turns raw dataset files into rows for each table of the star schema.

mod records;
mod time;

pub use records::{LogRecord, SongRecord, NEXT_SONG_PAGE};
pub use time::{format_start_time, time_row_from_millis, timestamp_from_millis};

use crate::sparkify_store::{ArtistRow, PendingSongplay, SongLookupKey, SongRow, TimeRow, UserRow};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Malformed record #{index}: {source}")]
    MalformedRecord {
        index: usize,
        source: serde_json::Error,
    },

    #[error("Record #{index} is missing required field {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Timestamp {0} ms is out of range")]
    InvalidTimestamp(i64),
}

/// Rows produced by one song metadata file.
#[derive(Debug, Default)]
pub struct SongFileRows {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
}

/// Rows produced by one event log file, in load order.
#[derive(Debug, Default)]
pub struct LogFileRows {
    pub times: Vec<TimeRow>,
    pub users: Vec<UserRow>,
    pub songplays: Vec<PendingSongplay>,
    /// Records dropped because their page is not `NextSong`.
    pub skipped: usize,
}

/// Parse every JSON value in `text`, whether one per line or concatenated.
/// Records are numbered from 1.
pub fn read_records<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ExtractError> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<T>()
        .enumerate()
        .map(|(i, record)| {
            record.map_err(|source| ExtractError::MalformedRecord {
                index: i + 1,
                source,
            })
        })
        .collect()
}

pub fn extract_song_rows(text: &str) -> Result<SongFileRows, ExtractError> {
    let records: Vec<SongRecord> = read_records(text)?;
    let mut rows = SongFileRows::default();
    for record in records {
        rows.songs.push(SongRow {
            song_id: record.song_id,
            title: record.title,
            artist_id: Some(record.artist_id.clone()),
            year: record.year,
            duration: record.duration,
        });
        rows.artists.push(ArtistRow {
            artist_id: record.artist_id,
            name: record.artist_name,
            location: record.artist_location,
            latitude: record.artist_latitude,
            longitude: record.artist_longitude,
        });
    }
    Ok(rows)
}

pub fn extract_log_rows(text: &str) -> Result<LogFileRows, ExtractError> {
    let records: Vec<LogRecord> = read_records(text)?;
    let mut rows = LogFileRows::default();
    for (i, record) in records.into_iter().enumerate() {
        if !record.is_next_song() {
            rows.skipped += 1;
            continue;
        }
        let index = i + 1;
        let ts = record.ts.ok_or(ExtractError::MissingField { index, field: "ts" })?;
        let user_id = record
            .user_id
            .ok_or(ExtractError::MissingField { index, field: "userId" })?;

        let time_row = time_row_from_millis(ts)?;
        rows.songplays.push(PendingSongplay {
            start_time: time_row.start_time.clone(),
            user_id,
            level: record.level.clone(),
            session_id: record.session_id,
            location: record.location,
            user_agent: record.user_agent,
            lookup: SongLookupKey {
                title: record.song,
                artist_name: record.artist,
                duration: record.length,
            },
        });
        rows.users.push(UserRow {
            user_id,
            first_name: record.first_name,
            last_name: record.last_name,
            gender: record.gender,
            level: record.level,
        });
        rows.times.push(time_row);
    }
    Ok(rows)
}
