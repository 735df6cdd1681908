//! Applies extracted rows to a [`SparkifyStore`].
//!
//! Nothing is retried or skipped here: the first storage error aborts the
//! file and is handed back to the caller.

use crate::extract::{extract_log_rows, extract_song_rows, LogFileRows, SongFileRows};
use crate::sparkify_store::SparkifyStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// What a single file contributed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub songs: usize,
    pub artists: usize,
    pub times: usize,
    pub users: usize,
    pub songplays: usize,
    /// Songplays inserted without a matching song.
    pub unresolved_songplays: usize,
    /// Log records that were not `NextSong` events.
    pub skipped_events: usize,
}

pub type FileLoader = fn(&dyn SparkifyStore, &Path) -> Result<LoadStats>;

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

pub fn load_song_file(store: &dyn SparkifyStore, path: &Path) -> Result<LoadStats> {
    let text = read_file(path)?;
    let rows =
        extract_song_rows(&text).with_context(|| format!("Invalid song file {:?}", path))?;
    let stats = apply_song_rows(store, &rows)?;
    debug!("{:?}: {:?}", path, stats);
    Ok(stats)
}

pub fn load_log_file(store: &dyn SparkifyStore, path: &Path) -> Result<LoadStats> {
    let text = read_file(path)?;
    let rows =
        extract_log_rows(&text).with_context(|| format!("Invalid log file {:?}", path))?;
    let stats = apply_log_rows(store, rows)?;
    debug!("{:?}: {:?}", path, stats);
    Ok(stats)
}

pub fn apply_song_rows(store: &dyn SparkifyStore, rows: &SongFileRows) -> Result<LoadStats> {
    for song in &rows.songs {
        store.upsert_song(song)?;
    }
    for artist in &rows.artists {
        store.upsert_artist(artist)?;
    }
    Ok(LoadStats {
        songs: rows.songs.len(),
        artists: rows.artists.len(),
        ..Default::default()
    })
}

/// Time rows first, then users, then songplays. Each songplay runs its own
/// song lookup.
pub fn apply_log_rows(store: &dyn SparkifyStore, rows: LogFileRows) -> Result<LoadStats> {
    let mut stats = LoadStats {
        times: rows.times.len(),
        users: rows.users.len(),
        skipped_events: rows.skipped,
        ..Default::default()
    };

    for time in &rows.times {
        store.insert_time(time)?;
    }
    for user in &rows.users {
        store.upsert_user(user)?;
    }
    for pending in rows.songplays {
        let song_match = store.find_song(&pending.lookup)?;
        if song_match.is_none() {
            stats.unresolved_songplays += 1;
        }
        store.insert_songplay(&pending.resolve(song_match))?;
        stats.songplays += 1;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparkify_store::{SchemaRegistry, SqliteSparkifyStore};
    use std::fs;
    use tempfile::TempDir;

    const SONG: &str = r#"{"num_songs": 1, "artist_id": "AR8IEZO1187B99055E", "artist_latitude": null, "artist_longitude": null, "artist_location": "", "artist_name": "Marc Shaiman", "song_id": "SOINLJW12A8C13314C", "title": "City Slickers", "duration": 149.86404, "year": 2008}"#;

    fn play(song: &str, artist: &str, length: f64, ts: i64, level: &str) -> String {
        format!(
            r#"{{"artist":"{artist}","firstName":"Jacqueline","gender":"F","lastName":"Lynch","length":{length},"level":"{level}","location":"Atlanta-Sandy Springs-Roswell, GA","page":"NextSong","sessionId":389,"song":"{song}","ts":{ts},"userAgent":"Mozilla\/5.0","userId":"29"}}"#
        )
    }

    fn store() -> SqliteSparkifyStore {
        SqliteSparkifyStore::in_memory(SchemaRegistry::sparkify()).unwrap()
    }

    #[test]
    fn test_load_song_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.json");
        fs::write(&path, SONG).unwrap();

        let store = store();
        let stats = load_song_file(&store, &path).unwrap();
        assert_eq!(stats.songs, 1);
        assert_eq!(stats.artists, 1);
        let counts = store.get_counts().unwrap();
        assert_eq!(counts.songs, 1);
        assert_eq!(counts.artists, 1);
    }

    #[test]
    fn test_songplay_resolves_matching_song() {
        let store = store();
        apply_song_rows(&store, &extract_song_rows(SONG).unwrap()).unwrap();

        let log = play("City Slickers", "Marc Shaiman", 149.86404, 1542837407796, "paid");
        let stats = apply_log_rows(&store, extract_log_rows(&log).unwrap()).unwrap();
        assert_eq!(stats.songplays, 1);
        assert_eq!(stats.unresolved_songplays, 0);

        let match_key = crate::sparkify_store::SongLookupKey {
            title: Some("City Slickers".to_string()),
            artist_name: Some("Marc Shaiman".to_string()),
            duration: Some(149.86404),
        };
        assert!(store.find_song(&match_key).unwrap().is_some());
    }

    #[test]
    fn test_unresolved_songplay_is_still_inserted() {
        let store = store();
        let log = play("Unknown Song", "Nobody", 120.5, 1542837407796, "free");
        let stats = apply_log_rows(&store, extract_log_rows(&log).unwrap()).unwrap();
        assert_eq!(stats.songplays, 1);
        assert_eq!(stats.unresolved_songplays, 1);
        assert_eq!(store.get_counts().unwrap().songplays, 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store();
        let result = load_log_file(&store, &dir.path().join("missing.json"));
        assert!(result.is_err());
    }

    #[cfg(feature = "mock")]
    mod mocked {
        use super::*;
        use crate::sparkify_store::{MockSparkifyStore, SongMatch};
        use mockall::{predicate::always, Sequence};

        #[test]
        fn test_log_rows_are_applied_in_order() {
            let log = play("City Slickers", "Marc Shaiman", 149.86404, 1542837407796, "paid");
            let rows = extract_log_rows(&log).unwrap();

            let mut seq = Sequence::new();
            let mut store = MockSparkifyStore::new();
            store
                .expect_insert_time()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
            store
                .expect_upsert_user()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
            store
                .expect_find_song()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| {
                    Ok(Some(SongMatch {
                        song_id: "SOINLJW12A8C13314C".to_string(),
                        artist_id: "AR8IEZO1187B99055E".to_string(),
                    }))
                });
            store
                .expect_insert_songplay()
                .withf(|row| {
                    row.song_id.as_deref() == Some("SOINLJW12A8C13314C")
                        && row.artist_id.as_deref() == Some("AR8IEZO1187B99055E")
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(1));

            apply_log_rows(&store, rows).unwrap();
        }

        #[test]
        fn test_every_songplay_runs_its_own_lookup() {
            let log = [
                play("City Slickers", "Marc Shaiman", 149.86404, 1542837407796, "paid"),
                play("City Slickers", "Marc Shaiman", 149.86404, 1542837408796, "paid"),
            ]
            .join("\n");
            let rows = extract_log_rows(&log).unwrap();

            let mut store = MockSparkifyStore::new();
            store.expect_insert_time().returning(|_| Ok(()));
            store.expect_upsert_user().returning(|_| Ok(()));
            store
                .expect_find_song()
                .with(always())
                .times(2)
                .returning(|_| Ok(None));
            store
                .expect_insert_songplay()
                .withf(|row| row.song_id.is_none() && row.artist_id.is_none())
                .times(2)
                .returning(|_| Ok(1));

            let stats = apply_log_rows(&store, rows).unwrap();
            assert_eq!(stats.unresolved_songplays, 2);
        }

        #[test]
        fn test_storage_error_stops_the_file() {
            let log = play("City Slickers", "Marc Shaiman", 149.86404, 1542837407796, "paid");
            let rows = extract_log_rows(&log).unwrap();

            let mut store = MockSparkifyStore::new();
            store
                .expect_insert_time()
                .returning(|_| Err(anyhow::anyhow!("disk I/O error")));
            store.expect_upsert_user().never();
            store.expect_insert_songplay().never();

            assert!(apply_log_rows(&store, rows).is_err());
        }
    }
}
