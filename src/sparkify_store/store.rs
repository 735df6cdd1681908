//! SQLite-backed implementation of [`SparkifyStore`].

use super::models::*;
use super::schema::SchemaRegistry;
use super::trait_def::SparkifyStore;
use anyhow::{anyhow, Context, Result};
use rusqlite::{named_params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// The single connection to the Sparkify database.
///
/// The mutex never sees contention, the pipeline is strictly sequential. It
/// only makes the store `Sync`.
pub struct SqliteSparkifyStore {
    conn: Mutex<Connection>,
    registry: SchemaRegistry,
}

impl SqliteSparkifyStore {
    /// Open (or create) the database at `db_path` and make sure every table
    /// of `registry` exists.
    pub fn new<P: AsRef<Path>>(db_path: P, registry: SchemaRegistry) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open sparkify database at {:?}", db_path))?;

        let store = Self::from_connection(conn, registry)?;
        let counts = store.get_counts()?;
        info!(
            "Opened sparkify database: {} songs, {} artists, {} users, {} time rows, {} songplays",
            counts.songs, counts.artists, counts.users, counts.time, counts.songplays
        );
        Ok(store)
    }

    pub fn in_memory(registry: SchemaRegistry) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, registry)
    }

    fn from_connection(conn: Connection, registry: SchemaRegistry) -> Result<Self> {
        registry.schema.create(&conn)?;
        registry
            .schema
            .validate(&conn)
            .context("Sparkify database does not match the expected schema")?;
        Ok(SqliteSparkifyStore {
            conn: Mutex::new(conn),
            registry,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Sparkify database connection lock is poisoned"))
    }

    /// Drop every table and create them again, empty.
    pub fn reset_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        info!("Dropping and recreating sparkify tables");
        self.registry.schema.drop_all(&conn)?;
        self.registry.schema.create(&conn)?;
        Ok(())
    }

    fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .with_context(|| format!("Failed to count rows of {}", table))?;
        Ok(count as usize)
    }
}

impl SparkifyStore for SqliteSparkifyStore {
    fn begin_batch(&self) -> Result<()> {
        self.conn()?.execute("BEGIN IMMEDIATE", [])?;
        Ok(())
    }

    fn commit_batch(&self) -> Result<()> {
        self.conn()?.execute("COMMIT", [])?;
        Ok(())
    }

    fn upsert_song(&self, song: &SongRow) -> Result<()> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(self.registry.song_insert)?;
        stmt.execute(named_params! {
            ":song_id": &song.song_id,
            ":title": &song.title,
            ":artist_id": &song.artist_id,
            ":year": song.year,
            ":duration": song.duration,
        })
        .with_context(|| format!("Failed to upsert song {}", song.song_id))?;
        Ok(())
    }

    fn upsert_artist(&self, artist: &ArtistRow) -> Result<()> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(self.registry.artist_insert)?;
        stmt.execute(named_params! {
            ":artist_id": &artist.artist_id,
            ":name": &artist.name,
            ":location": &artist.location,
            ":latitude": artist.latitude,
            ":longitude": artist.longitude,
        })
        .with_context(|| format!("Failed to upsert artist {}", artist.artist_id))?;
        Ok(())
    }

    fn insert_time(&self, time: &TimeRow) -> Result<()> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(self.registry.time_insert)?;
        let inserted = stmt
            .execute(named_params! {
                ":start_time": &time.start_time,
                ":hour": time.hour,
                ":day": time.day,
                ":week": time.week,
                ":month": time.month,
                ":year": time.year,
                ":weekday": &time.weekday,
            })
            .with_context(|| format!("Failed to insert time {}", time.start_time))?;
        if inserted == 0 {
            debug!("Time {} already present", time.start_time);
        }
        Ok(())
    }

    fn upsert_user(&self, user: &UserRow) -> Result<()> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(self.registry.user_insert)?;
        stmt.execute(named_params! {
            ":user_id": user.user_id,
            ":first_name": &user.first_name,
            ":last_name": &user.last_name,
            ":gender": &user.gender,
            ":level": &user.level,
        })
        .with_context(|| format!("Failed to upsert user {}", user.user_id))?;
        Ok(())
    }

    fn insert_songplay(&self, songplay: &SongplayRow) -> Result<i64> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(self.registry.songplay_insert)?;
        stmt.execute(named_params! {
            ":start_time": &songplay.start_time,
            ":user_id": songplay.user_id,
            ":level": &songplay.level,
            ":song_id": &songplay.song_id,
            ":artist_id": &songplay.artist_id,
            ":session_id": songplay.session_id,
            ":location": &songplay.location,
            ":user_agent": &songplay.user_agent,
        })
        .with_context(|| {
            format!(
                "Failed to insert songplay of user {} at {}",
                songplay.user_id, songplay.start_time
            )
        })?;
        Ok(conn.last_insert_rowid())
    }

    fn find_song(&self, key: &SongLookupKey) -> Result<Option<SongMatch>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(self.registry.song_select)?;
        let found = stmt
            .query_row(
                named_params! {
                    ":title": &key.title,
                    ":artist_name": &key.artist_name,
                    ":duration": key.duration,
                },
                |row| {
                    Ok(SongMatch {
                        song_id: row.get(0)?,
                        artist_id: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    fn get_counts(&self) -> Result<TableCounts> {
        let conn = self.conn()?;
        Ok(TableCounts {
            songs: Self::count_rows(&conn, "songs")?,
            artists: Self::count_rows(&conn, "artists")?,
            time: Self::count_rows(&conn, "time")?,
            users: Self::count_rows(&conn, "users")?,
            songplays: Self::count_rows(&conn, "songplays")?,
        })
    }
}
