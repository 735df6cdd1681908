//! SQLite schema definitions for the Sparkify star schema.
//!
//! One fact table (`songplays`) and four dimension tables (`users`, `songs`,
//! `artists`, `time`). Each table's write statement carries its own
//! conflict-resolution policy.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, Schema, SqlType, Table};

// =============================================================================
// Dimension Tables
// =============================================================================

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text), // 'free', 'paid'
    ],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Real, non_null = true), // seconds
    ],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
};

const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        // UTC, millisecond precision
        sqlite_column!("start_time", &SqlType::Text, is_primary_key = true),
        sqlite_column!("hour", &SqlType::Integer),
        sqlite_column!("day", &SqlType::Integer),
        sqlite_column!("week", &SqlType::Integer), // ISO week
        sqlite_column!("month", &SqlType::Integer),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("weekday", &SqlType::Text), // '0' (Monday) to '6' (Sunday)
    ],
};

// =============================================================================
// Fact Table
// =============================================================================

const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!(
            "songplay_id",
            &SqlType::Integer,
            is_primary_key = true,
            is_autoincrement = true
        ),
        sqlite_column!("start_time", &SqlType::Text, non_null = true),
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text),
        sqlite_column!("song_id", &SqlType::Text), // NULL when no song matched
        sqlite_column!("artist_id", &SqlType::Text), // NULL when no song matched
        sqlite_column!("session_id", &SqlType::Integer),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
};

pub const SPARKIFY_SCHEMA: Schema = Schema {
    tables: &[
        USERS_TABLE,
        SONGS_TABLE,
        ARTISTS_TABLE,
        SONGPLAYS_TABLE,
        TIME_TABLE,
    ],
};

// =============================================================================
// Write and lookup statements
// =============================================================================

const USER_INSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level)
    VALUES (:user_id, :first_name, :last_name, :gender, :level)
    ON CONFLICT(user_id) DO UPDATE SET level = excluded.level";

const SONG_INSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration)
    VALUES (:song_id, :title, :artist_id, :year, :duration)
    ON CONFLICT(song_id) DO UPDATE SET
        title = excluded.title,
        artist_id = excluded.artist_id,
        year = excluded.year,
        duration = excluded.duration";

const ARTIST_INSERT: &str = "INSERT INTO artists (artist_id, name, location, latitude, longitude)
    VALUES (:artist_id, :name, :location, :latitude, :longitude)
    ON CONFLICT(artist_id) DO UPDATE SET
        name = excluded.name,
        location = excluded.location,
        latitude = excluded.latitude,
        longitude = excluded.longitude";

const TIME_INSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
    VALUES (:start_time, :hour, :day, :week, :month, :year, :weekday)
    ON CONFLICT(start_time) DO NOTHING";

// songplay_id is always fresh, so a conflict clause on it could never fire.
const SONGPLAY_INSERT: &str = "INSERT INTO songplays
    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
    VALUES (:start_time, :user_id, :level, :song_id, :artist_id, :session_id, :location, :user_agent)";

const SONG_SELECT: &str = "SELECT s.song_id, s.artist_id
    FROM songs s
    JOIN artists a ON a.artist_id = s.artist_id
    WHERE s.title = :title AND a.name = :artist_name AND s.duration = :duration
    LIMIT 1";

/// Everything the store needs to know about the database layout.
///
/// Passed explicitly to [`super::SqliteSparkifyStore`] so tests can swap the
/// whole layout without touching process-wide state.
pub struct SchemaRegistry {
    pub schema: &'static Schema,
    pub user_insert: &'static str,
    pub song_insert: &'static str,
    pub artist_insert: &'static str,
    pub time_insert: &'static str,
    pub songplay_insert: &'static str,
    pub song_select: &'static str,
}

impl SchemaRegistry {
    pub fn sparkify() -> Self {
        SchemaRegistry {
            schema: &SPARKIFY_SCHEMA,
            user_insert: USER_INSERT,
            song_insert: SONG_INSERT,
            artist_insert: ARTIST_INSERT,
            time_insert: TIME_INSERT,
            songplay_insert: SONGPLAY_INSERT,
            song_select: SONG_SELECT,
        }
    }

    /// Every write statement, paired with the table it targets.
    pub fn write_statements(&self) -> [(&'static str, &'static str); 5] {
        [
            ("users", self.user_insert),
            ("songs", self.song_insert),
            ("artists", self.artist_insert),
            ("time", self.time_insert),
            ("songplays", self.songplay_insert),
        ]
    }
}
