//! Row models, one struct per target table.
//!
//! Fields are named after the columns they are bound to, so a row can only
//! ever land in the column of the same name.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: Option<String>,
    pub year: Option<i64>,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeRow {
    /// `YYYY-MM-DD HH:MM:SS.mmm`, UTC.
    pub start_time: String,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// The `(title, artist name, duration)` triple a songplay is matched on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SongLookupKey {
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub duration: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// A songplay waiting for its song/artist ids to be resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PendingSongplay {
    pub start_time: String,
    pub user_id: i64,
    pub level: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub lookup: SongLookupKey,
}

impl PendingSongplay {
    pub fn resolve(self, song_match: Option<SongMatch>) -> SongplayRow {
        let (song_id, artist_id) = match song_match {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => (None, None),
        };
        SongplayRow {
            start_time: self.start_time,
            user_id: self.user_id,
            level: self.level,
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location,
            user_agent: self.user_agent,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SongplayRow {
    pub start_time: String,
    pub user_id: i64,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Row counts of every table in the star schema.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
    pub users: usize,
    pub songplays: usize,
}
