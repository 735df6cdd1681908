//! SparkifyStore trait definition.
//!
//! The loader and the batch driver only talk to storage through this trait,
//! so they can run against the SQLite store or a mock.

use super::models::{
    ArtistRow, SongLookupKey, SongMatch, SongRow, SongplayRow, TableCounts, TimeRow, UserRow,
};
use anyhow::Result;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait SparkifyStore: Send + Sync {
    // =========================================================================
    // Transactions
    // =========================================================================

    /// Open the transaction that groups all writes of one source file.
    fn begin_batch(&self) -> Result<()>;

    /// Commit the transaction opened by [`SparkifyStore::begin_batch`].
    fn commit_batch(&self) -> Result<()>;

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert a song, overwriting every non-key field of an existing one.
    fn upsert_song(&self, song: &SongRow) -> Result<()>;

    /// Insert an artist, overwriting every non-key field of an existing one.
    fn upsert_artist(&self, artist: &ArtistRow) -> Result<()>;

    /// Insert a time row; an existing `start_time` is left untouched.
    fn insert_time(&self, time: &TimeRow) -> Result<()>;

    /// Insert a user; on conflict only `level` is updated.
    fn upsert_user(&self, user: &UserRow) -> Result<()>;

    /// Append a songplay. Returns the assigned `songplay_id`.
    fn insert_songplay(&self, songplay: &SongplayRow) -> Result<i64>;

    // =========================================================================
    // Reads
    // =========================================================================

    /// Find the song matching title, artist name and duration exactly.
    fn find_song(&self, key: &SongLookupKey) -> Result<Option<SongMatch>>;

    fn get_counts(&self) -> Result<TableCounts>;
}
