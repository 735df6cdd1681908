//! Shared constants for end-to-end tests

// ============================================================================
// Song dataset
// ============================================================================

pub const SONG_1_ID: &str = "SOMZWCG12A8C13C480";
pub const SONG_1_TITLE: &str = "I Didn't Mean To";
pub const SONG_1_DURATION: f64 = 218.93179;
pub const ARTIST_1_ID: &str = "ARD7TVE1187B99BFB1";
pub const ARTIST_1_NAME: &str = "Casual";

pub const SONG_2_ID: &str = "SOUDSGM12AC9618304";
pub const SONG_2_TITLE: &str = "Insatiable (Instrumental Version)";
pub const SONG_2_DURATION: f64 = 266.39628;
pub const ARTIST_2_ID: &str = "ARNTLGG11E2835DDB9";
pub const ARTIST_2_NAME: &str = "Clp";

// ============================================================================
// Log dataset
// ============================================================================

pub const USER_ID: i64 = 7;
pub const USER_FIRST_NAME: &str = "Adelyn";

/// 2018-11-06 23:59:56 UTC
pub const PLAY_TS: i64 = 1541548796000;
