//! Raw JSON record shapes, as found in the song and log datasets.

use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;
use serde_json::Value;

/// One song of the song metadata dataset.
#[derive(Clone, Debug, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub year: Option<i64>,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// One user action of the event log dataset.
///
/// Every field is optional: non-`NextSong` actions (logins, home page
/// visits...) routinely lack user and song fields.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogRecord {
    pub page: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub ts: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
}

pub const NEXT_SONG_PAGE: &str = "NextSong";

impl LogRecord {
    pub fn is_next_song(&self) -> bool {
        self.page.as_deref() == Some(NEXT_SONG_PAGE)
    }
}

/// Integers that may be serialized as numbers, integral floats or numeric
/// strings. Null and the empty string both read as `None`.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else {
                match n.as_f64() {
                    Some(f)
                        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
                    {
                        Ok(Some(f as i64))
                    }
                    Some(f) => Err(de::Error::invalid_value(Unexpected::Float(f), &"an integer")),
                    None => Err(de::Error::invalid_value(
                        Unexpected::Other("non-integral number"),
                        &"an integer",
                    )),
                }
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .map(Some)
                .map_err(|_| de::Error::invalid_value(Unexpected::Str(s), &"an integer"))
        }
        other => Err(de::Error::invalid_type(
            match other {
                Value::Bool(b) => Unexpected::Bool(b),
                Value::Array(_) => Unexpected::Seq,
                _ => Unexpected::Map,
            },
            &"an integer",
        )),
    }
}
