//! Wire types for the scheduling portal's internal JSON endpoints.
//!
//! The portal is PHP-backed so it is loose about types: ids show up as
//! strings or numbers, flags as `1`/`"1"`, and empty objects are encoded
//! as `[]`. The helpers at the bottom of this file normalize that.

use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A campus building (a "sede" in portal terms)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Building {
    #[serde(
        rename(deserialize = "valore"),
        deserialize_with = "string_or_number"
    )]
    pub id: String,
    pub label: String,
}

/// A fixed-width bucket of the day. Only the start matters for
/// availability so the rest of the upstream fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TimeSlot {
    pub timestamp_start: i64,
}

/// Static metadata for one room in `area_rooms`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoomRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub room_code: String,
    pub room_name: String,
    #[serde(default, deserialize_with = "lenient_capacity")]
    pub capacity: Option<u32>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub aulastudio: bool,
}

/// Response of `rooms_call_new.php` for a single building and day
#[derive(Debug, Clone, Deserialize)]
pub struct Timetable {
    #[serde(rename = "fasce")]
    pub slots: Vec<TimeSlot>,
    /// Room key -> per slot list of occupancy entries, in slot order
    #[serde(rename = "table", default, deserialize_with = "map_or_empty_list")]
    pub occupancy: IndexMap<String, Vec<Vec<Value>>>,
    /// Building id -> room key -> room metadata
    #[serde(
        rename = "area_rooms",
        default,
        deserialize_with = "map_or_empty_list"
    )]
    pub room_metadata: IndexMap<String, IndexMap<String, RoomRecord>>,
}

impl Timetable {
    pub fn room_record(&self, building_id: &str, room_key: &str) -> Option<&RoomRecord> {
        self.room_metadata
            .get(building_id)
            .and_then(|rooms| rooms.get(room_key))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

fn lenient_capacity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let capacity = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(capacity)
}

// Only an exact `1` marks a study room
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s.trim() == "1",
        Value::Bool(b) => b,
        _ => false,
    };
    Ok(flag)
}

fn map_or_empty_list<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) if items.is_empty() => Ok(IndexMap::new()),
        Value::Null => Ok(IndexMap::new()),
        other => serde_json::from_value(other).map_err(de::Error::custom),
    }
}
