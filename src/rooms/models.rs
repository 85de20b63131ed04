use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::portal::{Building, RoomRecord};

/// How a requested instant is matched against the portal's slots.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotAlignment {
    /// The instant must equal a slot's start
    #[default]
    Exact,
    /// The instant falls in the last slot starting at or before it
    Enclosing,
}

impl FromStr for SlotAlignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "enclosing" => Ok(Self::Enclosing),
            other => anyhow::bail!("Unknown slot alignment: {}", other),
        }
    }
}

impl fmt::Display for SlotAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Enclosing => write!(f, "enclosing"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomInfo {
    pub id: String,
    pub name: String,
    pub capacity: Option<u32>,
    #[serde(rename = "studyRoom")]
    pub study_room: bool,
}

impl From<&RoomRecord> for RoomInfo {
    fn from(record: &RoomRecord) -> Self {
        Self {
            id: record.room_code.clone(),
            name: record.room_name.clone(),
            capacity: record.capacity,
            study_room: record.aulastudio,
        }
    }
}

/// Outcome of computing availability for one building. A failed
/// building is reported instead of being dropped so callers can tell
/// "nothing is free" apart from "we couldn't find out".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Ok { rooms: Vec<RoomInfo> },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeRoomsResult {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub availability: Availability,
}

impl FreeRoomsResult {
    pub fn ok(building: &Building, rooms: Vec<RoomInfo>) -> Self {
        Self {
            id: building.id.clone(),
            name: building.label.clone(),
            availability: Availability::Ok { rooms },
        }
    }

    pub fn failed(building: &Building, error: &anyhow::Error) -> Self {
        Self {
            id: building.id.clone(),
            name: building.label.clone(),
            availability: Availability::Failed {
                error: format!("{:#}", error),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.availability, Availability::Ok { .. })
    }

    /// Free rooms, or `None` if the building failed
    pub fn rooms(&self) -> Option<&[RoomInfo]> {
        match &self.availability {
            Availability::Ok { rooms } => Some(rooms.as_slice()),
            Availability::Failed { .. } => None,
        }
    }
}
