//! Public types for the rooms API
use serde::Deserialize;

pub use crate::rooms::{Availability, FreeRoomsResult, RoomInfo};

/// Both bounds are ISO-8601 date-times. Missing bounds default to
/// today 08:00 and 20:00 local time.
#[derive(Deserialize)]
pub struct RoomsQuery {
    pub datefrom: Option<String>,
    pub dateto: Option<String>,
}
