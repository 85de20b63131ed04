//! Campus-wide free room lookup

pub mod availability;
pub mod coordinator;
pub mod models;
pub mod range;

pub use availability::{fetch_availability, free_rooms};
pub use coordinator::{FanOutOptions, RoomsCache, get_free_rooms, new_rooms_cache};
pub use models::{Availability, FreeRoomsResult, RoomInfo, SlotAlignment};
pub use range::{TimeInstant, TimeRange};
