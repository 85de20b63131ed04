//! Per-building availability: which rooms have no bookings in a range

use anyhow::{Result, anyhow, bail};

use super::models::{FreeRoomsResult, RoomInfo, SlotAlignment};
use super::range::TimeRange;
use crate::portal::{Building, Portal, TimeSlot, Timetable};

/// Find the first and last slot covered by `range` in a single pass.
/// Slots are expected in the order the portal returns them (ascending).
pub fn slot_indices(
    slots: &[TimeSlot],
    range: &TimeRange,
    alignment: SlotAlignment,
) -> Result<(usize, usize)> {
    let from_ms = range.from.epoch_millis();
    let to_ms = range.to.epoch_millis();

    let mut start = None;
    let mut end = None;
    for (i, slot) in slots.iter().enumerate() {
        let (starts_from, starts_to) = match alignment {
            SlotAlignment::Exact => (
                slot.timestamp_start == from_ms,
                slot.timestamp_start == to_ms,
            ),
            SlotAlignment::Enclosing => (
                slot.timestamp_start <= from_ms,
                slot.timestamp_start <= to_ms,
            ),
        };
        if starts_from {
            start = Some(i);
        }
        if starts_to {
            end = Some(i);
        }
    }

    let start = start.ok_or_else(|| anyhow!("No slot found for {} ({})", range.from, alignment))?;
    let end = end.ok_or_else(|| anyhow!("No slot found for {} ({})", range.to, alignment))?;
    if start > end {
        bail!("First slot {} comes after last slot {}", start, end);
    }

    Ok((start, end))
}

/// Rooms of `building` with no occupancy entries in any slot of `range`,
/// both ends inclusive, in the order the portal lists them.
pub fn free_rooms(
    building: &Building,
    timetable: &Timetable,
    range: &TimeRange,
    alignment: SlotAlignment,
) -> Result<Vec<RoomInfo>> {
    range.ensure_ordered()?;
    let (start, end) = slot_indices(&timetable.slots, range, alignment)?;

    let mut rooms = vec![];
    for (room_key, slots) in &timetable.occupancy {
        let occupied = slots
            .iter()
            .skip(start)
            .take(end - start + 1)
            .any(|entries| !entries.is_empty());
        if occupied {
            continue;
        }

        let record = timetable
            .room_record(&building.id, room_key)
            .ok_or_else(|| {
                anyhow!(
                    "Missing metadata for room {} in building {}",
                    room_key,
                    building.id
                )
            })?;
        rooms.push(RoomInfo::from(record));
    }

    Ok(rooms)
}

/// Fetch a building's timetable and compute its free rooms. Never fails:
/// errors are logged and reported in the result.
pub async fn fetch_availability(
    portal: &dyn Portal,
    building: &Building,
    range: &TimeRange,
    alignment: SlotAlignment,
) -> FreeRoomsResult {
    let outcome = async {
        let timetable = portal.fetch_timetable(&building.id, range.date()).await?;
        free_rooms(building, &timetable, range, alignment)
    }
    .await;

    match outcome {
        Ok(rooms) => {
            tracing::debug!("Building {} has {} free rooms", building.id, rooms.len());
            FreeRoomsResult::ok(building, rooms)
        }
        Err(e) => {
            tracing::error!("Failed to get free rooms for building {}: {:#}", building.id, e);
            FreeRoomsResult::failed(building, &e)
        }
    }
}
