use std::collections::HashSet;

use chrono::NaiveDate;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::EngineError;

/// Bounds check for bookable stays.
pub(crate) fn validate_stay(range: &DateRange) -> Result<(), EngineError> {
    if range.start >= range.end {
        return Err(EngineError::Validation(
            "check-out date must fall after check-in date".into(),
        ));
    }
    if range.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(())
}

/// Bounds check for read-side query windows.
pub(crate) fn validate_window(range: &DateRange) -> Result<(), EngineError> {
    if range.start >= range.end {
        return Err(EngineError::Validation(
            "check-out date must fall after check-in date".into(),
        ));
    }
    if range.nights() > MAX_QUERY_WINDOW_DAYS {
        return Err(EngineError::LimitExceeded("query window too wide"));
    }
    Ok(())
}

/// Room types with at least one unit reserved during the query window.
///
/// Scans the given ledger slice for confirmed or completed bookings whose
/// half-open date range overlaps `query` and unions their room-type keys.
/// A booking with an empty room mapping contributes nothing and is skipped.
pub fn occupied_room_type_ids(bookings: &[Booking], query: &DateRange) -> HashSet<Ulid> {
    let mut occupied = HashSet::new();
    for booking in bookings {
        if !booking.blocks(query) {
            continue;
        }
        occupied.extend(booking.selected_rooms.keys().copied());
    }
    occupied
}

/// Number of active bookings whose stay overlaps the query window.
pub fn conflicting_count(bookings: &[Booking], query: &DateRange) -> usize {
    bookings.iter().filter(|b| b.blocks(query)).count()
}

/// Cache-based unit check for capacity search. With no window every unit
/// passes; with a window the unit's cached dates are checked against the
/// inclusive `[start, end]` span.
pub fn unit_is_free(unit: &RoomUnit, window: Option<(NaiveDate, NaiveDate)>) -> bool {
    match window {
        Some((start, end)) => unit.clear_between(start, end),
        None => true,
    }
}
