use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open stay interval `[start, end)` at calendar-day granularity.
/// `end` is the checkout day and is never occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start < end, "DateRange start must be before end");
        Self { start, end }
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }

    /// Ordered calendar days of the stay, checkout day excluded.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while(move |d| *d < self.end)
    }
}

/// Beds per unit of a room type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedConfig {
    pub singles: u32,
    pub doubles: u32,
}

/// One physical, separately-occupiable room.
///
/// `unavailable` is a derived cache of the days blocked by active bookings.
/// It may briefly lag the ledger; the ledger scan is the authoritative answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUnit {
    pub id: Ulid,
    pub number: u32,
    pub unavailable: HashSet<NaiveDate>,
}

impl RoomUnit {
    pub fn new(number: u32) -> Self {
        Self {
            id: Ulid::new(),
            number,
            unavailable: HashSet::new(),
        }
    }

    /// Cache check used by capacity search: true if no cached date falls in
    /// `[start, end]` — inclusive of the end day, unlike the ledger scan.
    pub fn clear_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        !self.unavailable.iter().any(|d| start <= *d && *d <= end)
    }
}

/// A class of room (one price, one capacity) containing physical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: Ulid,
    pub hotel_id: Ulid,
    pub title: String,
    pub price: f64,
    /// Guest capacity per unit.
    pub max_people: u32,
    pub beds: BedConfig,
    pub units: Vec<RoomUnit>,
}

impl RoomType {
    pub fn new(hotel_id: Ulid, title: impl Into<String>, price: f64, max_people: u32, beds: BedConfig) -> Self {
        Self {
            id: Ulid::new(),
            hotel_id,
            title: title.into(),
            price,
            max_people,
            beds,
            units: Vec::new(),
        }
    }

    pub fn unit_by_number(&self, number: u32) -> Option<&RoomUnit> {
        self.units.iter().find(|u| u.number == number)
    }

    pub fn unit_by_number_mut(&mut self, number: u32) -> Option<&mut RoomUnit> {
        self.units.iter_mut().find(|u| u.number == number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Ulid,
    pub name: String,
    pub city: String,
    pub rating: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Cancelled and completed are terminal; no transition leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Only confirmed and completed stays count toward availability.
    pub fn blocks_availability(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
}

/// Room-type fields denormalized onto a booking at creation time.
/// Cancellation repair walks these to find the unit calendars to free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeSnapshot {
    pub room_type_id: Ulid,
    pub title: String,
    pub price: f64,
}

/// One ledger record: a confirmed stay over a date range.
///
/// `selected_rooms` maps room-type id to the number of units reserved as an
/// aggregate count. Units are not referenced directly; the reverse link is
/// reconstructed by date-range matching at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub hotel_id: Ulid,
    pub user_id: Ulid,
    pub user_name: String,
    pub dates: DateRange,
    pub selected_rooms: HashMap<Ulid, u32>,
    pub room_types: Vec<RoomTypeSnapshot>,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub payment: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub cancel_date: Option<DateTime<Utc>>,
}

impl Booking {
    /// True if this booking occupies rooms during the query window.
    pub fn blocks(&self, query: &DateRange) -> bool {
        self.status.blocks_availability() && self.dates.overlaps(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn range_basics() {
        let r = DateRange::new(d(2025, 6, 1), d(2025, 6, 3));
        assert_eq!(r.nights(), 2);
        assert!(r.contains_day(d(2025, 6, 1)));
        assert!(r.contains_day(d(2025, 6, 2)));
        assert!(!r.contains_day(d(2025, 6, 3))); // half-open
    }

    #[test]
    fn range_overlap() {
        let a = DateRange::new(d(2025, 6, 1), d(2025, 6, 3));
        let b = DateRange::new(d(2025, 6, 2), d(2025, 6, 4));
        let c = DateRange::new(d(2025, 6, 3), d(2025, 6, 5));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // checkout day equals check-in day: no conflict
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn days_excludes_checkout() {
        let r = DateRange::new(d(2025, 6, 1), d(2025, 6, 3));
        let days: Vec<NaiveDate> = r.days().collect();
        assert_eq!(days, vec![d(2025, 6, 1), d(2025, 6, 2)]);
    }

    #[test]
    fn days_single_night() {
        let r = DateRange::new(d(2025, 12, 31), d(2026, 1, 1));
        let days: Vec<NaiveDate> = r.days().collect();
        assert_eq!(days, vec![d(2025, 12, 31)]);
    }

    #[test]
    fn days_crosses_month_boundary() {
        let r = DateRange::new(d(2025, 6, 29), d(2025, 7, 2));
        let days: Vec<NaiveDate> = r.days().collect();
        assert_eq!(days, vec![d(2025, 6, 29), d(2025, 6, 30), d(2025, 7, 1)]);
    }

    #[test]
    fn status_helpers() {
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());

        assert!(BookingStatus::Confirmed.blocks_availability());
        assert!(BookingStatus::Completed.blocks_availability());
        assert!(!BookingStatus::Cancelled.blocks_availability());
    }

    #[test]
    fn unit_cache_check_is_inclusive() {
        let mut unit = RoomUnit::new(101);
        unit.unavailable.insert(d(2025, 6, 3));
        // the cached day sits on the end bound — still blocks
        assert!(!unit.clear_between(d(2025, 6, 1), d(2025, 6, 3)));
        assert!(unit.clear_between(d(2025, 6, 4), d(2025, 6, 6)));
    }

    #[test]
    fn range_serializes_as_iso_days() {
        let r = DateRange::new(d(2025, 6, 1), d(2025, 6, 3));
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["start"], "2025-06-01");
        assert_eq!(json["end"], "2025-06-03");
        let back: DateRange = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn booking_blocks_only_when_active_and_overlapping() {
        let mut booking = Booking {
            id: Ulid::new(),
            hotel_id: Ulid::new(),
            user_id: Ulid::new(),
            user_name: "guest".into(),
            dates: DateRange::new(d(2025, 6, 1), d(2025, 6, 3)),
            selected_rooms: HashMap::new(),
            room_types: Vec::new(),
            total_amount: 200.0,
            status: BookingStatus::Confirmed,
            payment: PaymentStatus::Pending,
            created_at: Utc::now(),
            cancel_date: None,
        };
        let query = DateRange::new(d(2025, 6, 2), d(2025, 6, 4));
        assert!(booking.blocks(&query));

        booking.status = BookingStatus::Cancelled;
        assert!(!booking.blocks(&query));

        booking.status = BookingStatus::Completed;
        assert!(booking.blocks(&query));
        let disjoint = DateRange::new(d(2025, 6, 3), d(2025, 6, 5));
        assert!(!booking.blocks(&disjoint));
    }
}
