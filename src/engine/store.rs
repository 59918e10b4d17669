use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::EngineError;

pub type SharedRoomType = Arc<RwLock<RoomType>>;

/// The booking ledger: the authoritative record of reservations.
///
/// Shaped like a document store — lookups by id, filtered scans, whole-document
/// replaces, and one bulk status update. No cross-document transactions.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn insert(&self, booking: Booking) -> Result<(), EngineError>;

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError>;

    /// Whole-document replace: read, compute the next state, write it back.
    async fn replace(&self, booking: Booking) -> Result<(), EngineError>;

    /// Bookings for a hotel whose date range overlaps `range`, any status.
    /// Status filtering belongs to the availability scan, not the store.
    async fn overlapping(
        &self,
        hotel_id: Ulid,
        range: DateRange,
    ) -> Result<Vec<Booking>, EngineError>;

    async fn for_hotel(&self, hotel_id: Ulid) -> Result<Vec<Booking>, EngineError>;

    async fn for_user(&self, user_id: Ulid) -> Result<Vec<Booking>, EngineError>;

    /// Bulk transition: every non-terminal booking with `end < today` becomes
    /// completed, in a single store operation. Returns the number flipped.
    async fn complete_expired(&self, today: NaiveDate) -> Result<usize, EngineError>;
}

/// Room inventory: hotels and room types with embedded units. Unit calendars
/// are mutated only through atomic per-unit push/pull operations.
#[async_trait]
pub trait RoomInventory: Send + Sync {
    async fn hotel(&self, id: Ulid) -> Result<Option<Hotel>, EngineError>;

    async fn hotels_in_city(&self, city: &str) -> Result<Vec<Hotel>, EngineError>;

    async fn room_type(&self, id: Ulid) -> Result<Option<RoomType>, EngineError>;

    async fn room_types_for_hotel(&self, hotel_id: Ulid) -> Result<Vec<RoomType>, EngineError>;

    /// Atomic push of days onto one unit's unavailable set.
    async fn push_unit_days(
        &self,
        room_type_id: Ulid,
        unit_id: Ulid,
        days: &[NaiveDate],
    ) -> Result<(), EngineError>;

    /// Atomic pull of days from one unit's unavailable set.
    async fn pull_unit_days(
        &self,
        room_type_id: Ulid,
        unit_id: Ulid,
        days: &[NaiveDate],
    ) -> Result<(), EngineError>;

    /// Drop cached days before `today` from every unit. Returns entries removed.
    async fn prune_before(&self, today: NaiveDate) -> Result<usize, EngineError>;
}

/// In-memory store backing both seams. One lock per room-type document;
/// bookings are plain values replaced wholesale.
pub struct MemoryStore {
    hotels: DashMap<Ulid, Hotel>,
    room_types: DashMap<Ulid, SharedRoomType>,
    bookings: DashMap<Ulid, Booking>,
    /// hotel id → room type ids
    types_by_hotel: DashMap<Ulid, Vec<Ulid>>,
    /// hotel id → booking ids
    bookings_by_hotel: DashMap<Ulid, Vec<Ulid>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            hotels: DashMap::new(),
            room_types: DashMap::new(),
            bookings: DashMap::new(),
            types_by_hotel: DashMap::new(),
            bookings_by_hotel: DashMap::new(),
        }
    }

    pub fn insert_hotel(&self, hotel: Hotel) {
        self.hotels.insert(hotel.id, hotel);
    }

    pub fn insert_room_type(&self, room_type: RoomType) -> Result<(), EngineError> {
        if room_type.units.len() > MAX_UNITS_PER_ROOM_TYPE {
            return Err(EngineError::LimitExceeded("too many units on room type"));
        }
        if !self.hotels.contains_key(&room_type.hotel_id) {
            return Err(EngineError::NotFound(room_type.hotel_id));
        }
        self.types_by_hotel
            .entry(room_type.hotel_id)
            .or_default()
            .push(room_type.id);
        self.room_types
            .insert(room_type.id, Arc::new(RwLock::new(room_type)));
        Ok(())
    }

    pub fn shared_room_type(&self, id: &Ulid) -> Option<SharedRoomType> {
        self.room_types.get(id).map(|e| e.value().clone())
    }
}

#[async_trait]
impl BookingLedger for MemoryStore {
    async fn insert(&self, booking: Booking) -> Result<(), EngineError> {
        self.bookings_by_hotel
            .entry(booking.hotel_id)
            .or_default()
            .push(booking.id);
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError> {
        Ok(self.bookings.get(&id).map(|e| e.value().clone()))
    }

    async fn replace(&self, booking: Booking) -> Result<(), EngineError> {
        if !self.bookings.contains_key(&booking.id) {
            return Err(EngineError::NotFound(booking.id));
        }
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn overlapping(
        &self,
        hotel_id: Ulid,
        range: DateRange,
    ) -> Result<Vec<Booking>, EngineError> {
        let ids = self
            .bookings_by_hotel
            .get(&hotel_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| self.bookings.get(id).map(|e| e.value().clone()))
            .filter(|b| b.dates.overlaps(&range))
            .collect())
    }

    async fn for_hotel(&self, hotel_id: Ulid) -> Result<Vec<Booking>, EngineError> {
        let ids = self
            .bookings_by_hotel
            .get(&hotel_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| self.bookings.get(id).map(|e| e.value().clone()))
            .collect())
    }

    async fn for_user(&self, user_id: Ulid) -> Result<Vec<Booking>, EngineError> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().user_id == user_id)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn complete_expired(&self, today: NaiveDate) -> Result<usize, EngineError> {
        let mut flipped = 0;
        for mut entry in self.bookings.iter_mut() {
            let booking = entry.value_mut();
            if !booking.status.is_terminal() && booking.dates.end < today {
                booking.status = BookingStatus::Completed;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

#[async_trait]
impl RoomInventory for MemoryStore {
    async fn hotel(&self, id: Ulid) -> Result<Option<Hotel>, EngineError> {
        Ok(self.hotels.get(&id).map(|e| e.value().clone()))
    }

    async fn hotels_in_city(&self, city: &str) -> Result<Vec<Hotel>, EngineError> {
        Ok(self
            .hotels
            .iter()
            .filter(|e| e.value().city.eq_ignore_ascii_case(city))
            .map(|e| e.value().clone())
            .collect())
    }

    async fn room_type(&self, id: Ulid) -> Result<Option<RoomType>, EngineError> {
        match self.shared_room_type(&id) {
            Some(rt) => {
                let guard = rt.read().await;
                Ok(Some(guard.clone()))
            }
            None => Ok(None),
        }
    }

    async fn room_types_for_hotel(&self, hotel_id: Ulid) -> Result<Vec<RoomType>, EngineError> {
        let ids = self
            .types_by_hotel
            .get(&hotel_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(rt) = self.shared_room_type(&id) {
                let guard = rt.read().await;
                out.push(guard.clone());
            }
        }
        Ok(out)
    }

    async fn push_unit_days(
        &self,
        room_type_id: Ulid,
        unit_id: Ulid,
        days: &[NaiveDate],
    ) -> Result<(), EngineError> {
        let rt = self
            .shared_room_type(&room_type_id)
            .ok_or(EngineError::NotFound(room_type_id))?;
        let mut guard = rt.write().await;
        let unit = guard
            .units
            .iter_mut()
            .find(|u| u.id == unit_id)
            .ok_or(EngineError::NotFound(unit_id))?;
        unit.unavailable.extend(days.iter().copied());
        Ok(())
    }

    async fn pull_unit_days(
        &self,
        room_type_id: Ulid,
        unit_id: Ulid,
        days: &[NaiveDate],
    ) -> Result<(), EngineError> {
        let rt = self
            .shared_room_type(&room_type_id)
            .ok_or(EngineError::NotFound(room_type_id))?;
        let mut guard = rt.write().await;
        let unit = guard
            .units
            .iter_mut()
            .find(|u| u.id == unit_id)
            .ok_or(EngineError::NotFound(unit_id))?;
        for day in days {
            unit.unavailable.remove(day);
        }
        Ok(())
    }

    async fn prune_before(&self, today: NaiveDate) -> Result<usize, EngineError> {
        let mut removed = 0;
        let ids: Vec<Ulid> = self.room_types.iter().map(|e| *e.key()).collect();
        for id in ids {
            if let Some(rt) = self.shared_room_type(&id) {
                let mut guard = rt.write().await;
                for unit in &mut guard.units {
                    let before = unit.unavailable.len();
                    unit.unavailable.retain(|d| *d >= today);
                    removed += before - unit.unavailable.len();
                }
            }
        }
        Ok(removed)
    }
}
