use ulid::Ulid;

use crate::model::*;
use crate::observability;
use crate::payload::{AvailabilityQuery, AvailabilityReport, HotelSearchQuery, PartyRequest};

use super::availability::{conflicting_count, occupied_room_type_ids, unit_is_free, validate_window};
use super::{Engine, EngineError};

impl Engine {
    /// Coarse per-type occupancy check: which room types have at least one
    /// unit reserved during the window. Derived from the ledger scan, the
    /// authoritative availability source.
    pub async fn check_availability(
        &self,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityReport, EngineError> {
        let (hotel_id, range) = query.validate()?;
        validate_window(&range)?;
        self.require_hotel(hotel_id).await?;

        let scan_start = std::time::Instant::now();
        let bookings = self.ledger.overlapping(hotel_id, range).await?;
        let occupied = occupied_room_type_ids(&bookings, &range);
        let conflicts = conflicting_count(&bookings, &range);
        metrics::counter!(observability::AVAILABILITY_QUERIES_TOTAL).increment(1);
        metrics::histogram!(observability::QUERY_DURATION_SECONDS)
            .record(scan_start.elapsed().as_secs_f64());

        let mut booked_room_type_ids: Vec<Ulid> = occupied.into_iter().collect();
        booked_room_type_ids.sort();
        Ok(AvailabilityReport {
            booked_room_type_ids,
            conflicting_bookings_count: conflicts,
        })
    }

    /// Multi-room party fitting: hotels in the city with enough pooled
    /// capacity and enough distinct free units. A coarse feasibility filter
    /// over the unit calendar cache, not a per-type reservation.
    pub async fn search_hotels(&self, query: HotelSearchQuery) -> Result<Vec<Hotel>, EngineError> {
        let party = query.validate()?;
        let hotels = self.inventory.hotels_in_city(&party.city).await?;

        let mut qualifying = Vec::new();
        for hotel in hotels {
            if self.fits_party(hotel.id, &party).await? {
                qualifying.push(hotel);
            }
        }
        metrics::counter!(observability::SEARCH_QUERIES_TOTAL).increment(1);
        Ok(qualifying)
    }

    /// Pool capacity and free-unit counts across the whole hotel, not per type.
    async fn fits_party(&self, hotel_id: Ulid, party: &PartyRequest) -> Result<bool, EngineError> {
        let mut total_capacity: u64 = 0;
        let mut available_units: u64 = 0;
        for room_type in self.inventory.room_types_for_hotel(hotel_id).await? {
            for unit in &room_type.units {
                if unit_is_free(unit, party.window) {
                    total_capacity += u64::from(room_type.max_people);
                    available_units += 1;
                }
            }
        }
        Ok(available_units > 0
            && total_capacity >= u64::from(party.total_guests)
            && party
                .rooms_requested
                .is_none_or(|r| u64::from(r) <= available_units))
    }

    pub async fn booking(&self, id: Ulid) -> Result<Booking, EngineError> {
        self.ledger
            .get(id)
            .await?
            .ok_or(EngineError::NotFound(id))
    }

    pub async fn bookings_for_hotel(&self, hotel_id: Ulid) -> Result<Vec<Booking>, EngineError> {
        self.require_hotel(hotel_id).await?;
        self.ledger.for_hotel(hotel_id).await
    }

    pub async fn bookings_for_user(&self, user_id: Ulid) -> Result<Vec<Booking>, EngineError> {
        self.ledger.for_user(user_id).await
    }

    /// Unit numbers of one room type with no cached unavailable date in the
    /// window — the room-number picker. Same inclusive cache semantics as
    /// `search_hotels`.
    pub async fn available_units(
        &self,
        room_type_id: Ulid,
        range: DateRange,
    ) -> Result<Vec<u32>, EngineError> {
        validate_window(&range)?;
        let room_type = self
            .inventory
            .room_type(room_type_id)
            .await?
            .ok_or(EngineError::NotFound(room_type_id))?;
        let mut numbers: Vec<u32> = room_type
            .units
            .iter()
            .filter(|u| unit_is_free(u, Some((range.start, range.end))))
            .map(|u| u.number)
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }
}
