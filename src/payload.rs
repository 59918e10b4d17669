//! Request and response payload contracts. Transport framing lives elsewhere;
//! these are the shapes it hands to the core, with loosely-typed client input
//! modeled as named optional fields and validated here before anything runs.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits::*;
use crate::model::{DateRange, PaymentStatus, RoomTypeSnapshot};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDates {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Room-type snapshot as sent by clients at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomTypePayload {
    pub room_type_id: Option<Ulid>,
    pub title: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingRequest {
    pub hotel_id: Option<Ulid>,
    pub user_id: Option<Ulid>,
    /// Defaults to an empty name when absent.
    pub user_name: Option<String>,
    pub room_types: Vec<RoomTypePayload>,
    /// Room-type id (string form) → number of units reserved.
    pub selected_rooms: HashMap<String, u32>,
    pub total_amount: Option<f64>,
    pub dates: Option<BookingDates>,
    /// Forwarded to the payment collaborator; never persisted on the ledger.
    pub cardholder_name: Option<String>,
}

/// A create request that survived boundary validation.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hotel_id: Ulid,
    pub user_id: Ulid,
    pub user_name: String,
    pub room_types: Vec<RoomTypeSnapshot>,
    pub selected_rooms: HashMap<Ulid, u32>,
    pub total_amount: f64,
    pub dates: DateRange,
}

impl CreateBookingRequest {
    pub fn validate(self) -> Result<NewBooking, EngineError> {
        let hotel_id = self
            .hotel_id
            .ok_or_else(|| EngineError::Validation("hotelId is required".into()))?;
        let user_id = self
            .user_id
            .ok_or_else(|| EngineError::Validation("userId is required".into()))?;
        let total_amount = self
            .total_amount
            .ok_or_else(|| EngineError::Validation("totalAmount is required".into()))?;
        if !total_amount.is_finite() || total_amount < 0.0 {
            return Err(EngineError::Validation("totalAmount must be non-negative".into()));
        }
        let dates = self
            .dates
            .ok_or_else(|| EngineError::Validation("dates are required".into()))?;
        let (start, end) = match (dates.start_date, dates.end_date) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(EngineError::Validation(
                    "both startDate and endDate are required".into(),
                ));
            }
        };
        if start >= end {
            return Err(EngineError::Validation(
                "check-out date must fall after check-in date".into(),
            ));
        }

        let user_name = self.user_name.unwrap_or_default();
        if user_name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("user name too long"));
        }

        if self.selected_rooms.len() > MAX_ROOM_TYPES_PER_BOOKING {
            return Err(EngineError::LimitExceeded("too many room types in booking"));
        }
        let mut selected_rooms = HashMap::with_capacity(self.selected_rooms.len());
        for (key, count) in self.selected_rooms {
            let id = Ulid::from_string(&key).map_err(|_| {
                EngineError::Validation(format!("selectedRooms key {key:?} is not a room type id"))
            })?;
            if count > MAX_UNITS_PER_SELECTION {
                return Err(EngineError::LimitExceeded("too many units for one room type"));
            }
            // zero-count entries carry no reservation
            if count > 0 {
                selected_rooms.insert(id, count);
            }
        }

        let mut room_types = Vec::with_capacity(self.room_types.len());
        for rt in self.room_types {
            let room_type_id = rt.room_type_id.ok_or_else(|| {
                EngineError::Validation("roomTypes entry is missing roomTypeId".into())
            })?;
            room_types.push(RoomTypeSnapshot {
                room_type_id,
                title: rt.title.unwrap_or_default(),
                price: rt.price.unwrap_or(0.0),
            });
        }

        Ok(NewBooking {
            hotel_id,
            user_id,
            user_name,
            room_types,
            selected_rooms,
            total_amount,
            dates: DateRange::new(start, end),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailabilityQuery {
    pub hotel_id: Option<Ulid>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
}

impl AvailabilityQuery {
    pub fn validate(self) -> Result<(Ulid, DateRange), EngineError> {
        let hotel_id = self
            .hotel_id
            .ok_or_else(|| EngineError::Validation("hotelId is required".into()))?;
        let (start, end) = match (self.check_in_date, self.check_out_date) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(EngineError::Validation(
                    "both checkInDate and checkOutDate are required".into(),
                ));
            }
        };
        if start >= end {
            return Err(EngineError::Validation(
                "check-out date must fall after check-in date".into(),
            ));
        }
        Ok((hotel_id, DateRange::new(start, end)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub booked_room_type_ids: Vec<Ulid>,
    pub conflicting_bookings_count: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomRequest {
    pub adults: u32,
    pub children: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelSearchQuery {
    pub city: Option<String>,
    pub room_requests: Vec<RoomRequest>,
    /// Date filtering applies only when both dates are present; with neither,
    /// every unit counts as available (the dates-not-yet-chosen flow).
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Zero or absent means the party places no distinct-room constraint.
    pub rooms_requested: Option<u32>,
}

/// A search query that survived boundary validation.
#[derive(Debug, Clone)]
pub struct PartyRequest {
    pub city: String,
    pub total_guests: u32,
    pub window: Option<(NaiveDate, NaiveDate)>,
    pub rooms_requested: Option<u32>,
}

impl HotelSearchQuery {
    pub fn validate(self) -> Result<PartyRequest, EngineError> {
        let city = match self.city {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(EngineError::Validation("city is required".into())),
        };
        if self.room_requests.len() > MAX_ROOM_REQUESTS {
            return Err(EngineError::LimitExceeded("too many room requests"));
        }
        let total_guests = self
            .room_requests
            .iter()
            .map(|r| r.adults + r.children)
            .sum();
        let window = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                if start > end {
                    return Err(EngineError::Validation(
                        "endDate must not precede startDate".into(),
                    ));
                }
                if (end - start).num_days() > MAX_QUERY_WINDOW_DAYS {
                    return Err(EngineError::LimitExceeded("query window too wide"));
                }
                Some((start, end))
            }
            (None, None) => None,
            _ => {
                return Err(EngineError::Validation(
                    "startDate and endDate must be supplied together".into(),
                ));
            }
        };
        let rooms_requested = self.rooms_requested.filter(|r| *r > 0);
        Ok(PartyRequest {
            city,
            total_guests,
            window,
            rooms_requested,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationReceipt {
    pub booking_id: Ulid,
    pub refund_amount: f64,
    pub refund_status: PaymentStatus,
    pub cancel_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepOutcome {
    pub completed_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request(room_type_id: Ulid) -> serde_json::Value {
        serde_json::json!({
            "hotelId": Ulid::new().to_string(),
            "userId": Ulid::new().to_string(),
            "userName": "Ada",
            "roomTypes": [{"roomTypeId": room_type_id.to_string(), "title": "Double", "price": 120.0}],
            "selectedRooms": {room_type_id.to_string(): 2},
            "totalAmount": 240.0,
            "dates": {"startDate": "2025-06-01", "endDate": "2025-06-03"},
            "cardholderName": "A. Lovelace"
        })
    }

    #[test]
    fn create_request_parses_and_validates() {
        let type_id = Ulid::new();
        let req: CreateBookingRequest = serde_json::from_value(base_request(type_id)).unwrap();
        let valid = req.validate().unwrap();
        assert_eq!(valid.user_name, "Ada");
        assert_eq!(valid.selected_rooms[&type_id], 2);
        assert_eq!(valid.room_types[0].title, "Double");
        assert_eq!(valid.dates.nights(), 2);
    }

    #[test]
    fn missing_required_fields_rejected() {
        let req: CreateBookingRequest = serde_json::from_value(serde_json::json!({
            "userName": "Ada"
        }))
        .unwrap();
        let err = req.validate().unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn equal_dates_rejected() {
        let type_id = Ulid::new();
        let mut json = base_request(type_id);
        json["dates"] = serde_json::json!({"startDate": "2025-06-01", "endDate": "2025-06-01"});
        let req: CreateBookingRequest = serde_json::from_value(json).unwrap();
        assert!(matches!(
            req.validate(),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn malformed_selected_rooms_key_rejected() {
        let type_id = Ulid::new();
        let mut json = base_request(type_id);
        json["selectedRooms"] = serde_json::json!({"not-a-ulid": 1});
        let req: CreateBookingRequest = serde_json::from_value(json).unwrap();
        assert!(matches!(req.validate(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn zero_count_selection_dropped() {
        let type_id = Ulid::new();
        let mut json = base_request(type_id);
        json["selectedRooms"] = serde_json::json!({type_id.to_string(): 0});
        let req: CreateBookingRequest = serde_json::from_value(json).unwrap();
        let valid = req.validate().unwrap();
        assert!(valid.selected_rooms.is_empty());
    }

    #[test]
    fn availability_query_requires_both_dates() {
        let query = AvailabilityQuery {
            hotel_id: Some(Ulid::new()),
            check_in_date: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            check_out_date: None,
        };
        assert!(matches!(
            query.validate(),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn search_query_dateless_window_is_none() {
        let query: HotelSearchQuery = serde_json::from_value(serde_json::json!({
            "city": "Paris",
            "roomRequests": [{"adults": 2, "children": 1}]
        }))
        .unwrap();
        let party = query.validate().unwrap();
        assert_eq!(party.total_guests, 3);
        assert!(party.window.is_none());
        assert!(party.rooms_requested.is_none());
    }

    #[test]
    fn search_query_zero_rooms_means_unconstrained() {
        let query = HotelSearchQuery {
            city: Some("Paris".into()),
            rooms_requested: Some(0),
            ..Default::default()
        };
        assert!(query.validate().unwrap().rooms_requested.is_none());
    }

    #[test]
    fn search_query_one_sided_dates_rejected() {
        let query = HotelSearchQuery {
            city: Some("Paris".into()),
            start_date: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            ..Default::default()
        };
        assert!(matches!(query.validate(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn report_uses_wire_field_names() {
        let report = AvailabilityReport {
            booked_room_type_ids: vec![Ulid::new()],
            conflicting_bookings_count: 3,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("bookedRoomTypeIds").is_some());
        assert_eq!(json["conflictingBookingsCount"], 3);
    }
}
