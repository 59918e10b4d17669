use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use ulid::Ulid;

use crate::model::*;
use crate::notify::BookingEvent;
use crate::observability;
use crate::payload::{CancellationReceipt, CreateBookingRequest, SweepOutcome};

use super::availability::validate_stay;
use super::{Engine, EngineError};

impl Engine {
    /// Validate and persist a new booking in confirmed status.
    ///
    /// No unit calendar is touched here: availability is derived from the
    /// ledger at read time. Unit caches change only through
    /// `reserve_unit_dates` and cancellation repair.
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<Booking, EngineError> {
        let new = request.validate()?;
        validate_stay(&new.dates)?;
        self.require_hotel(new.hotel_id).await?;

        let booking = Booking {
            id: Ulid::new(),
            hotel_id: new.hotel_id,
            user_id: new.user_id,
            user_name: new.user_name,
            dates: new.dates,
            selected_rooms: new.selected_rooms,
            room_types: new.room_types,
            total_amount: new.total_amount,
            status: BookingStatus::Confirmed,
            payment: PaymentStatus::Pending,
            created_at: Utc::now(),
            cancel_date: None,
        };
        self.ledger.insert(booking.clone()).await?;
        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        info!(
            "created booking {} for hotel {}, {} to {}",
            booking.id, booking.hotel_id, booking.dates.start, booking.dates.end
        );
        self.notify
            .send(booking.hotel_id, &BookingEvent::Created(booking.clone()));
        Ok(booking)
    }

    /// Cancel a booking, flag the refund, and free its unit calendars.
    ///
    /// The ledger write is authoritative; the calendar repair that follows is
    /// best-effort and never fails the cancellation.
    pub async fn cancel_booking(&self, id: Ulid) -> Result<CancellationReceipt, EngineError> {
        let booking = self
            .ledger
            .get(id)
            .await?
            .ok_or(EngineError::NotFound(id))?;
        if booking.status.is_terminal() {
            return Err(EngineError::Conflict(id));
        }

        let cancel_date = Utc::now();
        let mut next = booking;
        next.status = BookingStatus::Cancelled;
        next.payment = PaymentStatus::Refunded;
        next.cancel_date = Some(cancel_date);
        self.ledger.replace(next.clone()).await?;
        metrics::counter!(observability::BOOKINGS_CANCELLED_TOTAL).increment(1);
        info!("cancelled booking {id}");

        self.repair_unit_calendars(&next).await;
        self.notify
            .send(next.hotel_id, &BookingEvent::Cancelled(next.clone()));

        Ok(CancellationReceipt {
            booking_id: id,
            refund_amount: next.total_amount,
            refund_status: PaymentStatus::Refunded,
            cancel_date,
        })
    }

    /// Remove the booking's day-span from every unit of every room type it
    /// snapshotted. Continue-on-error: a failed unit is logged and counted,
    /// and the loop moves on — the cache can be repaired by a later pass.
    async fn repair_unit_calendars(&self, booking: &Booking) {
        let days: Vec<NaiveDate> = booking.dates.days().collect();
        for snapshot in &booking.room_types {
            let room_type = match self.inventory.room_type(snapshot.room_type_id).await {
                Ok(Some(rt)) => rt,
                Ok(None) => {
                    warn!(
                        "cancel {}: room type {} no longer exists",
                        booking.id, snapshot.room_type_id
                    );
                    metrics::counter!(observability::RECONCILE_FAILURES_TOTAL).increment(1);
                    continue;
                }
                Err(e) => {
                    warn!(
                        "cancel {}: loading room type {} failed: {e}",
                        booking.id, snapshot.room_type_id
                    );
                    metrics::counter!(observability::RECONCILE_FAILURES_TOTAL).increment(1);
                    continue;
                }
            };
            for unit in &room_type.units {
                if let Err(e) = self
                    .inventory
                    .pull_unit_days(room_type.id, unit.id, &days)
                    .await
                {
                    warn!(
                        "cancel {}: freeing unit {} of room type {} failed: {e}",
                        booking.id, unit.number, room_type.id
                    );
                    metrics::counter!(observability::RECONCILE_FAILURES_TOTAL).increment(1);
                }
            }
        }
    }

    /// Auto-complete sweep: flip every booking whose stay ended before
    /// `today` to completed. One bulk store update; idempotent.
    pub async fn complete_expired(&self, today: NaiveDate) -> Result<SweepOutcome, EngineError> {
        let sweep_start = std::time::Instant::now();
        let completed = self.ledger.complete_expired(today).await?;
        metrics::histogram!(observability::SWEEP_DURATION_SECONDS)
            .record(sweep_start.elapsed().as_secs_f64());
        if completed > 0 {
            metrics::counter!(observability::BOOKINGS_COMPLETED_TOTAL).increment(completed as u64);
            info!("auto-completed {completed} bookings");
        }
        Ok(SweepOutcome {
            completed_count: completed,
        })
    }

    /// Advisory cache write: block out a stay on specific physical rooms.
    /// All room numbers are resolved before any calendar is touched, so an
    /// unknown number leaves every unit unchanged.
    pub async fn reserve_unit_dates(
        &self,
        room_type_id: Ulid,
        room_numbers: &[u32],
        range: DateRange,
    ) -> Result<(), EngineError> {
        validate_stay(&range)?;
        let room_type = self
            .inventory
            .room_type(room_type_id)
            .await?
            .ok_or(EngineError::NotFound(room_type_id))?;

        let mut unit_ids = Vec::with_capacity(room_numbers.len());
        for number in room_numbers {
            let unit = room_type.unit_by_number(*number).ok_or_else(|| {
                EngineError::Validation(format!("room type has no unit numbered {number}"))
            })?;
            unit_ids.push(unit.id);
        }

        let days: Vec<NaiveDate> = range.days().collect();
        for unit_id in unit_ids {
            self.inventory
                .push_unit_days(room_type_id, unit_id, &days)
                .await?;
        }
        Ok(())
    }

    /// Drop unavailable-date entries that have aged out of relevance.
    pub async fn prune_unit_calendars(&self, today: NaiveDate) -> Result<usize, EngineError> {
        let removed = self.inventory.prune_before(today).await?;
        if removed > 0 {
            metrics::counter!(observability::CALENDAR_DAYS_PRUNED_TOTAL)
                .increment(removed as u64);
            info!("pruned {removed} stale unavailable-date entries");
        }
        Ok(removed)
    }
}
