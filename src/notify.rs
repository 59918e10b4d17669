use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::model::Booking;

const CHANNEL_CAPACITY: usize = 256;

/// A booking lifecycle transition. Carries the full record so subscribers
/// (the outbound-email collaborator) need no follow-up ledger read.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    Created(Booking),
    Cancelled(Booking),
}

/// Broadcast hub for per-hotel booking notifications.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<BookingEvent>>,
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to notifications for a hotel. Creates the channel if needed.
    pub fn subscribe(&self, hotel_id: Ulid) -> broadcast::Receiver<BookingEvent> {
        let sender = self
            .channels
            .entry(hotel_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, hotel_id: Ulid, event: &BookingEvent) {
        if let Some(sender) = self.channels.get(&hotel_id) {
            let _ = sender.send(event.clone());
        }
    }

    /// Remove a channel (e.g. when a hotel is delisted).
    pub fn remove(&self, hotel_id: &Ulid) {
        self.channels.remove(hotel_id);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{NaiveDate, Utc};

    use crate::model::*;

    use super::*;

    fn booking(hotel_id: Ulid) -> Booking {
        Booking {
            id: Ulid::new(),
            hotel_id,
            user_id: Ulid::new(),
            user_name: "guest".into(),
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            ),
            selected_rooms: HashMap::new(),
            room_types: Vec::new(),
            total_amount: 100.0,
            status: BookingStatus::Confirmed,
            payment: PaymentStatus::Pending,
            created_at: Utc::now(),
            cancel_date: None,
        }
    }

    #[tokio::test]
    async fn subscribe_and_receive() {
        let hub = NotifyHub::new();
        let hotel_id = Ulid::new();
        let mut rx = hub.subscribe(hotel_id);

        let event = BookingEvent::Created(booking(hotel_id));
        hub.send(hotel_id, &event);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn send_without_subscribers_is_noop() {
        let hub = NotifyHub::new();
        let hotel_id = Ulid::new();
        // No subscriber — should not panic
        hub.send(hotel_id, &BookingEvent::Cancelled(booking(hotel_id)));
    }

    #[tokio::test]
    async fn channels_are_per_hotel() {
        let hub = NotifyHub::new();
        let h1 = Ulid::new();
        let h2 = Ulid::new();
        let mut rx1 = hub.subscribe(h1);
        let _rx2 = hub.subscribe(h2);

        hub.send(h2, &BookingEvent::Created(booking(h2)));
        assert!(rx1.try_recv().is_err());
    }
}
