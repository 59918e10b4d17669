mod availability;
mod error;
mod lifecycle;
mod search;
mod store;

pub use availability::{conflicting_count, occupied_room_type_ids, unit_is_free};
pub use error::EngineError;
pub use store::{BookingLedger, MemoryStore, RoomInventory, SharedRoomType};

use std::sync::Arc;

use ulid::Ulid;

use crate::model::Hotel;
use crate::notify::NotifyHub;

/// The booking engine: availability scans, the reservation lifecycle, and
/// capacity search, over pluggable ledger and inventory stores.
pub struct Engine {
    ledger: Arc<dyn BookingLedger>,
    inventory: Arc<dyn RoomInventory>,
    pub notify: Arc<NotifyHub>,
}

impl Engine {
    pub fn new(
        ledger: Arc<dyn BookingLedger>,
        inventory: Arc<dyn RoomInventory>,
        notify: Arc<NotifyHub>,
    ) -> Self {
        Self {
            ledger,
            inventory,
            notify,
        }
    }

    /// Engine over a fresh in-memory store; returns the store too so the
    /// caller can seed hotels and room types.
    pub fn with_memory_store(notify: Arc<NotifyHub>) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Self::new(store.clone(), store.clone(), notify), store)
    }

    async fn require_hotel(&self, id: Ulid) -> Result<Hotel, EngineError> {
        self.inventory
            .hotel(id)
            .await?
            .ok_or(EngineError::NotFound(id))
    }
}
