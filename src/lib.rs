//! Room-availability and reservation-conflict engine for a hotel booking
//! backend: room inventory, the booking ledger, date-range conflict scans,
//! the reservation lifecycle, and multi-room capacity search.

pub mod config;
pub mod engine;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
pub mod payload;
pub mod sweeper;

pub use engine::{Engine, EngineError, MemoryStore};
