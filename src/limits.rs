//! Input bounds. Violations surface as `EngineError::LimitExceeded`.

/// Longest bookable stay, in nights.
pub const MAX_STAY_NIGHTS: i64 = 90;

/// Widest availability / search query window, in days.
pub const MAX_QUERY_WINDOW_DAYS: i64 = 366;

/// Most room types one booking may reserve.
pub const MAX_ROOM_TYPES_PER_BOOKING: usize = 16;

/// Most units reservable per room type in one booking.
pub const MAX_UNITS_PER_SELECTION: u32 = 64;

/// Most `{adults, children}` entries in one capacity search.
pub const MAX_ROOM_REQUESTS: usize = 16;

/// Longest hotel name, room-type title, or guest name.
pub const MAX_NAME_LEN: usize = 256;

/// Most physical units under a single room type.
pub const MAX_UNITS_PER_ROOM_TYPE: usize = 512;
