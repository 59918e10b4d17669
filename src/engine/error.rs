use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    /// Missing or malformed request field, or invalid date ordering.
    Validation(String),
    /// Referenced booking, hotel, or room does not exist.
    NotFound(Ulid),
    /// Booking already in a terminal state when a transition was attempted.
    Conflict(Ulid),
    LimitExceeded(&'static str),
    /// Storage layer failure; aborts the operation it occurred in.
    Storage(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "validation failed: {msg}"),
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::Conflict(id) => write!(f, "booking {id} is already closed"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
