use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error};

use crate::engine::Engine;

/// Background task that periodically runs the auto-complete sweep and the
/// unit-calendar prune. The engine itself carries no timer; this is the
/// external trigger for deployments that want one.
pub async fn run_sweeper(engine: Arc<Engine>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let today = Utc::now().date_naive();
        if let Err(e) = engine.complete_expired(today).await {
            error!("auto-complete sweep failed: {e}");
        }
        match engine.prune_unit_calendars(today).await {
            Ok(removed) => debug!("sweep pass done, {removed} cache entries pruned"),
            Err(e) => error!("calendar prune failed: {e}"),
        }
    }
}
