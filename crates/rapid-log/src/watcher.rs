use crate::Logger;

use std::time::Duration;

use chrono::{Days, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// When the next midnight cannot be computed, check again after an hour.
const RETRY_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Spawn the day-boundary watcher: sleep until the next local midnight,
/// rotate when the date changed, loop until shutdown is signalled.
pub(crate) fn spawn(logger: Logger, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(until_next_midnight()) => {
                    logger.rotate_if_date_changed();
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

fn until_next_midnight() -> Duration {
    let now = Local::now();
    let Some(midnight) = (now.date_naive() + Days::new(1)).and_hms_opt(0, 0, 0) else {
        return RETRY_INTERVAL;
    };

    match midnight.and_local_timezone(Local).earliest() {
        Some(next) => (next - now).to_std().unwrap_or(RETRY_INTERVAL),
        None => RETRY_INTERVAL,
    }
}
