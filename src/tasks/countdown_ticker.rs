//! Per-timer countdown ticker task

use std::{sync::Weak, time::Duration};

use tokio::{task::JoinHandle, time::interval};
use tracing::debug;

use crate::state::{
    app_state::{AppState, TickOutcome},
    timer::TimerId,
};

/// Spawn the ticker that drives one timer's countdown
pub fn spawn_countdown_ticker(state: Weak<AppState>, id: TimerId, period: Duration) -> JoinHandle<()> {
    tokio::spawn(countdown_ticker_task(state, id, period))
}

/// Advance timer `id` once per `period` until it completes or disappears.
///
/// The ticker keeps running while its timer is paused; pausing and resetting
/// only change the countdown it advances. Deleting the timer aborts the task.
pub async fn countdown_ticker_task(state: Weak<AppState>, id: TimerId, period: Duration) {
    debug!("Starting countdown ticker for timer {}", id);

    let mut interval = interval(period);
    // first tick resolves immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let Some(state) = state.upgrade() else {
            debug!("Board dropped, stopping ticker for timer {}", id);
            break;
        };

        match state.advance(id) {
            TickOutcome::Idle | TickOutcome::Advanced => {}
            TickOutcome::Completed => {
                debug!("Timer {} finished, stopping its ticker", id);
                break;
            }
            TickOutcome::Gone => {
                debug!("Timer {} is no longer active, stopping its ticker", id);
                break;
            }
        }
    }
}
