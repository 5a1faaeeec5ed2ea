use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::types::app_state::{AppState, LatestReading};
use crate::types::coordinate::CoordinateError;
use crate::utils::location_extractor::extract_coordinate;

/// Why a cycle produced no outcome. Provider failures never land here; the
/// resolver absorbs them into the outcome itself.
#[derive(Debug)]
pub enum CycleError {
    /// No location reading has been supplied yet.
    NoLocation,
    Coordinate(CoordinateError),
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CycleError::NoLocation => write!(f, "No location reading available"),
            CycleError::Coordinate(err) => write!(f, "{}", err),
        }
    }
}

/// Run one poll cycle: extract the coordinate from the stored snapshot,
/// resolve it, and publish the outcome. A coordinate failure aborts the
/// cycle and leaves the previously published reading in place.
pub async fn run_cycle(state: &AppState) -> Result<LatestReading, CycleError> {
    let snapshot = {
        let location = state.location.read().await;
        location.clone().ok_or(CycleError::NoLocation)?
    };

    let coordinate = extract_coordinate(&snapshot).map_err(CycleError::Coordinate)?;

    let outcome = state.resolver.resolve(&coordinate).await;
    let reading = LatestReading {
        outcome,
        coordinate,
    };

    let mut latest = state.latest.write().await;
    *latest = Some(reading.clone());

    Ok(reading)
}

/// Drive `run_cycle` on a fixed wall-clock interval until cancelled. Ticks
/// that would overlap a still-running cycle are skipped, not queued.
pub fn spawn(
    state: AppState,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        state.polling_active.store(true, Ordering::SeqCst);
        info!("Polling for speed limits every {:?}", interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => match run_cycle(&state).await {
                    Ok(reading) => debug!(
                        "Published {:?} {} from {}",
                        reading.outcome.reading.speed_limit,
                        reading.outcome.reading.unit,
                        reading.outcome.active_provider,
                    ),
                    Err(CycleError::NoLocation) => {
                        debug!("Skipping cycle: no location reading yet")
                    }
                    Err(CycleError::Coordinate(err)) => {
                        error!("Skipping cycle: {}", err)
                    }
                },
            }
        }

        state.polling_active.store(false, Ordering::SeqCst);
        info!("Polling stopped");
    })
}
