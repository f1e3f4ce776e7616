//! Background consumer of the click queue.

use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use crate::application::services::ClickRecorder;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository};

/// Drains `rx`, recording up to `concurrency` clicks at a time.
///
/// Each event is recorded independently; one failure is logged and counted
/// without affecting the others. Returns once every sender is dropped and all
/// in-flight recordings have finished.
pub async fn run_click_worker<C, L>(
    mut rx: mpsc::Receiver<ClickEvent>,
    recorder: Arc<ClickRecorder<C, L>>,
    concurrency: usize,
) where
    C: ClickRepository + ?Sized + 'static,
    L: LinkRepository + ?Sized + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let recorder = recorder.clone();

        in_flight.spawn(async move {
            let link_id = event.link_id;
            match recorder.record(event).await {
                Ok(_) => metrics::counter!("clicks_recorded_total").increment(1),
                Err(e) => {
                    error!(%link_id, error = %e, "Failed to record click");
                    metrics::counter!("clicks_failed_total").increment(1);
                }
            }
            drop(permit);
        });

        // Reap finished tasks so the set does not grow unbounded.
        while let Some(finished) = in_flight.try_join_next() {
            reap(finished);
        }
    }

    while let Some(finished) = in_flight.join_next().await {
        reap(finished);
    }
    info!("Click worker stopped");
}

fn reap(finished: Result<(), JoinError>) {
    if let Err(e) = finished {
        error!(error = %e, "Click recording task aborted");
        metrics::counter!("clicks_failed_total").increment(1);
    }
}
