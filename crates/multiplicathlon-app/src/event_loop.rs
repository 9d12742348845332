//! Async event loop: feeds rendering events and timer ticks to the
//! controller and forwards its view updates.
//!
//! The interval only fires while a time-limit session is running, so an
//! ended session never receives a stale tick.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::controller::{GameController, UiEvent, ViewUpdate};

/// Countdown refresh period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Runs until the event channel closes or the view hangs up, then returns
/// the controller.
///
/// Rejected events are logged and otherwise ignored.
pub async fn run(
    mut controller: GameController,
    mut events: mpsc::Receiver<UiEvent>,
    updates: mpsc::Sender<ViewUpdate>,
    tick_period: Duration,
) -> GameController {
    let mut ticker = tokio::time::interval(tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!("event loop started");

    loop {
        let event = tokio::select! {
            received = events.recv() => match received {
                Some(event) => event,
                None => break,
            },
            _ = ticker.tick(), if controller.has_running_countdown() => UiEvent::Tick,
        };

        match controller.handle(event).await {
            Ok(view_updates) => {
                for update in view_updates {
                    if updates.send(update).await.is_err() {
                        info!("view closed, stopping event loop");
                        return controller;
                    }
                }
            }
            Err(e) => warn!(error = %e, "event rejected"),
        }
    }

    info!("event channel closed, stopping event loop");
    controller
}
