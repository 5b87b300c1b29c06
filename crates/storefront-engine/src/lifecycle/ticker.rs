use crate::clients::OrderClient;
use crate::clock::Clock;
use crate::order_actor::OrderError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// A running delivery scheduler. Progression does not depend on it: it only asks the
/// order actor to catch up with the clock every `period`.
pub struct Ticker {
    task: JoinHandle<()>,
}

impl Ticker {
    /// Stops the task. Its order client is dropped with it.
    pub async fn stop(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Spawns a task that advances every order to `clock.now()` once per `period`.
/// A zero period is raised to one millisecond.
pub fn spawn_ticker(orders: OrderClient, clock: Arc<dyn Clock>, period: Duration) -> Ticker {
    if period < MIN_PERIOD {
        warn!(?period, "Ticker period too short, using 1ms");
    }
    let period = period.max(MIN_PERIOD);
    let task = tokio::spawn(async move {
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_ms = period.as_millis() as u64, "Delivery ticker started");

        loop {
            tick.tick().await;
            match orders.tick_all(clock.now()).await {
                Ok(moved) if !moved.is_empty() => debug!(moved = moved.len(), "Tick"),
                Ok(_) => {}
                Err(OrderError::ActorCommunicationError(e)) => {
                    info!(reason = %e, "Order actor gone, delivery ticker stopping");
                    break;
                }
                Err(e) => warn!(error = %e, "Tick failed"),
            }
        }
    });
    Ticker { task }
}
