use crate::model::{Order, OrderCreate, OrderId, OrderStatus};
use crate::order_actor::{progress_percentage, OrderAction, OrderActionResult, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Runs the order factory and prepends the new order to the history.
    #[instrument(skip(self, params), fields(items = params.items.len(), total = params.totals.total))]
    pub async fn place(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(?params, "place called");
        info!("Sending create to order actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// `Ok(None)` when no order has this id.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.get(id).await
    }

    /// Every order, most recently placed first.
    #[instrument(skip(self))]
    pub async fn order_history(&self) -> Result<Vec<Order>, OrderError> {
        self.list().await
    }

    /// Applies due transitions to one order. `Ok(None)` when the order does not exist.
    #[instrument(skip(self))]
    pub async fn advance(
        &self,
        id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<Option<Vec<OrderStatus>>, OrderError> {
        match self.inner.perform_action(id, OrderAction::Advance { now }).await {
            Ok(OrderActionResult::Advance(appended)) => Ok(Some(appended)),
            Err(FrameworkError::NotFound(_)) => Ok(None),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Advances every order in one actor turn. Returns only the orders that moved.
    #[instrument(skip(self))]
    pub async fn tick_all(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(OrderId, Vec<OrderStatus>)>, OrderError> {
        let results = self
            .inner
            .broadcast(OrderAction::Advance { now })
            .await
            .map_err(Self::map_error)?;

        let mut moved = Vec::new();
        for (id, result) in results {
            match result {
                Ok(OrderActionResult::Advance(appended)) if !appended.is_empty() => {
                    info!(order_id = %id, ?appended, "Order advanced");
                    moved.push((id, appended));
                }
                Ok(_) => {}
                Err(e) => warn!(order_id = %id, error = %e, "Advance failed"),
            }
        }
        Ok(moved)
    }

    /// Tracking progress of an order. `Ok(None)` when it does not exist.
    #[instrument(skip(self))]
    pub async fn progress(&self, id: OrderId) -> Result<Option<u8>, OrderError> {
        Ok(self
            .get(id)
            .await?
            .map(|order| progress_percentage(&order.status)))
    }

    /// Drops the whole history.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<usize, OrderError> {
        self.inner.reset().await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<OrderError>() {
            Ok(order_error) => order_error,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => OrderError::AlreadyExists(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
