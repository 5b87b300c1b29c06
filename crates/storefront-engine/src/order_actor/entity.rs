//! ActorEntity implementation for [`Order`].
//!
//! `from_create_params` is the order factory: it turns a priced cart snapshot into an
//! order in the `Placed` state with a one-entry timeline. The only mutation afterwards is
//! delivery progression.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use super::lifecycle::{self, DeliverySchedule};
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, TimelineEntry};
use actor_framework::ActorEntity;
use async_trait::async_trait;

/// Runtime context for the order actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderContext {
    pub schedule: DeliverySchedule,
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.order_id
    }

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        let t = params.totals;
        let sum = t
            .subtotal
            .checked_add(t.shipping)
            .and_then(|s| s.checked_add(t.tax));
        if sum != Some(t.total) {
            return Err(OrderError::ValidationError(format!(
                "total {} does not equal {} + {} + {}",
                t.total, t.subtotal, t.shipping, t.tax
            )));
        }

        Ok(Order {
            order_id: id,
            items: params.items,
            totals: params.totals,
            payment: params.payment,
            address: params.address,
            placed_at: params.placed_at,
            status: OrderStatus::Placed,
            timeline: vec![TimelineEntry {
                status: OrderStatus::Placed,
                timestamp: params.placed_at,
            }],
        })
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Advance { now } => Ok(OrderActionResult::Advance(lifecycle::advance(
                self,
                now,
                &ctx.schedule,
            ))),
        }
    }

    fn state_changed(result: &OrderActionResult) -> bool {
        match result {
            OrderActionResult::Advance(appended) => !appended.is_empty(),
        }
    }
}
