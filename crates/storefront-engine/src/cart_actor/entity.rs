//! ActorEntity implementation for [`Cart`].
//!
//! The cart actor keeps one cart per session. All quantity arithmetic lives on
//! [`Cart`] itself; this impl only validates input and applies the session's policy.

use super::actions::{CartAction, CartActionResult};
use super::error::CartError;
use crate::model::{Cart, CartCreate, CartId, CartPolicy};
use actor_framework::ActorEntity;
use async_trait::async_trait;

/// Runtime context for the cart actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartContext {
    pub policy: CartPolicy,
}

#[async_trait]
impl ActorEntity for Cart {
    type Id = CartId;
    type Create = CartCreate;
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Context = CartContext;
    type Error = CartError;

    fn id(&self) -> &CartId {
        &self.id
    }

    fn from_create_params(id: CartId, _params: CartCreate) -> Result<Self, CartError> {
        Ok(Cart::new(id))
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        ctx: &CartContext,
    ) -> Result<CartActionResult, CartError> {
        match action {
            CartAction::AddItem(item) => {
                if item.quantity == 0 {
                    return Err(CartError::InvalidQuantity(0));
                }
                if ctx.policy == CartPolicy::ClampToStock
                    && item.stock_ceiling == 0
                {
                    return Err(CartError::OutOfStock(item.sku.to_string()));
                }
                Ok(CartActionResult::AddItem(self.add(item, ctx.policy)))
            }
            CartAction::Remove(sku) => Ok(CartActionResult::Remove(self.remove(&sku))),
            CartAction::UpdateQuantity { sku, quantity } => Ok(CartActionResult::UpdateQuantity(
                self.update_quantity(&sku, quantity, ctx.policy),
            )),
            CartAction::Clear => Ok(CartActionResult::Clear(self.clear())),
        }
    }

    fn state_changed(result: &CartActionResult) -> bool {
        result.changed()
    }
}
