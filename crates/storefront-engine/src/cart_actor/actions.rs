//! Custom actions for the Cart actor.
//!
//! Each action is handled by [`Cart`](crate::model::Cart)'s
//! [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action).

use crate::model::{LineItem, QuantityChange, Sku};

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Merges the line into the cart. Quantity 0 is rejected.
    AddItem(LineItem),
    Remove(Sku),
    /// Sets the quantity; `<= 0` removes the line.
    UpdateQuantity { sku: Sku, quantity: i64 },
    Clear,
}

/// Results from CartActions - variants match 1:1 with CartAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartActionResult {
    /// Quantity of the line after the merge; 0 when the policy dropped the line.
    AddItem(u32),
    /// Whether a line was removed.
    Remove(bool),
    UpdateQuantity(QuantityChange),
    /// Number of lines dropped.
    Clear(usize),
}

impl CartActionResult {
    pub fn changed(&self) -> bool {
        match self {
            CartActionResult::AddItem(_) => true,
            CartActionResult::Remove(removed) => *removed,
            CartActionResult::UpdateQuantity(change) => *change != QuantityChange::Untouched,
            CartActionResult::Clear(dropped) => *dropped > 0,
        }
    }
}
