use crate::cart_actor::{CartAction, CartActionResult, CartError};
use crate::model::{Cart, CartCreate, CartId, LineItem, QuantityChange, Sku};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Cart actor.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>) -> Self {
        Self { inner }
    }

    /// Ensures a cart exists for `session`. Opening an existing cart is not an error.
    #[instrument(skip(self))]
    pub async fn open(&self, session: CartId) -> Result<CartId, CartError> {
        match self.inner.create(CartCreate { session: session.clone() }).await {
            Ok(id) => Ok(id),
            Err(FrameworkError::AlreadyExists(_)) => Ok(session),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// The session's cart, or `NotFound` if it was never opened.
    #[instrument(skip(self))]
    pub async fn cart(&self, session: CartId) -> Result<Cart, CartError> {
        self.get(session.clone())
            .await?
            .ok_or_else(|| CartError::NotFound(session.to_string()))
    }

    /// Merges `item` into the cart. Returns the line's quantity afterwards.
    #[instrument(skip(self, item), fields(sku = %item.sku, quantity = item.quantity))]
    pub async fn add_item(&self, session: CartId, item: LineItem) -> Result<u32, CartError> {
        debug!(?item, "add_item called");
        match self.action(session, CartAction::AddItem(item)).await? {
            CartActionResult::AddItem(quantity) => Ok(quantity),
            other => Err(unexpected(other)),
        }
    }

    /// Returns whether a line was removed.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, session: CartId, sku: Sku) -> Result<bool, CartError> {
        match self.action(session, CartAction::Remove(sku)).await? {
            CartActionResult::Remove(removed) => Ok(removed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        session: CartId,
        sku: Sku,
        quantity: i64,
    ) -> Result<QuantityChange, CartError> {
        match self
            .action(session, CartAction::UpdateQuantity { sku, quantity })
            .await?
        {
            CartActionResult::UpdateQuantity(change) => Ok(change),
            other => Err(unexpected(other)),
        }
    }

    /// Empties the cart, returning how many lines were dropped.
    #[instrument(skip(self))]
    pub async fn clear(&self, session: CartId) -> Result<usize, CartError> {
        match self.action(session, CartAction::Clear).await? {
            CartActionResult::Clear(dropped) => Ok(dropped),
            other => Err(unexpected(other)),
        }
    }

    async fn action(&self, session: CartId, action: CartAction) -> Result<CartActionResult, CartError> {
        self.inner
            .perform_action(session, action)
            .await
            .map_err(Self::map_error)
    }
}

fn unexpected(result: CartActionResult) -> CartError {
    CartError::ActorCommunicationError(format!("Unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<Cart> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<Cart> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<CartError>() {
            Ok(cart_error) => cart_error,
            Err(FrameworkError::NotFound(id)) => CartError::NotFound(id),
            Err(other) => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}
