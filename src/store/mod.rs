//! Storage seams for the menu, the order collection and admin credentials.
//!
//! Services only talk to these traits; the crate ships in-memory
//! implementations in [`memory`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Admin, Order, PizzaExtra, PizzaFlavor, PizzaType},
};

pub mod memory;
pub mod seed;

pub use memory::{MemoryCatalogStore, MemoryCredentialStore, MemoryOrderStore};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_types(&self) -> AppResult<Vec<PizzaType>>;
    async fn get_type(&self, id: Uuid) -> AppResult<Option<PizzaType>>;
    async fn insert_type(&self, pizza_type: PizzaType) -> AppResult<PizzaType>;
    async fn update_type(&self, pizza_type: PizzaType) -> AppResult<PizzaType>;
    async fn delete_type(&self, id: Uuid) -> AppResult<()>;

    async fn list_flavors(&self) -> AppResult<Vec<PizzaFlavor>>;
    async fn get_flavor(&self, id: Uuid) -> AppResult<Option<PizzaFlavor>>;
    async fn insert_flavor(&self, flavor: PizzaFlavor) -> AppResult<PizzaFlavor>;
    async fn update_flavor(&self, flavor: PizzaFlavor) -> AppResult<PizzaFlavor>;
    async fn delete_flavor(&self, id: Uuid) -> AppResult<()>;

    async fn list_extras(&self) -> AppResult<Vec<PizzaExtra>>;
    async fn get_extra(&self, id: Uuid) -> AppResult<Option<PizzaExtra>>;
    async fn insert_extra(&self, extra: PizzaExtra) -> AppResult<PizzaExtra>;
    async fn update_extra(&self, extra: PizzaExtra) -> AppResult<PizzaExtra>;
    async fn delete_extra(&self, id: Uuid) -> AppResult<()>;
}

/// Result of appending an order under an optional idempotency key.
#[derive(Debug, Clone)]
pub enum AppendOutcome {
    Created(Order),
    /// The key was seen before; nothing was appended.
    Replayed(Order),
}

impl AppendOutcome {
    pub fn into_order(self) -> Order {
        match self {
            AppendOutcome::Created(order) | AppendOutcome::Replayed(order) => order,
        }
    }
}

/// Mutation applied to a single order while the store holds it exclusively.
/// Returning an error discards the mutation.
pub type OrderPatch<'a> = &'a (dyn Fn(&mut Order) -> AppResult<()> + Send + Sync);

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Snapshot of every order, in insertion order.
    async fn list_orders(&self) -> AppResult<Vec<Order>>;
    async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>>;
    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Option<Order>>;
    /// Appends `order` unless `idempotency_key` was already used, in which
    /// case the earlier order is returned and nothing is written.
    async fn append_order(
        &self,
        order: Order,
        idempotency_key: Option<String>,
    ) -> AppResult<AppendOutcome>;
    /// Fails with `NotFound` when no order has this id.
    async fn update_order(&self, id: Uuid, patch: OrderPatch<'_>) -> AppResult<Order>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `None` for both unknown usernames and wrong passwords.
    async fn verify(&self, username: &str, password: &str) -> AppResult<Option<Admin>>;
    async fn find_admin(&self, id: Uuid) -> AppResult<Option<Admin>>;
}
