use std::collections::HashMap;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use async_trait::async_trait;
use password_hash::rand_core::OsRng;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Admin, Order, PizzaExtra, PizzaFlavor, PizzaType},
    store::{AppendOutcome, CatalogStore, CredentialStore, OrderPatch, OrderStore},
};

trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for PizzaType {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for PizzaFlavor {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for PizzaExtra {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Insertion-ordered collection keyed by id.
struct Table<T> {
    rows: RwLock<Vec<T>>,
}

impl<T: Keyed + Clone> Table<T> {
    fn new(rows: Vec<T>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    async fn all(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.iter().find(|row| row.key() == id).cloned()
    }

    async fn insert(&self, row: T) -> T {
        self.rows.write().await.push(row.clone());
        row
    }

    async fn replace(&self, row: T) -> AppResult<T> {
        let mut rows = self.rows.write().await;
        let slot = rows
            .iter_mut()
            .find(|existing| existing.key() == row.key())
            .ok_or(AppError::NotFound)?;
        *slot = row.clone();
        Ok(row)
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.key() != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

pub struct MemoryCatalogStore {
    types: Table<PizzaType>,
    flavors: Table<PizzaFlavor>,
    extras: Table<PizzaExtra>,
}

impl MemoryCatalogStore {
    pub fn new(types: Vec<PizzaType>, flavors: Vec<PizzaFlavor>, extras: Vec<PizzaExtra>) -> Self {
        Self {
            types: Table::new(types),
            flavors: Table::new(flavors),
            extras: Table::new(extras),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_types(&self) -> AppResult<Vec<PizzaType>> {
        Ok(self.types.all().await)
    }

    async fn get_type(&self, id: Uuid) -> AppResult<Option<PizzaType>> {
        Ok(self.types.get(id).await)
    }

    async fn insert_type(&self, pizza_type: PizzaType) -> AppResult<PizzaType> {
        Ok(self.types.insert(pizza_type).await)
    }

    async fn update_type(&self, pizza_type: PizzaType) -> AppResult<PizzaType> {
        self.types.replace(pizza_type).await
    }

    async fn delete_type(&self, id: Uuid) -> AppResult<()> {
        self.types.remove(id).await
    }

    async fn list_flavors(&self) -> AppResult<Vec<PizzaFlavor>> {
        Ok(self.flavors.all().await)
    }

    async fn get_flavor(&self, id: Uuid) -> AppResult<Option<PizzaFlavor>> {
        Ok(self.flavors.get(id).await)
    }

    async fn insert_flavor(&self, flavor: PizzaFlavor) -> AppResult<PizzaFlavor> {
        Ok(self.flavors.insert(flavor).await)
    }

    async fn update_flavor(&self, flavor: PizzaFlavor) -> AppResult<PizzaFlavor> {
        self.flavors.replace(flavor).await
    }

    async fn delete_flavor(&self, id: Uuid) -> AppResult<()> {
        self.flavors.remove(id).await
    }

    async fn list_extras(&self) -> AppResult<Vec<PizzaExtra>> {
        Ok(self.extras.all().await)
    }

    async fn get_extra(&self, id: Uuid) -> AppResult<Option<PizzaExtra>> {
        Ok(self.extras.get(id).await)
    }

    async fn insert_extra(&self, extra: PizzaExtra) -> AppResult<PizzaExtra> {
        Ok(self.extras.insert(extra).await)
    }

    async fn update_extra(&self, extra: PizzaExtra) -> AppResult<PizzaExtra> {
        self.extras.replace(extra).await
    }

    async fn delete_extra(&self, id: Uuid) -> AppResult<()> {
        self.extras.remove(id).await
    }
}

#[derive(Default)]
struct OrderBook {
    orders: Vec<Order>,
    by_key: HashMap<String, Uuid>,
}

impl OrderBook {
    fn find_keyed(&self, key: &str) -> AppResult<Option<Order>> {
        let Some(id) = self.by_key.get(key) else {
            return Ok(None);
        };
        self.orders
            .iter()
            .find(|order| order.id == *id)
            .cloned()
            .map(Some)
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "idempotency key points at a missing order"
                ))
            })
    }
}

/// Order collection. A single lock guards both the orders and the
/// idempotency index so an append and its key are recorded together.
#[derive(Default)]
pub struct MemoryOrderStore {
    book: RwLock<OrderBook>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        Ok(self.book.read().await.orders.clone())
    }

    async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>> {
        let book = self.book.read().await;
        Ok(book.orders.iter().find(|order| order.id == id).cloned())
    }

    async fn find_by_idempotency_key(&self, key: &str) -> AppResult<Option<Order>> {
        let book = self.book.read().await;
        book.find_keyed(key)
    }

    async fn append_order(
        &self,
        order: Order,
        idempotency_key: Option<String>,
    ) -> AppResult<AppendOutcome> {
        let mut book = self.book.write().await;

        if let Some(key) = idempotency_key.as_deref() {
            if let Some(existing) = book.find_keyed(key)? {
                return Ok(AppendOutcome::Replayed(existing));
            }
        }

        if let Some(key) = idempotency_key {
            book.by_key.insert(key, order.id);
        }
        book.orders.push(order.clone());
        Ok(AppendOutcome::Created(order))
    }

    async fn update_order(&self, id: Uuid, patch: OrderPatch<'_>) -> AppResult<Order> {
        let mut book = self.book.write().await;
        let slot = book
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(AppError::NotFound)?;

        // Patch a copy so a rejected patch leaves the stored order untouched.
        let mut draft = slot.clone();
        patch(&mut draft)?;
        *slot = draft.clone();
        Ok(draft)
    }
}

struct AdminCredential {
    admin: Admin,
    username_key: String,
    password_hash: String,
}

pub struct MemoryCredentialStore {
    admins: RwLock<Vec<AdminCredential>>,
    // Verified against when the username is unknown so both failures cost the same.
    decoy_hash: String,
}

impl MemoryCredentialStore {
    pub fn new() -> AppResult<Self> {
        let decoy = Uuid::new_v4().to_string();
        Ok(Self {
            admins: RwLock::new(Vec::new()),
            decoy_hash: hash_password(&decoy)?,
        })
    }

    /// Registers an admin account, hashing the password with argon2.
    pub async fn add_admin(&self, username: &str, password: &str, name: &str) -> AppResult<Admin> {
        let key = username.trim().to_lowercase();
        if key.is_empty() {
            return Err(AppError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password must not be empty"));
        }

        let mut admins = self.admins.write().await;
        if admins.iter().any(|c| c.username_key == key) {
            return Err(AppError::validation("username is already taken"));
        }

        let admin = Admin {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            name: name.to_string(),
        };
        admins.push(AdminCredential {
            admin: admin.clone(),
            username_key: key,
            password_hash: hash_password(password)?,
        });
        Ok(admin)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> AppResult<Option<Admin>> {
        let key = username.trim().to_lowercase();
        let admins = self.admins.read().await;
        let found = admins.iter().find(|c| c.username_key == key);

        let hash = found.map_or(self.decoy_hash.as_str(), |c| c.password_hash.as_str());
        let matches = verify_password(password, hash)?;

        Ok(found.filter(|_| matches).map(|c| c.admin.clone()))
    }

    async fn find_admin(&self, id: Uuid) -> AppResult<Option<Admin>> {
        let admins = self.admins.read().await;
        Ok(admins
            .iter()
            .find(|c| c.admin.id == id)
            .map(|c| c.admin.clone()))
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
