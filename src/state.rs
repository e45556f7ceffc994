use std::sync::Arc;

use crate::{
    config::{AppConfig, StatusPolicy},
    error::AppResult,
    services::cart_service::CartSessions,
    store::{
        CatalogStore, CredentialStore, MemoryCatalogStore, MemoryCredentialStore,
        MemoryOrderStore, OrderStore, seed::demo_catalog,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub carts: Arc<CartSessions>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            catalog,
            orders,
            credentials,
            carts: Arc::new(CartSessions::new()),
            config: Arc::new(config),
        }
    }

    /// In-memory state with the demo menu and the configured admin account.
    pub async fn in_memory(config: AppConfig) -> AppResult<Self> {
        Self::in_memory_with_catalog(config, demo_catalog()).await
    }

    pub async fn in_memory_with_catalog(
        config: AppConfig,
        catalog: MemoryCatalogStore,
    ) -> AppResult<Self> {
        let credentials = MemoryCredentialStore::new()?;
        let admin = credentials
            .add_admin(
                &config.admin_username,
                &config.admin_password,
                &config.admin_name,
            )
            .await?;
        tracing::info!(username = %admin.username, "seeded admin account");

        Ok(Self::new(
            config,
            Arc::new(catalog),
            Arc::new(MemoryOrderStore::new()),
            Arc::new(credentials),
        ))
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.config.status_policy
    }
}
