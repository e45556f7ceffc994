#![allow(dead_code)]

use std::time::Duration;

use chrono::FixedOffset;
use pizzaria_api::{
    config::{AppConfig, StatusPolicy},
    dto::orders::{CheckoutRequest, PaymentMethod, PaymentRequest},
    middleware::auth::{ADMIN_ROLE, AuthAdmin},
    models::{Customer, DeliveryAddress, DeliveryType, PizzaExtra, PizzaFlavor, PizzaType},
    state::AppState,
    store::MemoryCatalogStore,
};
use rust_decimal::Decimal;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "gerente";
pub const ADMIN_PASSWORD: &str = "s3nh4-forte";

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn test_config(policy: StatusPolicy) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        admin_username: ADMIN_USERNAME.into(),
        admin_password: ADMIN_PASSWORD.into(),
        admin_name: "Gerente".into(),
        store_offset: FixedOffset::west_opt(3 * 3600).expect("valid offset"),
        status_policy: policy,
        request_timeout: Duration::from_secs(5),
    }
}

/// Menu with round prices the tests can reason about.
pub struct Fixture {
    pub grande: PizzaType,
    pub broto: PizzaType,
    pub calabresa: PizzaFlavor,
    pub mussarela_broto: PizzaFlavor,
    pub bacon: PizzaExtra,
    pub borda: PizzaExtra,
}

impl Fixture {
    pub fn new() -> Self {
        let grande = PizzaType {
            id: Uuid::new_v4(),
            name: "Grande".into(),
            description: "8 fatias".into(),
            base_price: money(3000),
        };
        let broto = PizzaType {
            id: Uuid::new_v4(),
            name: "Broto".into(),
            description: "4 fatias".into(),
            base_price: money(1500),
        };
        let calabresa = PizzaFlavor {
            id: Uuid::new_v4(),
            name: "Calabresa".into(),
            description: "Calabresa e cebola".into(),
            type_id: grande.id,
            price: money(500),
        };
        let mussarela_broto = PizzaFlavor {
            id: Uuid::new_v4(),
            name: "Mussarela".into(),
            description: "Mussarela e orégano".into(),
            type_id: broto.id,
            price: money(500),
        };
        let bacon = PizzaExtra {
            id: Uuid::new_v4(),
            name: "Bacon".into(),
            description: "Porção extra".into(),
            price: money(300),
        };
        let borda = PizzaExtra {
            id: Uuid::new_v4(),
            name: "Borda".into(),
            description: "Borda recheada".into(),
            price: money(200),
        };
        Self {
            grande,
            broto,
            calabresa,
            mussarela_broto,
            bacon,
            borda,
        }
    }

    pub fn catalog(&self) -> MemoryCatalogStore {
        MemoryCatalogStore::new(
            vec![self.grande.clone(), self.broto.clone()],
            vec![self.calabresa.clone(), self.mussarela_broto.clone()],
            vec![self.bacon.clone(), self.borda.clone()],
        )
    }
}

pub async fn setup_state(policy: StatusPolicy) -> anyhow::Result<(AppState, Fixture)> {
    let fixture = Fixture::new();
    let state = AppState::in_memory_with_catalog(test_config(policy), fixture.catalog()).await?;
    Ok((state, fixture))
}

pub fn admin_principal() -> AuthAdmin {
    AuthAdmin {
        admin_id: Uuid::new_v4(),
        username: ADMIN_USERNAME.into(),
        role: ADMIN_ROLE.into(),
    }
}

pub fn customer() -> Customer {
    Customer {
        name: "Ana Souza".into(),
        whatsapp: "+55 11 99999-0000".into(),
        cpf: "123.456.789-09".into(),
        birth_date: None,
        email: "ana@example.com".into(),
    }
}

pub fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "Rua das Flores".into(),
        number: "42".into(),
        complement: None,
        neighborhood: "Centro".into(),
        city: "São Paulo".into(),
        zip_code: "01000-000".into(),
    }
}

pub fn cash() -> PaymentRequest {
    PaymentRequest {
        method: PaymentMethod::Cash,
        card_brand: None,
        card_type: None,
    }
}

pub fn delivery_checkout() -> CheckoutRequest {
    CheckoutRequest {
        customer: customer(),
        delivery_type: DeliveryType::Delivery,
        delivery_address: Some(address()),
        payment: cash(),
        observations: None,
    }
}

pub fn pickup_checkout() -> CheckoutRequest {
    CheckoutRequest {
        customer: customer(),
        delivery_type: DeliveryType::Pickup,
        delivery_address: None,
        payment: cash(),
        observations: None,
    }
}
