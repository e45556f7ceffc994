use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{CardBrand, CardType, Customer, DeliveryAddress, DeliveryType, Order, Payment},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// Payment as submitted by the checkout form; card fields are only read for
/// card payments.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub card_brand: Option<CardBrand>,
    pub card_type: Option<CardType>,
}

impl TryFrom<PaymentRequest> for Payment {
    type Error = AppError;

    fn try_from(value: PaymentRequest) -> Result<Self, Self::Error> {
        match value.method {
            PaymentMethod::Cash => Ok(Payment::Cash),
            PaymentMethod::Card => match (value.card_brand, value.card_type) {
                (Some(card_brand), Some(card_type)) => Ok(Payment::Card {
                    card_brand,
                    card_type,
                }),
                _ => Err(AppError::validation(
                    "card payments require card_brand and card_type",
                )),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub customer: Customer,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<DeliveryAddress>,
    pub payment: PaymentRequest,
    pub observations: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
