use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PizzaType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "30.00")]
    pub base_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PizzaFlavor {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub type_id: Uuid,
    /// Added on top of the type's base price.
    #[schema(value_type = String, example = "5.00")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PizzaExtra {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "3.00")]
    pub price: Decimal,
}

/// A priced line of a cart. Type, flavor and extras are snapshots taken when
/// the line was composed, so later menu edits never reprice it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub pizza_type: PizzaType,
    pub flavor: PizzaFlavor,
    pub extras: Vec<PizzaExtra>,
    pub observations: String,
    pub quantity: u32,
    #[schema(value_type = String, example = "80.00")]
    pub total_price: Decimal,
}

impl CartItem {
    /// Price of a single pizza of this composition.
    pub fn unit_price(&self) -> Decimal {
        unit_price(&self.pizza_type, &self.flavor, &self.extras)
    }
}

pub fn unit_price(pizza_type: &PizzaType, flavor: &PizzaFlavor, extras: &[PizzaExtra]) -> Decimal {
    let extras_total: Decimal = extras.iter().map(|extra| extra.price).sum();
    pizza_type.base_price + flavor.price + extras_total
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub name: String,
    pub whatsapp: String,
    pub cpf: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryAddress {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Delivery,
    Pickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Elo,
    Amex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Payment {
    Cash,
    Card {
        card_brand: CardBrand,
        card_type: CardType,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    Preparing,
    OutForDelivery,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// The next status on the happy path, if any.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Received => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    /// Forward adjacency plus cancellation from any non-terminal status.
    pub fn can_advance_to(&self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == OrderStatus::Cancelled || self.next() == Some(target)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(OrderStatus::Received),
            "preparing" => Ok(OrderStatus::Preparing),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<CartItem>,
    pub customer: Customer,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<DeliveryAddress>,
    pub payment: Payment,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    #[schema(value_type = String, example = "80.00")]
    pub subtotal: Decimal,
    #[schema(value_type = String, example = "0.00")]
    pub delivery_fee: Decimal,
    #[schema(value_type = String, example = "80.00")]
    pub total_amount: Decimal,
    pub observations: Option<String>,
}

/// Authenticated staff principal. Never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Revenue {
    #[schema(value_type = String)]
    pub today: Decimal,
    #[schema(value_type = String)]
    pub week: Decimal,
    #[schema(value_type = String)]
    pub month: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub today_orders: u64,
    pub weekly_orders: u64,
    pub monthly_orders: u64,
    pub pending_orders: u64,
    pub revenue: Revenue,
}
