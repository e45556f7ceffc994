use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::{CartItemRequest, CartView, UpdateQuantityRequest},
        menu::{Menu, MenuFlavor, PizzaExtraRequest, PizzaFlavorRequest, PizzaTypeRequest},
        orders::{CheckoutRequest, OrderList, PaymentMethod, PaymentRequest, UpdateOrderStatusRequest},
    },
    models::{
        Admin, CardBrand, CardType, CartItem, Customer, DashboardStats, DeliveryAddress,
        DeliveryType, Order, OrderStatus, Payment, PizzaExtra, PizzaFlavor, PizzaType, Revenue,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, menu, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::me,
        menu::get_menu,
        cart::open_cart,
        cart::get_cart,
        cart::close_cart,
        cart::add_item,
        cart::clear_cart,
        cart::replace_item,
        cart::remove_item,
        cart::update_quantity,
        cart::checkout,
        orders::track_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::dashboard,
        admin::create_type,
        admin::update_type,
        admin::delete_type,
        admin::create_flavor,
        admin::update_flavor,
        admin::delete_flavor,
        admin::create_extra,
        admin::update_extra,
        admin::delete_extra
    ),
    components(
        schemas(
            Admin,
            PizzaType,
            PizzaFlavor,
            PizzaExtra,
            CartItem,
            Customer,
            DeliveryAddress,
            DeliveryType,
            CardBrand,
            CardType,
            Payment,
            OrderStatus,
            Order,
            Revenue,
            DashboardStats,
            LoginRequest,
            LoginResponse,
            CartItemRequest,
            UpdateQuantityRequest,
            CartView,
            Menu,
            MenuFlavor,
            PizzaTypeRequest,
            PizzaFlavorRequest,
            PizzaExtraRequest,
            CheckoutRequest,
            PaymentMethod,
            PaymentRequest,
            UpdateOrderStatusRequest,
            OrderList,
            params::Pagination,
            params::SortOrder,
            params::OrderListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CartView>,
            ApiResponse<Menu>,
            ApiResponse<DashboardStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Menu browsing and management"),
        (name = "Cart", description = "Cart sessions and checkout"),
        (name = "Orders", description = "Order tracking"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
