use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::menu::Menu,
    error::AppResult,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_menu))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "Pizza types, flavors and extras", body = ApiResponse<Menu>)
    ),
    tag = "Menu"
)]
pub async fn get_menu(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = catalog_service::get_menu(&state).await?;
    Ok(Json(resp))
}
