use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    middleware::auth::{ADMIN_ROLE, AuthAdmin, ensure_admin},
    models::Admin,
    response::{ApiResponse, Meta},
    state::AppState,
    store::CredentialStore,
};

const TOKEN_TTL_HOURS: i64 = 24;

/// Checks staff credentials. Unknown usernames and wrong passwords both
/// yield `None`.
pub async fn authenticate(
    credentials: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> AppResult<Option<Admin>> {
    credentials.verify(username, password).await
}

pub fn issue_token(admin: &Admin, secret: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: admin.id.to_string(),
        username: admin.username.clone(),
        role: ADMIN_ROLE.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn login_admin(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;

    let admin = authenticate(state.credentials.as_ref(), &username, &password)
        .await?
        .ok_or_else(|| {
            tracing::info!("admin login rejected");
            AppError::InvalidCredentials
        })?;

    let token = issue_token(&admin, &state.config.jwt_secret)?;

    audit::record(
        Some(admin.id),
        "admin_login",
        "admins",
        serde_json::json!({ "username": admin.username }),
    );

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
            admin,
        },
        Some(Meta::empty()),
    ))
}

pub async fn current_admin(state: &AppState, user: &AuthAdmin) -> AppResult<ApiResponse<Admin>> {
    ensure_admin(user)?;
    let admin = state
        .credentials
        .find_admin(user.admin_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("admin no longer exists".into()))?;
    Ok(ApiResponse::ok(admin))
}
