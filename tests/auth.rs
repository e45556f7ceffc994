mod common;

use common::{ADMIN_PASSWORD, ADMIN_USERNAME, setup_state};
use jsonwebtoken::{DecodingKey, Validation, decode};
use pizzaria_api::{
    config::StatusPolicy,
    dto::auth::{Claims, LoginRequest},
    error::AppError,
    middleware::auth::AuthAdmin,
    services::auth_service,
    store::MemoryCredentialStore,
};
use uuid::Uuid;

#[tokio::test]
async fn correct_credentials_return_the_admin() -> anyhow::Result<()> {
    let (state, _fx) = setup_state(StatusPolicy::Lenient).await?;

    let admin = auth_service::authenticate(state.credentials.as_ref(), ADMIN_USERNAME, ADMIN_PASSWORD)
        .await?
        .expect("admin");

    assert_eq!(admin.username, ADMIN_USERNAME);
    assert_eq!(admin.name, "Gerente");
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() -> anyhow::Result<()> {
    let (state, _fx) = setup_state(StatusPolicy::Lenient).await?;

    let wrong_password =
        auth_service::authenticate(state.credentials.as_ref(), ADMIN_USERNAME, "nope").await?;
    let unknown_user =
        auth_service::authenticate(state.credentials.as_ref(), "ninguem", ADMIN_PASSWORD).await?;
    assert!(wrong_password.is_none());
    assert!(unknown_user.is_none());

    let err = auth_service::login_admin(
        &state,
        LoginRequest {
            username: ADMIN_USERNAME.into(),
            password: "nope".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    let err = auth_service::login_admin(
        &state,
        LoginRequest {
            username: "ninguem".into(),
            password: ADMIN_PASSWORD.into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
    Ok(())
}

#[tokio::test]
async fn login_issues_an_admin_token() -> anyhow::Result<()> {
    let (state, _fx) = setup_state(StatusPolicy::Lenient).await?;

    let resp = auth_service::login_admin(
        &state,
        LoginRequest {
            username: ADMIN_USERNAME.to_uppercase(),
            password: ADMIN_PASSWORD.into(),
        },
    )
    .await?
    .data
    .expect("login");

    let token = resp.token.strip_prefix("Bearer ").expect("bearer prefix");
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;
    assert_eq!(claims.sub, resp.admin.id.to_string());
    assert_eq!(claims.role, "admin");

    let principal = AuthAdmin {
        admin_id: resp.admin.id,
        username: claims.username,
        role: claims.role,
    };
    let me = auth_service::current_admin(&state, &principal)
        .await?
        .data
        .expect("admin");
    assert_eq!(me, resp.admin);
    Ok(())
}

#[tokio::test]
async fn non_admin_role_is_rejected() -> anyhow::Result<()> {
    let (state, _fx) = setup_state(StatusPolicy::Lenient).await?;
    let principal = AuthAdmin {
        admin_id: Uuid::new_v4(),
        username: "cliente".into(),
        role: "customer".into(),
    };

    let err = auth_service::current_admin(&state, &principal)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn duplicate_usernames_are_rejected() -> anyhow::Result<()> {
    let store = MemoryCredentialStore::new()?;
    store.add_admin("Caixa", "segredo", "Caixa").await?;

    let err = store.add_admin(" caixa ", "outro", "Outro").await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    Ok(())
}
