//! Authentication routes: register, login, logout, current user.
//!
//! Register and login each issue a new personal access token; a user may hold
//! any number of them. Logout revokes only the token used on that request.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use polyglot_common::{
    error::{PolyglotError, PolyglotResult},
    models::{LoginRequest, RegisterRequest, User, UserResponse},
    validation::validate_request,
};
use polyglot_db::{
    is_unique_violation,
    repository::{tokens, users},
};
use serde::Serialize;

use crate::{auth, extract::json_body, middleware::AuthContext, AppState};

const EMAIL_TAKEN: &str = "The email has already been taken.";

/// Auth router. `/logout` and `/user` sit behind the token check.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/user", get(me))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

/// POST /api/register
async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> PolyglotResult<(StatusCode, Json<AuthResponse>)> {
    let body = json_body(body)?;
    validate_request(&body)?;

    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(PolyglotError::invalid("body", "The request body is incomplete."));
    };
    let name = name.trim();
    let email = email.trim();

    if users::find_by_email(&state.db.pool, email).await?.is_some() {
        return Err(PolyglotError::invalid("email", EMAIL_TAKEN));
    }

    let password_hash = auth::hash_password(&password)
        .map_err(|e| PolyglotError::Internal(anyhow::anyhow!("{e}")))?;

    let user = users::create_user(&state.db.pool, name, email, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PolyglotError::invalid("email", EMAIL_TAKEN)
            } else {
                e.into()
            }
        })?;

    let token = issue_token(&state, &user).await?;

    tracing::info!(user_id = user.id, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
            message: "User Registered.",
        }),
    ))
}

/// POST /api/login
async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> PolyglotResult<Json<AuthResponse>> {
    let body = json_body(body)?;
    validate_request(&body)?;

    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(PolyglotError::InvalidCredentials);
    };

    let Some(user) = users::find_by_email(&state.db.pool, email.trim()).await? else {
        auth::verify_dummy_password(&password);
        return Err(PolyglotError::InvalidCredentials);
    };

    let valid = auth::verify_password(&password, &user.password_hash)
        .map_err(|_| PolyglotError::InvalidCredentials)?;
    if !valid {
        return Err(PolyglotError::InvalidCredentials);
    }

    let token = issue_token(&state, &user).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
        message: "User Logged In",
    }))
}

/// POST /api/logout
async fn logout(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> PolyglotResult<Json<LogoutResponse>> {
    // Already gone if the same token logged out concurrently.
    if !tokens::delete_token(&state.db.pool, auth.token_id).await? {
        return Err(PolyglotError::Unauthenticated);
    }

    tracing::info!(user_id = auth.user_id, token_id = auth.token_id, "User logged out");

    Ok(Json(LogoutResponse {
        message: "User Logged out",
    }))
}

/// GET /api/user
async fn me(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> PolyglotResult<Json<UserResponse>> {
    let user = users::find_by_id(&state.db.pool, auth.user_id)
        .await?
        .ok_or(PolyglotError::Unauthenticated)?;
    Ok(Json(user.into()))
}

/// Store a new token for `user` and return its plaintext, which is never
/// retrievable again.
async fn issue_token(state: &AppState, user: &User) -> PolyglotResult<String> {
    let token = auth::generate_token();
    tokens::create_token(
        &state.db.pool,
        user.id,
        tokens::API_TOKEN_NAME,
        &auth::hash_token(&token),
    )
    .await?;
    Ok(token)
}
