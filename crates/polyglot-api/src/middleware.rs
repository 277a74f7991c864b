//! Middleware: bearer-token authentication and security headers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use polyglot_common::error::PolyglotError;
use polyglot_db::repository::tokens;

use crate::{auth, AppState};

/// Authentication context extracted from the Authorization header.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: i64,
    /// The token presented on this request; logout revokes exactly this one.
    pub token_id: i64,
}

/// Resolve `Authorization: Bearer <token>` to a live token and attach an
/// [`AuthContext`] to the request. Anything else is a 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, PolyglotError> {
    let token = bearer_token(request.headers()).ok_or(PolyglotError::Unauthenticated)?;

    let stored = tokens::find_by_hash(&state.db.pool, &auth::hash_token(token))
        .await?
        .ok_or(PolyglotError::Unauthenticated)?;

    if stored.is_expired(state.config.auth.token_ttl(), Utc::now()) {
        tracing::debug!(token_id = stored.id, "Rejected expired token");
        return Err(PolyglotError::Unauthenticated);
    }

    // Bookkeeping only; a failed stamp must not fail the request.
    if let Err(e) = tokens::touch_last_used(&state.db.pool, stored.id).await {
        tracing::warn!(token_id = stored.id, error = %e, "Failed to record token use");
    }

    request.extensions_mut().insert(AuthContext {
        user_id: stored.user_id,
        token_id: stored.id,
    });

    Ok(next.run(request).await)
}

/// The credential part of a `Bearer` authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// ── Security headers ──────────────────────────────────────────────────────────

/// Add security headers to every HTTP response.
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Referrer-Policy: no-referrer`
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let h = response.headers_mut();

    h.insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    h.insert(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    h.insert(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("no-referrer"),
    );

    response
}
