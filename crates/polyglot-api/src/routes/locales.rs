//! Locale routes.
//!
//! GET    /locales      : Paginated list, filtered by `name` / `short_code`
//! POST   /locales      : Create a locale
//! GET    /locales/{id} : Fetch one locale
//! PUT    /locales/{id} : Replace name and short code
//! DELETE /locales/{id} : Delete a locale

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use polyglot_common::{
    error::{PolyglotError, PolyglotResult},
    models::{Locale, LocaleDraft, LocaleListQuery, LocaleRequest, MutationResponse},
    pagination::{PageRequest, Paginated},
    validation::{validate_request, FieldErrors},
};
use polyglot_db::{
    is_unique_violation,
    repository::locales::{self, LocaleConflicts},
};

use crate::{
    extract::{json_body, path_id, query_params},
    AppState,
};

const RESOURCE: &str = "Locale";

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/locales", get(list_locales).post(create_locale))
        .route(
            "/locales/{id}",
            get(get_locale).put(update_locale).delete(delete_locale),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ))
}

async fn list_locales(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LocaleListQuery>, QueryRejection>,
) -> PolyglotResult<Json<Paginated<Locale>>> {
    let query = query_params(query)?;
    let page = PageRequest::new(query.page, query.per_page, state.config.pagination);

    let result = locales::list_locales(
        &state.db.pool,
        query.name.as_deref(),
        query.short_code.as_deref(),
        page,
    )
    .await?;

    Ok(Json(result))
}

async fn create_locale(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LocaleRequest>, JsonRejection>,
) -> PolyglotResult<(StatusCode, Json<MutationResponse<Locale>>)> {
    let draft = validated_draft(json_body(body)?)?;
    ensure_available(&state, &draft, None).await?;

    let locale = match locales::create_locale(&state.db.pool, &draft).await {
        Ok(locale) => locale,
        Err(e) if is_unique_violation(&e) => {
            return Err(lost_race(&state, &draft, None, e).await);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(locale_id = locale.id, short_code = ?locale.short_code, "Locale created");

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::with_data("Locale created.", locale)),
    ))
}

async fn get_locale(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> PolyglotResult<Json<Locale>> {
    let id = path_id(id, RESOURCE)?;
    let locale = locales::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| PolyglotError::not_found(RESOURCE))?;
    Ok(Json(locale))
}

async fn update_locale(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<LocaleRequest>, JsonRejection>,
) -> PolyglotResult<Json<MutationResponse<Locale>>> {
    let id = path_id(id, RESOURCE)?;
    if locales::find_by_id(&state.db.pool, id).await?.is_none() {
        return Err(PolyglotError::not_found(RESOURCE));
    }

    let draft = validated_draft(json_body(body)?)?;
    ensure_available(&state, &draft, Some(id)).await?;

    let locale = match locales::update_locale(&state.db.pool, id, &draft).await {
        Ok(Some(locale)) => locale,
        Ok(None) => return Err(PolyglotError::not_found(RESOURCE)),
        Err(e) if is_unique_violation(&e) => {
            return Err(lost_race(&state, &draft, Some(id), e).await);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(locale_id = locale.id, "Locale updated");

    Ok(Json(MutationResponse::with_data("Locale updated.", locale)))
}

async fn delete_locale(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> PolyglotResult<Json<MutationResponse<()>>> {
    let id = path_id(id, RESOURCE)?;
    if !locales::delete_locale(&state.db.pool, id).await? {
        return Err(PolyglotError::not_found(RESOURCE));
    }

    tracing::info!(locale_id = id, "Locale deleted");

    Ok(Json(MutationResponse::ok("Locale deleted.")))
}

fn validated_draft(body: LocaleRequest) -> PolyglotResult<LocaleDraft> {
    validate_request(&body)?;
    body.into_draft()
        .ok_or_else(|| PolyglotError::invalid("body", "The request body is incomplete."))
}

/// Reject a draft whose name or short code belongs to another locale.
async fn ensure_available(
    state: &AppState,
    draft: &LocaleDraft,
    exclude_id: Option<i64>,
) -> PolyglotResult<()> {
    let conflicts = locales::find_conflicts(&state.db.pool, draft, exclude_id).await?;
    taken_errors(conflicts).into_result()
}

/// A concurrent write claimed the name or short code after our check.
async fn lost_race(
    state: &AppState,
    draft: &LocaleDraft,
    exclude_id: Option<i64>,
    original: sqlx::Error,
) -> PolyglotError {
    match ensure_available(state, draft, exclude_id).await {
        Err(e) => e,
        Ok(()) => original.into(),
    }
}

fn taken_errors(conflicts: LocaleConflicts) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if conflicts.name {
        errors.add("name", "The name has already been taken.");
    }
    if conflicts.short_code {
        errors.add("short_code", "The short code has already been taken.");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taken_errors_report_each_field() {
        let errors = taken_errors(LocaleConflicts {
            name: true,
            short_code: true,
        });
        let Err(PolyglotError::Validation { errors }) = errors.into_result() else {
            panic!("expected validation error");
        };
        let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["name", "short_code"]);
    }

    #[test]
    fn no_conflicts_pass() {
        assert!(taken_errors(LocaleConflicts::default()).into_result().is_ok());
    }
}
