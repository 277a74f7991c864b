//! Translation routes.
//!
//! GET    /translations             : Paginated list, filtered by `tag` / `key` / `content`
//! POST   /translations             : Create a translation
//! GET    /translations/export/json : Stream every translation as a JSON array
//! GET    /translations/{id}        : Fetch one translation
//! PUT    /translations/{id}        : Replace a translation
//! DELETE /translations/{id}        : Delete a translation

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use polyglot_common::{
    error::{PolyglotError, PolyglotResult},
    models::{
        MutationResponse, Translation, TranslationDraft, TranslationListQuery, TranslationRequest,
    },
    pagination::{PageRequest, Paginated},
    validation::validate_request,
};
use polyglot_db::repository::{
    locales,
    translations::{self, TranslationFilter},
};

use crate::{
    export,
    extract::{json_body, path_id, query_params},
    AppState,
};

const RESOURCE: &str = "Translation";

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/translations", get(list_translations).post(create_translation))
        .route("/translations/export/json", get(export_json))
        .route(
            "/translations/{id}",
            get(get_translation)
                .put(update_translation)
                .delete(delete_translation),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ))
}

async fn list_translations(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TranslationListQuery>, QueryRejection>,
) -> PolyglotResult<Json<Paginated<Translation>>> {
    let query = query_params(query)?;
    let page = PageRequest::new(query.page, query.per_page, state.config.pagination);

    let criteria = TranslationFilter {
        tag: query.tag.as_deref(),
        key: query.key.as_deref(),
        content: query.content.as_deref(),
    };
    let result = translations::list_translations(&state.db.pool, criteria, page).await?;

    Ok(Json(result))
}

async fn create_translation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TranslationRequest>, JsonRejection>,
) -> PolyglotResult<(StatusCode, Json<MutationResponse<Translation>>)> {
    let draft = validated_draft(&state, json_body(body)?, None).await?;
    let translation = translations::create_translation(&state.db.pool, &draft).await?;

    tracing::info!(
        translation_id = translation.id,
        locale_id = translation.locale_id,
        "Translation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::with_data("Translation Created.", translation)),
    ))
}

async fn get_translation(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> PolyglotResult<Json<Translation>> {
    let id = path_id(id, RESOURCE)?;
    let translation = translations::find_by_id(&state.db.pool, id)
        .await?
        .ok_or_else(|| PolyglotError::not_found(RESOURCE))?;
    Ok(Json(translation))
}

async fn update_translation(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TranslationRequest>, JsonRejection>,
) -> PolyglotResult<Json<MutationResponse<Translation>>> {
    let id = path_id(id, RESOURCE)?;
    if translations::find_by_id(&state.db.pool, id).await?.is_none() {
        return Err(PolyglotError::not_found(RESOURCE));
    }

    let draft = validated_draft(&state, json_body(body)?, Some(id)).await?;
    let translation = translations::update_translation(&state.db.pool, id, &draft)
        .await?
        .ok_or_else(|| PolyglotError::not_found(RESOURCE))?;

    tracing::info!(translation_id = translation.id, "Translation updated");

    Ok(Json(MutationResponse::with_data("Translation Updated.", translation)))
}

async fn delete_translation(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> PolyglotResult<Json<MutationResponse<()>>> {
    let id = path_id(id, RESOURCE)?;
    if !translations::delete_translation(&state.db.pool, id).await? {
        return Err(PolyglotError::not_found(RESOURCE));
    }

    tracing::info!(translation_id = id, "Translation deleted");

    Ok(Json(MutationResponse::ok("Translation deleted.")))
}

/// GET /api/translations/export/json
async fn export_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Starting translation export");
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"translations.json\"",
            ),
        ],
        export::export_body(state.db.pool.clone()),
    )
}

/// Field validation, then the checks that need the database: the locale must
/// exist and, when configured, the key must be free within that locale.
async fn validated_draft(
    state: &AppState,
    body: TranslationRequest,
    exclude_id: Option<i64>,
) -> PolyglotResult<TranslationDraft> {
    validate_request(&body)?;
    let draft = body
        .into_draft()
        .ok_or_else(|| PolyglotError::invalid("body", "The request body is incomplete."))?;

    if !locales::exists(&state.db.pool, draft.locale_id).await? {
        return Err(PolyglotError::invalid(
            "locale_id",
            "The selected locale id is invalid.",
        ));
    }

    if state.config.translations.unique_key_per_locale
        && translations::key_taken(&state.db.pool, &draft.key, draft.locale_id, exclude_id).await?
    {
        return Err(PolyglotError::Conflict {
            message: "Translation key already exists for this locale.".into(),
        });
    }

    Ok(draft)
}
