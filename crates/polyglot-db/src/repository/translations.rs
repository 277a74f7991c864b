//! Translation repository, including the streaming export cursor.
//!
//! The ordered tag list lives in `translations.tags` as JSON text. Every write
//! also rewrites the `translation_tags` rows so tag filters can match exactly.

use chrono::Utc;
use futures_util::stream::BoxStream;
use polyglot_common::any_row::timestamp;
use polyglot_common::models::{ExportRecord, Translation, TranslationDraft};
use polyglot_common::pagination::{PageRequest, Paginated};
use sqlx::{AnyConnection, AnyPool};

use crate::filter::{fold_case, QueryFilter};

/// Search criteria for `GET /translations`; all present criteria must match.
#[derive(Debug, Default, Clone, Copy)]
pub struct TranslationFilter<'a> {
    pub tag: Option<&'a str>,
    pub key: Option<&'a str>,
    pub content: Option<&'a str>,
}

const EXPORT_SQL: &str = r#"
    SELECT t."key" AS "key", l.short_code AS locale, t.content AS content, t.tags AS tags
    FROM translations t
    INNER JOIN locales l ON l.id = t.locale_id
    ORDER BY t.id ASC
"#;

pub async fn list_translations(
    pool: &AnyPool,
    criteria: TranslationFilter<'_>,
    page: PageRequest,
) -> Result<Paginated<Translation>, sqlx::Error> {
    let filter = QueryFilter::new()
        .has_tag(criteria.tag)
        .contains("key_folded", criteria.key)
        .contains("content_folded", criteria.content);
    let where_clause = filter.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM translations{where_clause}");
    let (total,) = filter
        .bind(sqlx::query_as::<_, (i64,)>(&count_sql))
        .fetch_one(pool)
        .await?;

    let page_sql =
        format!("SELECT * FROM translations{where_clause} ORDER BY id ASC LIMIT ? OFFSET ?");
    let rows = filter
        .bind(sqlx::query_as::<_, Translation>(&page_sql))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated::new(rows, total, page))
}

pub async fn create_translation(
    pool: &AnyPool,
    draft: &TranslationDraft,
) -> Result<Translation, sqlx::Error> {
    let now = timestamp(Utc::now());
    let mut tx = pool.begin().await?;

    let translation = sqlx::query_as::<_, Translation>(
        r#"
        INSERT INTO translations
            ("key", locale_id, content, tags, key_folded, content_folded, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(draft.key.as_str())
    .bind(draft.locale_id)
    .bind(draft.content.as_str())
    .bind(encode_tags(&draft.tags)?)
    .bind(fold_case(&draft.key))
    .bind(fold_case(&draft.content))
    .bind(now.clone())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    replace_tag_index(&mut tx, translation.id, &draft.tags).await?;
    tx.commit().await?;

    Ok(translation)
}

pub async fn find_by_id(pool: &AnyPool, id: i64) -> Result<Option<Translation>, sqlx::Error> {
    sqlx::query_as::<_, Translation>("SELECT * FROM translations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Overwrite every field. `None` when the translation does not exist.
pub async fn update_translation(
    pool: &AnyPool,
    id: i64,
    draft: &TranslationDraft,
) -> Result<Option<Translation>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, Translation>(
        r#"
        UPDATE translations
        SET "key" = ?, locale_id = ?, content = ?, tags = ?,
            key_folded = ?, content_folded = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(draft.key.as_str())
    .bind(draft.locale_id)
    .bind(draft.content.as_str())
    .bind(encode_tags(&draft.tags)?)
    .bind(fold_case(&draft.key))
    .bind(fold_case(&draft.content))
    .bind(timestamp(Utc::now()))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(translation) = updated else {
        tx.rollback().await?;
        return Ok(None);
    };

    replace_tag_index(&mut tx, translation.id, &draft.tags).await?;
    tx.commit().await?;

    Ok(Some(translation))
}

pub async fn delete_translation(pool: &AnyPool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM translation_tags WHERE translation_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM translations WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Whether another translation already uses `key` in `locale_id`.
pub async fn key_taken(
    pool: &AnyPool,
    key: &str,
    locale_id: i64,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let (count,) = sqlx::query_as::<_, (i64,)>(
        r#"SELECT COUNT(*) FROM translations WHERE "key" = ? AND locale_id = ? AND id <> ?"#,
    )
    .bind(key)
    .bind(locale_id)
    .bind(exclude_id.unwrap_or(0))
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Row-by-row cursor over every translation joined with its locale, in id
/// order. Translations whose locale is gone are skipped by the join.
///
/// Rows are decoded as the stream is polled; dropping the stream releases the
/// connection.
pub fn export_stream(pool: &AnyPool) -> BoxStream<'_, Result<ExportRecord, sqlx::Error>> {
    sqlx::query_as::<_, ExportRecord>(EXPORT_SQL).fetch(pool)
}

fn encode_tags(tags: &[String]) -> Result<String, sqlx::Error> {
    serde_json::to_string(tags).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

async fn replace_tag_index(
    conn: &mut AnyConnection,
    translation_id: i64,
    tags: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM translation_tags WHERE translation_id = ?")
        .bind(translation_id)
        .execute(&mut *conn)
        .await?;

    for tag in tags {
        sqlx::query("INSERT INTO translation_tags (translation_id, tag) VALUES (?, ?)")
            .bind(translation_id)
            .bind(tag.as_str())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
