//! Locale repository.

use chrono::Utc;
use polyglot_common::any_row::timestamp;
use polyglot_common::models::{Locale, LocaleDraft};
use polyglot_common::pagination::{PageRequest, Paginated};
use sqlx::AnyPool;

use crate::filter::{fold_case, QueryFilter};

/// Which unique fields of a draft are already used by another locale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LocaleConflicts {
    pub name: bool,
    pub short_code: bool,
}

impl LocaleConflicts {
    pub fn any(&self) -> bool {
        self.name || self.short_code
    }
}

/// Page through locales, filtered by name and short-code substrings.
pub async fn list_locales(
    pool: &AnyPool,
    name: Option<&str>,
    short_code: Option<&str>,
    page: PageRequest,
) -> Result<Paginated<Locale>, sqlx::Error> {
    let filter = QueryFilter::new()
        .contains("name_folded", name)
        .contains("short_code_folded", short_code);
    let where_clause = filter.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM locales{where_clause}");
    let (total,) = filter
        .bind(sqlx::query_as::<_, (i64,)>(&count_sql))
        .fetch_one(pool)
        .await?;

    let page_sql = format!("SELECT * FROM locales{where_clause} ORDER BY id ASC LIMIT ? OFFSET ?");
    let rows = filter
        .bind(sqlx::query_as::<_, Locale>(&page_sql))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(Paginated::new(rows, total, page))
}

pub async fn create_locale(pool: &AnyPool, draft: &LocaleDraft) -> Result<Locale, sqlx::Error> {
    let now = timestamp(Utc::now());
    sqlx::query_as::<_, Locale>(
        r#"
        INSERT INTO locales
            (name, short_code, name_folded, short_code_folded, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(draft.name.as_str())
    .bind(draft.short_code.as_str())
    .bind(fold_case(&draft.name))
    .bind(fold_case(&draft.short_code))
    .bind(now.clone())
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &AnyPool, id: i64) -> Result<Option<Locale>, sqlx::Error> {
    sqlx::query_as::<_, Locale>("SELECT * FROM locales WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
pub(crate) async fn find_by_short_code(
    pool: &AnyPool,
    short_code: &str,
) -> Result<Option<Locale>, sqlx::Error> {
    sqlx::query_as::<_, Locale>("SELECT * FROM locales WHERE short_code_folded = ?")
        .bind(fold_case(short_code))
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &AnyPool, id: i64) -> Result<bool, sqlx::Error> {
    let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM locales WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Check the draft's name and short code against every other locale, using
/// the same folding as the unique indexes. `exclude_id` skips the locale
/// being updated.
pub async fn find_conflicts(
    pool: &AnyPool,
    draft: &LocaleDraft,
    exclude_id: Option<i64>,
) -> Result<LocaleConflicts, sqlx::Error> {
    let name = fold_case(&draft.name);
    let short_code = fold_case(&draft.short_code);

    let taken = sqlx::query_as::<_, (Option<String>, Option<String>)>(
        r#"
        SELECT name_folded, short_code_folded FROM locales
        WHERE (name_folded = ? OR short_code_folded = ?)
          AND id <> ?
        "#,
    )
    .bind(name.as_str())
    .bind(short_code.as_str())
    .bind(exclude_id.unwrap_or(0))
    .fetch_all(pool)
    .await?;

    Ok(taken.iter().fold(
        LocaleConflicts::default(),
        |acc, (taken_name, taken_short_code)| LocaleConflicts {
            name: acc.name || taken_name.as_deref() == Some(name.as_str()),
            short_code: acc.short_code || taken_short_code.as_deref() == Some(short_code.as_str()),
        },
    ))
}

/// Overwrite both fields. `None` when the locale does not exist.
pub async fn update_locale(
    pool: &AnyPool,
    id: i64,
    draft: &LocaleDraft,
) -> Result<Option<Locale>, sqlx::Error> {
    sqlx::query_as::<_, Locale>(
        r#"
        UPDATE locales
        SET name = ?, short_code = ?, name_folded = ?, short_code_folded = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(draft.name.as_str())
    .bind(draft.short_code.as_str())
    .bind(fold_case(&draft.name))
    .bind(fold_case(&draft.short_code))
    .bind(timestamp(Utc::now()))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a locale. Translations that reference it are left untouched.
pub async fn delete_locale(pool: &AnyPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM locales WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
