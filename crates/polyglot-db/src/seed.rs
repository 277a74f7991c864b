//! Baseline reference data.

use polyglot_common::models::LocaleDraft;
use sqlx::AnyPool;

use crate::repository::locales;

/// Locales every fresh installation starts with: (name, short code).
pub const DEFAULT_LOCALES: [(&str, &str); 3] = [("English", "en"), ("French", "fr"), ("Espanol", "es")];

/// Insert the default locales that are not present yet. Returns how many were
/// inserted, so running it twice inserts nothing the second time.
pub async fn seed_locales(pool: &AnyPool) -> Result<usize, sqlx::Error> {
    let mut inserted = 0;

    for (name, short_code) in DEFAULT_LOCALES {
        let draft = LocaleDraft {
            name: name.to_string(),
            short_code: short_code.to_string(),
        };
        if locales::find_conflicts(pool, &draft, None).await?.any() {
            tracing::debug!(short_code, "Locale already present, skipping");
            continue;
        }
        locales::create_locale(pool, &draft).await?;
        inserted += 1;
    }

    Ok(inserted)
}
