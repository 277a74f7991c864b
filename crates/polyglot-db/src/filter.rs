//! Filter engine shared by the list endpoints.
//!
//! A [`QueryFilter`] collects AND-ed `WHERE` fragments together with their bound
//! values, so the same filter can drive both the `COUNT(*)` query and the page
//! query of a listing.
//!
//! SQLite's `LOWER()` and `LIKE` only fold ASCII, so case-insensitive columns
//! are stored a second time already passed through [`fold_case`], and needles
//! are folded the same way before they are bound.

use sqlx::any::AnyArguments;
use sqlx::query::QueryAs;
use sqlx::Any;

/// Escape character used in every `LIKE ... ESCAPE` clause built here.
const LIKE_ESCAPE: char = '!';

#[derive(Debug, Default, Clone)]
pub struct QueryFilter {
    clauses: Vec<String>,
    binds: Vec<String>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive "contains" match. `folded_column` must hold values
    /// written through [`fold_case`]. Empty needles add nothing.
    pub fn contains(mut self, folded_column: &str, needle: Option<&str>) -> Self {
        if let Some(needle) = needle.filter(|n| !n.is_empty()) {
            self.clauses
                .push(format!("{folded_column} LIKE ? ESCAPE '{LIKE_ESCAPE}'"));
            self.binds
                .push(format!("%{}%", escape_like(&fold_case(needle))));
        }
        self
    }

    /// Exact tag membership, matched through the `translation_tags` index table.
    pub fn has_tag(mut self, tag: Option<&str>) -> Self {
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            self.clauses.push(
                "EXISTS (SELECT 1 FROM translation_tags tt \
                 WHERE tt.translation_id = translations.id AND tt.tag = ?)"
                    .to_string(),
            );
            self.binds.push(tag.to_string());
        }
        self
    }

    /// `""` when there is nothing to filter, otherwise `" WHERE a AND b"`.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Bind the filter values, in clause order, onto a query built from
    /// [`where_clause`](Self::where_clause).
    pub fn bind<'q, O>(
        &self,
        query: QueryAs<'q, Any, O, AnyArguments<'q>>,
    ) -> QueryAs<'q, Any, O, AnyArguments<'q>> {
        self.binds
            .iter()
            .fold(query, |query, value| query.bind(value.clone()))
    }
}

/// The single case-folding rule for stored search columns, needles and
/// uniqueness checks: full Unicode lowercasing.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
