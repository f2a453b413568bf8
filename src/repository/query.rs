//! List query construction.
//!
//! Raw query-string values are resolved into enum variants and clamped numbers
//! here. Only the fixed fragments returned by [`SortColumn::as_sql`] and
//! [`SortOrder::as_sql`] ever reach the statement text; everything the client
//! typed is bound as a parameter.

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortColumn {
    /// Unknown or missing columns fall back to `created_at`.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            Some("updated_at") => Self::UpdatedAt,
            _ => Self::CreatedAt,
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            Some(order) if order.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub q: Option<String>,
    pub sort: SortColumn,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            q: None,
            sort: SortColumn::default(),
            order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListParams {
    pub fn resolve(
        q: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> Self {
        let q = q.map(str::trim).filter(|q| !q.is_empty()).map(str::to_owned);

        Self {
            q,
            sort: SortColumn::resolve(sort),
            order: SortOrder::resolve(order),
            limit: clamp_limit(parse_number(limit).unwrap_or(DEFAULT_LIMIT)),
            offset: parse_number(offset).unwrap_or(0).max(0),
        }
    }

    /// `LIKE` pattern for the substring filter, with wildcards in `q` escaped.
    pub fn pattern(&self) -> Option<String> {
        self.q.as_deref().map(|q| format!("%{}%", escape_like(q)))
    }

    pub fn to_sql(&self) -> String {
        let filter = if self.q.is_some() {
            "WHERE title LIKE :pattern ESCAPE '\\' OR content LIKE :pattern ESCAPE '\\'"
        } else {
            ""
        };
        let column = self.sort.as_sql();
        let order = self.order.as_sql();

        format!(
            "SELECT id, title, content, created_at, updated_at FROM notes {filter} \
             ORDER BY {column} {order}, id {order} LIMIT :limit OFFSET :offset"
        )
    }
}

pub const fn clamp_limit(limit: i64) -> i64 {
    if limit < 0 {
        0
    } else if limit > MAX_LIMIT {
        MAX_LIMIT
    } else {
        limit
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_column_falls_back_to_created_at() {
        assert_eq!(SortColumn::resolve(Some("bogus")), SortColumn::CreatedAt);
        assert_eq!(SortColumn::resolve(Some("title; DROP TABLE notes")), SortColumn::CreatedAt);
        assert_eq!(SortColumn::resolve(None), SortColumn::CreatedAt);
        assert_eq!(SortColumn::resolve(Some("updated_at")), SortColumn::UpdatedAt);
    }

    #[test]
    fn order_is_case_insensitive_and_defaults_to_desc() {
        assert_eq!(SortOrder::resolve(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::resolve(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::resolve(Some("Asc")), SortOrder::Asc);
        assert_eq!(SortOrder::resolve(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::resolve(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::resolve(None), SortOrder::Desc);
    }

    #[test]
    fn limit_is_clamped_at_both_ends() {
        assert_eq!(clamp_limit(1000), MAX_LIMIT);
        assert_eq!(clamp_limit(101), MAX_LIMIT);
        assert_eq!(clamp_limit(100), 100);
        assert_eq!(clamp_limit(0), 0);
        assert_eq!(clamp_limit(-5), 0);
    }

    #[test]
    fn resolve_applies_defaults_for_missing_or_garbage_numbers() {
        let params = ListParams::resolve(None, None, None, None, None);
        assert_eq!(params, ListParams::default());

        let params = ListParams::resolve(None, None, None, Some("many"), Some("-3"));
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn blank_query_means_no_filter() {
        let params = ListParams::resolve(Some("   "), None, None, None, None);
        assert!(params.q.is_none());
        assert!(params.pattern().is_none());
        assert!(!params.to_sql().contains("WHERE"));
    }

    #[test]
    fn pattern_escapes_like_wildcards() {
        let params = ListParams::resolve(Some(" 50%_off\\ "), None, None, None, None);
        assert_eq!(params.pattern().as_deref(), Some("%50\\%\\_off\\\\%"));
    }

    #[test]
    fn sql_only_contains_allow_listed_fragments() {
        let params = ListParams::resolve(
            Some("x"),
            Some("updated_at"),
            Some("asc"),
            Some("5"),
            Some("2"),
        );
        let sql = params.to_sql();

        assert!(sql.contains("WHERE title LIKE :pattern"));
        assert!(sql.contains("ORDER BY updated_at ASC, id ASC"));
        assert!(sql.contains("LIMIT :limit OFFSET :offset"));

        let bogus = ListParams::resolve(None, Some("id; --"), Some("up"), None, None);
        assert!(bogus.to_sql().contains("ORDER BY created_at DESC, id DESC"));
    }
}
