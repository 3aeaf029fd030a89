//! Generic pagination, sorting, and keyword filtering over the master tables.
//!
//! All three entity listings go through [`fetch_page`], parameterized by a
//! static [`EntityDescriptor`]. The descriptor declares which columns are
//! searchable, which external sort keys exist and which columns they map to,
//! so caller input never reaches the SQL text itself - unknown sort keys fall
//! back to the default column and the keyword is always a bound parameter.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Pool, Postgres};
use utoipa::{IntoParams, ToSchema};

use crate::types::error::MasterErr;

/// Query parameters accepted by every paged listing endpoint.
///
/// # Fields
/// - `page` - 0-based page index
/// - `size` - number of rows per page
/// - `sort_by` - external sort key, resolved through the entity's sort map
/// - `sort_dir` - `ASC`/`ASCENDING` for ascending, anything else descending
/// - `keyword` - optional filter, matched case-insensitively as a substring
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i32,
    #[serde(default = "default_size")]
    pub size: i32,
    #[serde(default = "default_sort_by", rename = "sortBy")]
    pub sort_by: String,
    #[serde(default = "default_sort_dir", rename = "sortDir")]
    pub sort_dir: String,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
            sort_by: default_sort_by(),
            sort_dir: default_sort_dir(),
            keyword: None,
        }
    }
}

impl PageQuery {
    /// Checks the page window arithmetic before anything touches the database.
    ///
    /// # Errors
    /// `MasterErr::InvalidQuery` if `size` is not positive or `page` is
    /// negative.
    pub fn validate(&self) -> Result<(), MasterErr> {
        if self.size <= 0 {
            return Err(MasterErr::InvalidQuery(format!(
                "page size must be positive, got {}",
                self.size
            )));
        }
        if self.page < 0 {
            return Err(MasterErr::InvalidQuery(format!(
                "page index cannot be negative, got {}",
                self.page
            )));
        }
        Ok(())
    }

    /// Returns the keyword with surrounding whitespace removed, or `None`
    /// when there is nothing to filter on.
    pub fn normalized_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

fn default_page() -> i32 {
    0
}

fn default_size() -> i32 {
    10
}

fn default_sort_by() -> String {
    String::from("createdAt")
}

fn default_sort_dir() -> String {
    String::from("DESC")
}

/// Sort order for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parses the external `sortDir` value.
    ///
    /// `ASC` and `ASCENDING` (any case) select ascending; everything else,
    /// including unrecognized input, selects descending.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Static listing configuration for one master table.
///
/// # Fields
/// - `table` - table name
/// - `key_column` - primary key column, used as the deterministic tie-break
/// - `search_columns` - columns the keyword is matched against
/// - `sort_keys` - external sort key to column mapping
/// - `default_sort` - column used when `sortBy` is absent or unrecognized
pub struct EntityDescriptor {
    pub table: &'static str,
    pub key_column: &'static str,
    pub search_columns: &'static [&'static str],
    pub sort_keys: &'static [(&'static str, &'static str)],
    pub default_sort: &'static str,
}

impl EntityDescriptor {
    /// Maps an external sort key to its column, falling back to the default
    /// column for anything outside the map.
    pub fn resolve_sort(&self, requested: &str) -> &'static str {
        self.sort_keys
            .iter()
            .find(|(key, _)| *key == requested)
            .map(|(_, column)| *column)
            .unwrap_or(self.default_sort)
    }

    /// The keyword predicate, shared verbatim by [`Self::count_sql`] and
    /// [`Self::select_sql`] so the window and the total can never disagree.
    fn search_predicate(&self) -> String {
        let clauses: Vec<String> = self
            .search_columns
            .iter()
            .map(|column| format!("{column} ILIKE $1"))
            .collect();
        format!("({})", clauses.join(" OR "))
    }

    pub fn count_sql(&self, filtered: bool) -> String {
        if filtered {
            format!(
                "SELECT COUNT(*) FROM {} WHERE {}",
                self.table,
                self.search_predicate()
            )
        } else {
            format!("SELECT COUNT(*) FROM {}", self.table)
        }
    }

    pub fn select_sql(&self, sort_column: &str, direction: SortDirection, filtered: bool) -> String {
        // Tie-break on the key column so rows with equal sort values page
        // deterministically.
        let order = if sort_column == self.key_column {
            format!("{} {}", sort_column, direction.as_sql())
        } else {
            format!(
                "{} {}, {} ASC",
                sort_column,
                direction.as_sql(),
                self.key_column
            )
        };

        if filtered {
            format!(
                "SELECT * FROM {} WHERE {} ORDER BY {} LIMIT $2 OFFSET $3",
                self.table,
                self.search_predicate(),
                order
            )
        } else {
            format!(
                "SELECT * FROM {} ORDER BY {} LIMIT $1 OFFSET $2",
                self.table, order
            )
        }
    }
}

/// Escapes LIKE metacharacters and wraps the keyword for substring matching.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}

/// One page of a listing plus its derived metadata.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: i32,
    pub size: i32,
    pub total_pages: i32,
    pub total_elements: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub is_first: bool,
    pub is_last: bool,
}

impl<T> PageResponse<T> {
    /// Derives the page metadata from the window contents and the total
    /// matching-row count.
    ///
    /// `total_pages` is `ceil(total_elements / size)`, 0 when nothing
    /// matches; the boolean flags follow from `page` and `total_pages`.
    pub fn assemble(content: Vec<T>, page: i32, size: i32, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            ((total_elements + i64::from(size) - 1) / i64::from(size)) as i32
        };

        Self {
            content,
            page,
            size,
            total_pages,
            total_elements,
            has_next: page < total_pages - 1,
            has_previous: page > 0,
            is_first: page == 0,
            is_last: page >= total_pages - 1,
        }
    }
}

/// Retrieves one page of `descriptor`'s table.
///
/// The keyword predicate is applied identically to the COUNT and to the
/// SELECT; the requested sort key is resolved through the descriptor's
/// allow-list. An offset past the last matching row yields an empty page.
///
/// # Parameters
/// - `db_pool`: The database connection pool
/// - `descriptor`: The entity's listing configuration
/// - `query`: The decoded page query
///
/// # Errors
/// `MasterErr::InvalidQuery` for a non-positive size or negative page index
/// (raised before any query runs); `MasterErr::Store` when the database
/// fails.
pub async fn fetch_page<T>(
    db_pool: &Pool<Postgres>,
    descriptor: &EntityDescriptor,
    query: &PageQuery,
) -> Result<PageResponse<T>, MasterErr>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    query.validate()?;

    let sort_column = descriptor.resolve_sort(&query.sort_by);
    let direction = SortDirection::parse(&query.sort_dir);
    let pattern = query.normalized_keyword().map(like_pattern);

    tracing::debug!(
        table = descriptor.table,
        page = query.page,
        size = query.size,
        sort_column,
        filtered = pattern.is_some(),
        "fetching page"
    );

    let total_elements: i64 = match &pattern {
        Some(pattern) => {
            sqlx::query_scalar(&descriptor.count_sql(true))
                .bind(pattern)
                .fetch_one(db_pool)
                .await?
        }
        None => {
            sqlx::query_scalar(&descriptor.count_sql(false))
                .fetch_one(db_pool)
                .await?
        }
    };

    let select = descriptor.select_sql(sort_column, direction, pattern.is_some());
    let content: Vec<T> = match &pattern {
        Some(pattern) => {
            sqlx::query_as(&select)
                .bind(pattern)
                .bind(i64::from(query.size))
                .bind(query.offset())
                .fetch_all(db_pool)
                .await?
        }
        None => {
            sqlx::query_as(&select)
                .bind(i64::from(query.size))
                .bind(query.offset())
                .fetch_all(db_pool)
                .await?
        }
    };

    Ok(PageResponse::assemble(
        content,
        query.page,
        query.size,
        total_elements,
    ))
}

/// Counts every row of `descriptor`'s table.
///
/// # Errors
/// `MasterErr::Store` when the database fails.
pub async fn count_all(
    db_pool: &Pool<Postgres>,
    descriptor: &EntityDescriptor,
) -> Result<i64, MasterErr> {
    let count = sqlx::query_scalar(&descriptor.count_sql(false))
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: EntityDescriptor = EntityDescriptor {
        table: "widget_master",
        key_column: "widget_id",
        search_columns: &["widget_name", "widget_id"],
        sort_keys: &[
            ("widgetId", "widget_id"),
            ("widgetName", "widget_name"),
            ("createdAt", "created_at"),
        ],
        default_sort: "created_at",
    };

    mod query_validation {
        use super::*;

        #[test]
        fn default_query_is_valid() {
            let query = PageQuery::default();
            assert_eq!(query.page, 0);
            assert_eq!(query.size, 10);
            assert_eq!(query.sort_by, "createdAt");
            assert_eq!(query.sort_dir, "DESC");
            assert!(query.validate().is_ok());
        }

        #[test]
        fn zero_size_is_rejected() {
            let query = PageQuery {
                size: 0,
                ..PageQuery::default()
            };
            assert!(matches!(
                query.validate(),
                Err(MasterErr::InvalidQuery(_))
            ));
        }

        #[test]
        fn negative_size_is_rejected() {
            let query = PageQuery {
                size: -3,
                ..PageQuery::default()
            };
            assert!(matches!(
                query.validate(),
                Err(MasterErr::InvalidQuery(_))
            ));
        }

        #[test]
        fn negative_page_is_rejected() {
            let query = PageQuery {
                page: -1,
                ..PageQuery::default()
            };
            assert!(matches!(
                query.validate(),
                Err(MasterErr::InvalidQuery(_))
            ));
        }

        #[test]
        fn keyword_is_trimmed_and_blank_means_unfiltered() {
            let unfiltered = PageQuery {
                keyword: Some(String::from("   ")),
                ..PageQuery::default()
            };
            assert_eq!(unfiltered.normalized_keyword(), None);

            let absent = PageQuery::default();
            assert_eq!(absent.normalized_keyword(), None);

            let filtered = PageQuery {
                keyword: Some(String::from("  rack ")),
                ..PageQuery::default()
            };
            assert_eq!(filtered.normalized_keyword(), Some("rack"));
        }

        #[test]
        fn offset_is_page_times_size() {
            let query = PageQuery {
                page: 7,
                size: 25,
                ..PageQuery::default()
            };
            assert_eq!(query.offset(), 175);
        }
    }

    mod sort_handling {
        use super::*;

        #[test]
        fn known_keys_resolve_to_their_columns() {
            assert_eq!(WIDGETS.resolve_sort("widgetName"), "widget_name");
            assert_eq!(WIDGETS.resolve_sort("widgetId"), "widget_id");
        }

        #[test]
        fn unknown_key_falls_back_to_default() {
            assert_eq!(WIDGETS.resolve_sort("price"), "created_at");
            assert_eq!(WIDGETS.resolve_sort(""), "created_at");
            // Column names are not valid external keys.
            assert_eq!(WIDGETS.resolve_sort("widget_name"), "created_at");
        }

        #[test]
        fn direction_parsing_is_case_insensitive() {
            assert_eq!(SortDirection::parse("asc"), SortDirection::Ascending);
            assert_eq!(SortDirection::parse("ASC"), SortDirection::Ascending);
            assert_eq!(SortDirection::parse("Ascending"), SortDirection::Ascending);
            assert_eq!(SortDirection::parse("desc"), SortDirection::Descending);
        }

        #[test]
        fn unrecognized_direction_defaults_to_descending() {
            assert_eq!(SortDirection::parse(""), SortDirection::Descending);
            assert_eq!(SortDirection::parse("ACS"), SortDirection::Descending);
            assert_eq!(SortDirection::parse("sideways"), SortDirection::Descending);
        }
    }

    mod sql_construction {
        use super::*;

        #[test]
        fn filtered_select_binds_keyword_window_and_tie_break() {
            let sql = WIDGETS.select_sql("created_at", SortDirection::Descending, true);
            assert_eq!(
                sql,
                "SELECT * FROM widget_master \
                 WHERE (widget_name ILIKE $1 OR widget_id ILIKE $1) \
                 ORDER BY created_at DESC, widget_id ASC LIMIT $2 OFFSET $3"
            );
        }

        #[test]
        fn unfiltered_select_has_no_predicate() {
            let sql = WIDGETS.select_sql("widget_name", SortDirection::Ascending, false);
            assert_eq!(
                sql,
                "SELECT * FROM widget_master \
                 ORDER BY widget_name ASC, widget_id ASC LIMIT $1 OFFSET $2"
            );
        }

        #[test]
        fn sorting_by_the_key_column_skips_the_tie_break() {
            let sql = WIDGETS.select_sql("widget_id", SortDirection::Ascending, false);
            assert_eq!(
                sql,
                "SELECT * FROM widget_master ORDER BY widget_id ASC LIMIT $1 OFFSET $2"
            );
        }

        #[test]
        fn count_and_select_share_the_predicate() {
            let predicate = "(widget_name ILIKE $1 OR widget_id ILIKE $1)";
            assert!(WIDGETS.count_sql(true).contains(predicate));
            assert!(
                WIDGETS
                    .select_sql("created_at", SortDirection::Descending, true)
                    .contains(predicate)
            );
            assert_eq!(
                WIDGETS.count_sql(false),
                "SELECT COUNT(*) FROM widget_master"
            );
        }

        #[test]
        fn like_pattern_wraps_for_substring_match() {
            assert_eq!(like_pattern("ab"), "%ab%");
        }

        #[test]
        fn like_pattern_escapes_metacharacters() {
            assert_eq!(like_pattern("50%"), "%50\\%%");
            assert_eq!(like_pattern("a_b"), "%a\\_b%");
            assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
        }
    }

    mod page_math {
        use super::*;

        fn window_len(page: i32, size: i32, total: i64) -> usize {
            let start = i64::from(page) * i64::from(size);
            (total - start).clamp(0, i64::from(size)) as usize
        }

        fn page_of(page: i32, size: i32, total: i64) -> PageResponse<u8> {
            PageResponse::assemble(vec![0; window_len(page, size, total)], page, size, total)
        }

        #[test]
        fn total_pages_is_the_ceiling_of_total_over_size() {
            for size in 1..=7 {
                for total in 0..=40_i64 {
                    let response = page_of(0, size, total);
                    let expected = (total + i64::from(size) - 1) / i64::from(size);
                    assert_eq!(
                        i64::from(response.total_pages),
                        expected,
                        "size {size} total {total}"
                    );
                }
            }
        }

        #[test]
        fn flag_identities_hold_on_every_page() {
            let (size, total) = (10, 23);
            let total_pages = 3;
            for page in 0..=total_pages {
                let response = page_of(page, size, total);
                assert_eq!(response.is_first, page == 0, "page {page}");
                assert_eq!(response.has_previous, page > 0, "page {page}");
                assert_eq!(response.is_last, page >= total_pages - 1, "page {page}");
                assert_eq!(response.has_next, page < total_pages - 1, "page {page}");
            }
        }

        #[test]
        fn twenty_three_rows_at_ten_per_page() {
            let first = page_of(0, 10, 23);
            assert_eq!(first.content.len(), 10);
            assert_eq!(first.total_pages, 3);
            assert_eq!(first.total_elements, 23);
            assert!(first.has_next);
            assert!(first.is_first);
            assert!(!first.is_last);

            let last = page_of(2, 10, 23);
            assert_eq!(last.content.len(), 3);
            assert!(!last.has_next);
            assert!(last.has_previous);
            assert!(last.is_last);
        }

        #[test]
        fn page_beyond_the_end_is_empty_not_an_error() {
            let response = page_of(9, 10, 23);
            assert!(response.content.is_empty());
            assert_eq!(response.total_elements, 23);
            assert!(response.is_last);
            assert!(!response.has_next);
        }

        #[test]
        fn empty_result_set_has_zero_pages() {
            let response = page_of(0, 10, 0);
            assert!(response.content.is_empty());
            assert_eq!(response.total_pages, 0);
            assert!(response.is_first);
            assert!(response.is_last);
            assert!(!response.has_next);
            assert!(!response.has_previous);
        }

        #[test]
        fn an_exact_multiple_fills_the_last_page() {
            let response = page_of(1, 10, 20);
            assert_eq!(response.content.len(), 10);
            assert_eq!(response.total_pages, 2);
            assert!(response.is_last);
            assert!(!response.has_next);
        }

        #[test]
        fn metadata_serializes_in_camel_case() {
            let value =
                serde_json::to_value(page_of(0, 10, 23)).expect("page response serializes");
            let object = value.as_object().expect("page response is an object");
            for key in [
                "content",
                "page",
                "size",
                "totalPages",
                "totalElements",
                "hasNext",
                "hasPrevious",
                "isFirst",
                "isLast",
            ] {
                assert!(object.contains_key(key), "missing {key}");
            }
            assert_eq!(value["totalPages"], 3);
            assert_eq!(value["hasNext"], true);
        }
    }
}
