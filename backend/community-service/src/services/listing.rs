//! Query-string glue between HTTP listings and the pagination engine

use cursor_pagination::{paginate, Anchor, Page, PageRequest, Paginable, PaginationError, Paginator};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics;

/// `?limit=&before=&after=` as sent by clients
///
/// Everything is taken as a string so that a malformed limit falls back to
/// the default instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub limit: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl ListingQuery {
    /// Validate into a request keyed by item id.
    ///
    /// Conflicting cursors are reported before either cursor is parsed.
    pub fn to_request(
        &self,
        paginator: &Paginator,
    ) -> std::result::Result<PageRequest<Uuid>, PaginationError> {
        let raw = paginator.request(
            None,
            non_empty(self.before.as_deref()),
            non_empty(self.after.as_deref()),
        )?;

        let anchor = match raw.anchor {
            None => None,
            Some(Anchor::Before(cursor)) => Some(Anchor::Before(parse_cursor(&cursor)?)),
            Some(Anchor::After(cursor)) => Some(Anchor::After(parse_cursor(&cursor)?)),
        };

        Ok(PageRequest {
            limit: paginator.limits().resolve_raw(self.limit.as_deref()),
            anchor,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_cursor(cursor: &str) -> std::result::Result<Uuid, PaginationError> {
    Uuid::parse_str(cursor).map_err(|_| PaginationError::InvalidCursor(cursor.to_string()))
}

fn error_reason(error: &PaginationError) -> &'static str {
    match error {
        PaginationError::ConflictingCursors => "conflicting_cursors",
        PaginationError::InvalidCursor(_) => "invalid_cursor",
    }
}

/// A validated request for one named listing
#[derive(Debug, Clone)]
pub struct Listing {
    name: &'static str,
    request: PageRequest<Uuid>,
}

impl Listing {
    /// Validate the query; done before touching the store.
    pub fn new(name: &'static str, query: &ListingQuery, paginator: &Paginator) -> Result<Self> {
        match query.to_request(paginator) {
            Ok(request) => Ok(Self { name, request }),
            Err(e) => {
                metrics::record_pagination_error(name, error_reason(&e));
                Err(AppError::from(e))
            }
        }
    }

    pub fn request(&self) -> &PageRequest<Uuid> {
        &self.request
    }

    /// Cut the page out of the full candidate set.
    pub fn page<T>(&self, items: Vec<T>) -> Result<Page<T, Uuid>>
    where
        T: Paginable<Id = Uuid>,
    {
        match paginate(items, &self.request) {
            Ok(page) => {
                metrics::record_listing(self.name, page.len());
                Ok(page)
            }
            Err(e) => {
                metrics::record_pagination_error(self.name, error_reason(&e));
                Err(AppError::from(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursor_pagination::PageLimits;

    #[derive(Debug, Clone)]
    struct Row(Uuid);

    impl Paginable for Row {
        type Id = Uuid;

        fn cursor_id(&self) -> &Uuid {
            &self.0
        }
    }

    fn query(limit: Option<&str>, before: Option<&str>, after: Option<&str>) -> ListingQuery {
        ListingQuery {
            limit: limit.map(str::to_string),
            before: before.map(str::to_string),
            after: after.map(str::to_string),
        }
    }

    #[test]
    fn conflict_is_reported_before_cursor_parsing() {
        let err = query(None, Some("garbage"), Some("also-garbage"))
            .to_request(&Paginator::default())
            .unwrap_err();
        assert_eq!(err, PaginationError::ConflictingCursors);
    }

    #[test]
    fn malformed_cursor_is_invalid() {
        let err = query(None, Some("not-a-uuid"), None)
            .to_request(&Paginator::default())
            .unwrap_err();
        assert_eq!(err, PaginationError::InvalidCursor("not-a-uuid".into()));
    }

    #[test]
    fn malformed_limit_falls_back_to_default() {
        let request = query(Some("lots"), None, None)
            .to_request(&Paginator::default())
            .unwrap();
        assert_eq!(request.limit, 25);

        let request = query(Some("500"), None, None)
            .to_request(&Paginator::default())
            .unwrap();
        assert_eq!(request.limit, 100);
    }

    #[test]
    fn limit_follows_configured_limits() {
        let paginator = Paginator::new(PageLimits::new(10, 40));

        let request = query(Some(" 30 "), None, None).to_request(&paginator).unwrap();
        assert_eq!(request.limit, 30);

        let request = query(Some("90"), None, None).to_request(&paginator).unwrap();
        assert_eq!(request.limit, 40);

        let request = query(Some("0"), None, None).to_request(&paginator).unwrap();
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn blank_cursor_is_absent() {
        let request = query(None, Some(""), None)
            .to_request(&Paginator::default())
            .unwrap();
        assert!(request.anchor.is_none());
    }

    #[test]
    fn listing_pages_uuid_rows() {
        let rows: Vec<Row> = (0..5).map(|_| Row(Uuid::new_v4())).collect();
        let second = rows[1].0.to_string();

        let listing = Listing::new(
            "test_rows",
            &query(Some("2"), None, Some(&second)),
            &Paginator::default(),
        )
        .unwrap();
        let page = listing.page(rows.clone()).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.children[0].0, rows[2].0);
        assert_eq!(page.before, Some(rows[2].0));
        assert_eq!(page.after, Some(rows[3].0));
    }

    #[test]
    fn unknown_cursor_maps_to_client_error() {
        let listing = Listing::new(
            "test_rows",
            &query(None, None, Some(&Uuid::new_v4().to_string())),
            &Paginator::default(),
        )
        .unwrap();
        let err = listing.page(vec![Row(Uuid::new_v4())]).unwrap_err();
        assert_eq!(err.error_type(), "INVALID_CURSOR");
    }
}
