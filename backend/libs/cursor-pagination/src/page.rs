use std::fmt;

use serde::Serialize;

use crate::error::{PaginationError, Result};
use crate::limits::PageLimits;
use crate::window::Window;

/// An item of an ordered collection that can be addressed by a cursor.
pub trait Paginable {
    type Id: PartialEq + Clone + fmt::Display;

    fn cursor_id(&self) -> &Self::Id;
}

/// Position a page is computed relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor<Id> {
    Before(Id),
    After(Id),
}

/// A validated page request: a resolved limit and at most one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<Id> {
    pub limit: usize,
    pub anchor: Option<Anchor<Id>>,
}

impl<Id> PageRequest<Id> {
    /// Build a request from raw listing parameters.
    ///
    /// Supplying both cursors is rejected before anything else is looked at.
    pub fn new(
        limit: Option<i64>,
        before: Option<Id>,
        after: Option<Id>,
        limits: &PageLimits,
    ) -> Result<Self> {
        let anchor = match (before, after) {
            (Some(_), Some(_)) => return Err(PaginationError::ConflictingCursors),
            (Some(id), None) => Some(Anchor::Before(id)),
            (None, Some(id)) => Some(Anchor::After(id)),
            (None, None) => None,
        };

        Ok(Self {
            limit: limits.resolve(limit),
            anchor,
        })
    }

    /// Request for the first `limit` items.
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            anchor: None,
        }
    }
}

/// One page of a listing.
///
/// `before`/`after` are the cursors to request the neighbouring pages and are
/// `None` when no such page exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T, Id> {
    pub children: Vec<T>,
    pub before: Option<Id>,
    pub after: Option<Id>,
}

impl<T, Id> Page<T, Id> {
    pub fn empty() -> Self {
        Self {
            children: Vec::new(),
            before: None,
            after: None,
        }
    }

    /// Convert the children while keeping the cursors.
    pub fn map<U, F>(self, f: F) -> Page<U, Id>
    where
        F: FnMut(T) -> U,
    {
        Page {
            children: self.children.into_iter().map(f).collect(),
            before: self.before,
            after: self.after,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn locate<T: Paginable>(items: &[T], id: &T::Id) -> Result<usize> {
    items
        .iter()
        .position(|item| item.cursor_id() == id)
        .ok_or_else(|| PaginationError::InvalidCursor(id.to_string()))
}

/// Cut one page out of `items`.
///
/// `items` must already be filtered and sorted in listing order.
pub fn paginate<T: Paginable>(
    items: Vec<T>,
    request: &PageRequest<T::Id>,
) -> Result<Page<T, T::Id>> {
    let len = items.len();
    let window = match &request.anchor {
        None => Window::head(len, request.limit),
        Some(Anchor::Before(id)) => Window::before(len, locate(&items, id)?, request.limit),
        Some(Anchor::After(id)) => Window::after(len, locate(&items, id)?, request.limit),
    };

    let before = window.before.map(|i| items[i].cursor_id().clone());
    let after = window.after.map(|i| items[i].cursor_id().clone());
    let children = items
        .into_iter()
        .skip(window.start)
        .take(window.len())
        .collect();

    Ok(Page {
        children,
        before,
        after,
    })
}

/// Pagination entry point carrying the configured page limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    limits: PageLimits,
}

impl Paginator {
    pub fn new(limits: PageLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PageLimits {
        &self.limits
    }

    pub fn request<Id>(
        &self,
        limit: Option<i64>,
        before: Option<Id>,
        after: Option<Id>,
    ) -> Result<PageRequest<Id>> {
        PageRequest::new(limit, before, after, &self.limits)
    }

    pub fn paginate<T: Paginable>(
        &self,
        items: Vec<T>,
        limit: Option<i64>,
        before: Option<T::Id>,
        after: Option<T::Id>,
    ) -> Result<Page<T, T::Id>> {
        let request = self.request(limit, before, after)?;
        paginate(items, &request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item(&'static str);

    impl Paginable for Item {
        type Id = &'static str;

        fn cursor_id(&self) -> &&'static str {
            &self.0
        }
    }

    fn letters() -> Vec<Item> {
        ["A", "B", "C", "D", "E"].into_iter().map(Item).collect()
    }

    fn ids(page: &Page<Item, &'static str>) -> Vec<&'static str> {
        page.children.iter().map(|item| item.0).collect()
    }

    #[test]
    fn first_page() {
        let page = Paginator::default()
            .paginate(letters(), Some(2), None, None)
            .unwrap();
        assert_eq!(ids(&page), vec!["A", "B"]);
        assert_eq!(page.before, None);
        assert_eq!(page.after, Some("B"));
    }

    #[test]
    fn page_after_b() {
        let page = Paginator::default()
            .paginate(letters(), Some(2), None, Some("B"))
            .unwrap();
        assert_eq!(ids(&page), vec!["C", "D"]);
        assert_eq!(page.before, Some("C"));
        assert_eq!(page.after, Some("D"));
    }

    #[test]
    fn page_after_d_is_the_tail() {
        let page = Paginator::default()
            .paginate(letters(), Some(2), None, Some("D"))
            .unwrap();
        assert_eq!(ids(&page), vec!["E"]);
        assert_eq!(page.before, Some("E"));
        assert_eq!(page.after, None);
    }

    #[test]
    fn page_before_c() {
        let page = Paginator::default()
            .paginate(letters(), Some(2), Some("C"), None)
            .unwrap();
        assert_eq!(ids(&page), vec!["A", "B"]);
        assert_eq!(page.before, None);
        assert_eq!(page.after, Some("B"));
    }

    #[test]
    fn conflicting_cursors_are_rejected() {
        let err = Paginator::default()
            .paginate(letters(), Some(2), Some("A"), Some("B"))
            .unwrap_err();
        assert_eq!(err, PaginationError::ConflictingCursors);

        // even when neither cursor exists
        let err = Paginator::default()
            .paginate(Vec::<Item>::new(), None, Some("X"), Some("Y"))
            .unwrap_err();
        assert_eq!(err, PaginationError::ConflictingCursors);
    }

    #[test]
    fn unknown_cursor_is_rejected() {
        let err = Paginator::default()
            .paginate(letters(), Some(2), Some("Z"), None)
            .unwrap_err();
        assert_eq!(err, PaginationError::InvalidCursor("Z".to_string()));

        let err = Paginator::default()
            .paginate(letters(), Some(2), None, Some("Z"))
            .unwrap_err();
        assert_eq!(err, PaginationError::InvalidCursor("Z".to_string()));
    }

    #[test]
    fn empty_collection() {
        let page = Paginator::default()
            .paginate(Vec::<Item>::new(), None, None, None)
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.before, None);
        assert_eq!(page.after, None);
    }

    #[test]
    fn bad_limit_falls_back_to_default() {
        let page = Paginator::default()
            .paginate(letters(), Some(-3), None, None)
            .unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page.after, None);
    }

    #[test]
    fn map_keeps_cursors() {
        let page = Paginator::default()
            .paginate(letters(), Some(2), None, Some("B"))
            .unwrap()
            .map(|item| item.0.to_lowercase());
        assert_eq!(page.children, vec!["c".to_string(), "d".to_string()]);
        assert_eq!(page.before, Some("C"));
        assert_eq!(page.after, Some("D"));
    }

    #[test]
    fn page_serializes_with_null_cursors() {
        let page: Page<&str, &str> = Page {
            children: vec!["A"],
            before: None,
            after: Some("A"),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "children": ["A"], "before": null, "after": "A" })
        );
    }
}
