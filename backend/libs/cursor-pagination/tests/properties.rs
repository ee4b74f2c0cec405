//! Property tests for the pagination engine.

use cursor_pagination::{paginate, Page, PageRequest, Paginable, Paginator};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    id: u32,
}

impl Paginable for Entry {
    type Id = u32;

    fn cursor_id(&self) -> &u32 {
        &self.id
    }
}

fn entries(len: usize) -> Vec<Entry> {
    (0..len as u32).map(|id| Entry { id: id * 10 + 7 }).collect()
}

fn ids(page: &Page<Entry, u32>) -> Vec<u32> {
    page.children.iter().map(|e| e.id).collect()
}

proptest! {
    #[test]
    fn first_page_is_a_prefix(len in 0usize..60, limit in 1i64..=100) {
        let items = entries(len);
        let page = Paginator::default()
            .paginate(items.clone(), Some(limit), None, None)
            .unwrap();

        let expected = (limit as usize).min(len);
        prop_assert_eq!(page.children.as_slice(), &items[..expected]);
        prop_assert!(page.before.is_none());
        prop_assert_eq!(page.after.is_some(), expected < len);
    }

    #[test]
    fn after_page_follows_the_anchor(len in 1usize..60, limit in 1i64..=100, pick in any::<prop::sample::Index>()) {
        let items = entries(len);
        let i = pick.index(len);
        let page = Paginator::default()
            .paginate(items.clone(), Some(limit), None, Some(items[i].id))
            .unwrap();

        let end = (i + 1 + limit as usize).min(len);
        prop_assert_eq!(page.children.as_slice(), &items[i + 1..end]);
        prop_assert_eq!(page.before, page.children.first().map(|e| e.id));
        prop_assert_eq!(page.after.is_some(), !page.is_empty() && end < len);
    }

    #[test]
    fn before_page_precedes_the_anchor(len in 1usize..60, limit in 1i64..=100, pick in any::<prop::sample::Index>()) {
        let items = entries(len);
        let i = pick.index(len);
        let page = Paginator::default()
            .paginate(items.clone(), Some(limit), Some(items[i].id), None)
            .unwrap();

        let start = i.saturating_sub(limit as usize);
        prop_assert_eq!(page.children.as_slice(), &items[start..i]);
        prop_assert_eq!(page.before.is_some(), !page.is_empty() && start > 0);
        if let Some(after) = page.after {
            prop_assert_eq!(Some(after), page.children.last().map(|e| e.id));
            prop_assert!(i + 1 < len);
        }
    }

    #[test]
    fn following_after_cursors_visits_everything_once(len in 0usize..80, limit in 1i64..=30) {
        let items = entries(len);
        let paginator = Paginator::default();

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = paginator
                .paginate(items.clone(), Some(limit), None, cursor)
                .unwrap();
            seen.extend(ids(&page));
            match page.after {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        let expected: Vec<u32> = items.iter().map(|e| e.id).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn following_before_cursors_walks_back_to_the_start(len in 1usize..80, limit in 1i64..=30) {
        let items = entries(len);
        let paginator = Paginator::default();
        let last = items[len - 1].id;

        let mut pages = Vec::new();
        let mut cursor = Some(last);
        while let Some(anchor) = cursor {
            let page = paginator
                .paginate(items.clone(), Some(limit), Some(anchor), None)
                .unwrap();
            cursor = page.before;
            pages.push(ids(&page));
        }

        let seen: Vec<u32> = pages.into_iter().rev().flatten().collect();
        let expected: Vec<u32> = items[..len - 1].iter().map(|e| e.id).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn paginate_is_idempotent(len in 0usize..40, limit in -5i64..120) {
        let items = entries(len);
        let request = PageRequest::new(Some(limit), None, None, &Default::default()).unwrap();
        let first = paginate(items.clone(), &request).unwrap();
        let second = paginate(items, &request).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn anchors_at_the_extremes_produce_empty_pages() {
    let items = entries(4);
    let paginator = Paginator::default();

    let page = paginator
        .paginate(items.clone(), Some(3), Some(items[0].id), None)
        .unwrap();
    assert!(page.is_empty());
    assert!(page.before.is_none());

    let page = paginator
        .paginate(items.clone(), Some(3), None, Some(items[3].id))
        .unwrap();
    assert!(page.is_empty());
    assert!(page.after.is_none());
}

#[test]
fn limit_covering_the_collection_has_no_trailing_cursor() {
    let items = entries(7);
    let paginator = Paginator::default();

    let page = paginator.paginate(items.clone(), Some(7), None, None).unwrap();
    assert_eq!(page.len(), 7);
    assert!(page.after.is_none());

    let page = paginator
        .paginate(items.clone(), Some(50), None, Some(items[2].id))
        .unwrap();
    assert_eq!(page.len(), 4);
    assert!(page.after.is_none());
}
