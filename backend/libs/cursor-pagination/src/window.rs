//! Index arithmetic behind every page.
//!
//! A `Window` only knows the collection length, the anchor position and the
//! limit. It describes which half-open range `[start, end)` is returned and
//! which item positions become the response cursors.

/// Range of a collection selected for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    /// Position whose id becomes the response `before` cursor.
    pub before: Option<usize>,
    /// Position whose id becomes the response `after` cursor.
    pub after: Option<usize>,
}

impl Window {
    /// First page: no anchor.
    pub fn head(len: usize, limit: usize) -> Self {
        let end = limit.min(len);
        let after = (end > 0 && end < len).then(|| end - 1);

        Self {
            start: 0,
            end,
            before: None,
            after,
        }
    }

    /// Items strictly preceding `anchor`.
    ///
    /// `after` is only emitted when the anchor itself is not the last item,
    /// matching the listing behaviour clients already depend on.
    pub fn before(len: usize, anchor: usize, limit: usize) -> Self {
        debug_assert!(anchor < len);

        let start = anchor.saturating_sub(limit);
        let end = anchor;
        let non_empty = start < end;

        Self {
            start,
            end,
            before: (non_empty && start > 0).then_some(start),
            after: (non_empty && anchor + 1 < len).then(|| end - 1),
        }
    }

    /// Items strictly following `anchor`.
    ///
    /// A non-empty page always carries `before`: the anchor lies behind it.
    pub fn after(len: usize, anchor: usize, limit: usize) -> Self {
        debug_assert!(anchor < len);

        let start = anchor + 1;
        let end = start.saturating_add(limit).min(len);
        let non_empty = start < end;

        Self {
            start,
            end,
            before: non_empty.then_some(start),
            after: (non_empty && end < len).then(|| end - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_of_empty_collection() {
        let window = Window::head(0, 25);
        assert!(window.is_empty());
        assert_eq!(window.before, None);
        assert_eq!(window.after, None);
    }

    #[test]
    fn head_with_more_items() {
        let window = Window::head(5, 2);
        assert_eq!((window.start, window.end), (0, 2));
        assert_eq!(window.after, Some(1));
        assert_eq!(window.before, None);
    }

    #[test]
    fn head_covering_whole_collection() {
        let window = Window::head(3, 10);
        assert_eq!((window.start, window.end), (0, 3));
        assert_eq!(window.after, None);
    }

    #[test]
    fn after_in_the_middle() {
        let window = Window::after(5, 1, 2);
        assert_eq!((window.start, window.end), (2, 4));
        assert_eq!(window.before, Some(2));
        assert_eq!(window.after, Some(3));
    }

    #[test]
    fn after_last_item_is_empty() {
        let window = Window::after(5, 4, 2);
        assert!(window.is_empty());
        assert_eq!(window.before, None);
        assert_eq!(window.after, None);
    }

    #[test]
    fn after_reaching_the_end() {
        let window = Window::after(5, 3, 2);
        assert_eq!((window.start, window.end), (4, 5));
        assert_eq!(window.before, Some(4));
        assert_eq!(window.after, None);
    }

    #[test]
    fn before_first_item_is_empty() {
        let window = Window::before(5, 0, 2);
        assert!(window.is_empty());
        assert_eq!(window.before, None);
        assert_eq!(window.after, None);
    }

    #[test]
    fn before_reaching_the_start() {
        let window = Window::before(5, 2, 2);
        assert_eq!((window.start, window.end), (0, 2));
        assert_eq!(window.before, None);
        assert_eq!(window.after, Some(1));
    }

    #[test]
    fn before_with_more_items_behind() {
        let window = Window::before(10, 6, 2);
        assert_eq!((window.start, window.end), (4, 6));
        assert_eq!(window.before, Some(4));
        assert_eq!(window.after, Some(5));
    }

    #[test]
    fn before_last_item_omits_after() {
        let window = Window::before(5, 4, 2);
        assert_eq!((window.start, window.end), (2, 4));
        assert_eq!(window.before, Some(2));
        assert_eq!(window.after, None);
    }

    #[test]
    fn zero_limit_yields_empty_windows() {
        assert!(Window::head(5, 0).is_empty());
        assert_eq!(Window::head(5, 0).after, None);
        assert!(Window::after(5, 1, 0).is_empty());
        assert!(Window::before(5, 3, 0).is_empty());
    }
}
