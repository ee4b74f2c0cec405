/// Cursor pagination over ordered in-memory collections
///
/// Every listing in the community service (moderators, invited moderators,
/// approved users, muted users, bans, notifications, messages, posts,
/// comments) is served the same way: the caller loads the complete, already
/// filtered and ordered candidate set, and this crate cuts a bounded page out
/// of it around an optional `before`/`after` anchor.
///
/// The crate performs no I/O and holds no state, so it is safe to call from
/// any number of concurrent requests.
///
/// # Example
///
/// ```rust
/// use cursor_pagination::{Paginable, Paginator};
///
/// #[derive(Debug, Clone)]
/// struct Moderator {
///     username: String,
/// }
///
/// impl Paginable for Moderator {
///     type Id = String;
///
///     fn cursor_id(&self) -> &String {
///         &self.username
///     }
/// }
///
/// let mods: Vec<Moderator> = ["alice", "bob", "carol"]
///     .iter()
///     .map(|name| Moderator { username: name.to_string() })
///     .collect();
///
/// let page = Paginator::default()
///     .paginate(mods, Some(2), None, None)
///     .unwrap();
///
/// assert_eq!(page.children.len(), 2);
/// assert_eq!(page.after.as_deref(), Some("bob"));
/// assert!(page.before.is_none());
/// ```
pub mod error;
pub mod limits;
pub mod page;
pub mod window;

pub use error::{PaginationError, Result};
pub use limits::{PageLimits, DEFAULT_LIMIT, MAX_LIMIT};
pub use page::{paginate, Anchor, Page, PageRequest, Paginable, Paginator};
pub use window::Window;
