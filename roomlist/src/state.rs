use serde::Serialize;

use crate::model::Entry;

/// Message stored when a failure carries no text of its own.
pub const DEFAULT_FETCH_ERROR: &str = "Failed to fetch";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// A snapshot of the accumulated listing.
///
/// `items` is in page order; `page` is the last successfully loaded page (0 before the first).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaginationState<T = Entry> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
    pub status: Status,
    pub error: Option<String>,
}

impl<T> PaginationState<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            has_more: true,
            status: Status::Idle,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Loading, with nothing loaded yet.
    pub fn is_initial_load(&self) -> bool {
        self.is_loading() && self.page == 0
    }

    /// Loading a page after the first.
    pub fn is_loading_more(&self) -> bool {
        self.is_loading() && self.page > 0
    }

    /// `true` when a new page may be requested: not loading and more data is available.
    pub fn can_load_more(&self) -> bool {
        !self.is_loading() && self.has_more
    }

    pub fn apply(&mut self, event: Event<T>) {
        match event {
            Event::FetchStarted => {
                self.status = Status::Loading;
                self.error = None;
            }
            Event::FetchSucceeded {
                items,
                has_more,
                page,
            } => {
                self.items.extend(items);
                self.page = page;
                self.has_more = has_more;
                self.status = Status::Succeeded;
            }
            Event::FetchFailed(message) => {
                self.status = Status::Failed;
                self.error = Some(if message.is_empty() {
                    DEFAULT_FETCH_ERROR.to_owned()
                } else {
                    message
                });
            }
            Event::Reset => {
                self.items.clear();
                self.page = 0;
                self.has_more = true;
                self.status = Status::Idle;
                self.error = None;
            }
        }
    }
}

impl<T> Default for PaginationState<T> {
    fn default() -> Self {
        Self::new(crate::ListingOptions::DEFAULT_PAGE_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event<T = Entry> {
    FetchStarted,
    FetchSucceeded {
        items: Vec<T>,
        has_more: bool,
        page: usize,
    },
    FetchFailed(String),
    Reset,
}

/// Folds `event` into `state`.
///
/// This is the pure transition function; guards (no duplicate in-flight fetch, no fetch past
/// the end) live in [`crate::Paginator`].
pub fn reduce<T>(mut state: PaginationState<T>, event: Event<T>) -> PaginationState<T> {
    state.apply(event);
    state
}
