use crate::dataset::{PageSlice, PageSource};
use crate::error::FetchError;
use crate::model::Entry;
use crate::state::{Event, PaginationState};

/// Proof that a fetch was started.
///
/// Returned by [`Paginator::begin_load`] and handed back to [`Paginator::complete`] once the
/// page (or an error) is available. A ticket from before a `reset`/`close` no longer matches and
/// its completion is discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub page: usize,
    pub page_size: usize,
    generation: u64,
}

/// Owns the listing state and guards page fetches.
///
/// At most one fetch is in flight: while `status == Loading`, further load requests are
/// suppressed (not queued). Fetching is two-phase so the retrieval itself can happen anywhere
/// (a timer, a worker, another frame):
///
/// ```
/// use roomlist::{Dataset, PageSource, Paginator};
///
/// let source = Dataset::new((0..10).collect::<Vec<u32>>());
/// let mut p = Paginator::new(4);
///
/// let ticket = p.begin_next().unwrap();
/// assert!(p.begin_next().is_none()); // already loading
///
/// let result = source.fetch_page(ticket.page, ticket.page_size);
/// assert!(p.complete(ticket, result));
/// assert_eq!(p.state().items, vec![0, 1, 2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct Paginator<T = Entry> {
    state: PaginationState<T>,
    in_flight: Option<FetchTicket>,
    generation: u64,
    closed: bool,
}

impl<T> Paginator<T> {
    pub fn new(page_size: usize) -> Self {
        Self::from_state(PaginationState::new(page_size))
    }

    pub fn from_state(state: PaginationState<T>) -> Self {
        Self {
            state,
            in_flight: None,
            generation: 0,
            closed: false,
        }
    }

    pub fn state(&self) -> &PaginationState<T> {
        &self.state
    }

    pub fn into_state(self) -> PaginationState<T> {
        self.state
    }

    pub fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Starts loading `page`.
    ///
    /// Returns `None` (and changes nothing) while a fetch is in flight, once the end of the data
    /// has been reached, or after [`Paginator::close`].
    pub fn begin_load(&mut self, page: usize, page_size: usize) -> Option<FetchTicket> {
        if self.closed {
            return None;
        }
        if self.state.is_loading() {
            rtrace!(page, "Paginator::begin_load: suppressed, fetch in flight");
            return None;
        }
        if !self.state.has_more {
            rtrace!(page, "Paginator::begin_load: suppressed, no more data");
            return None;
        }

        let ticket = FetchTicket {
            page,
            page_size,
            generation: self.generation,
        };
        self.state.apply(Event::FetchStarted);
        self.in_flight = Some(ticket);
        rdebug!(page, page_size, "Paginator::begin_load");
        Some(ticket)
    }

    /// Starts loading `page + 1` with the configured page size.
    pub fn begin_next(&mut self) -> Option<FetchTicket> {
        self.begin_load(self.state.page.saturating_add(1), self.state.page_size)
    }

    /// Re-issues the next page after a failure.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.state.status != crate::Status::Failed {
            return None;
        }
        self.begin_next()
    }

    /// Applies the outcome of a fetch started by `ticket`.
    ///
    /// Returns `false` when the ticket is stale (the paginator was reset or closed since, or the
    /// ticket is not the one in flight); the state is left untouched in that case.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<PageSlice<T>, FetchError>) -> bool {
        if self.closed || ticket.generation != self.generation || self.in_flight != Some(ticket) {
            rtrace!(page = ticket.page, "Paginator::complete: stale ticket discarded");
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(slice) => {
                rdebug!(
                    page = ticket.page,
                    len = slice.items.len(),
                    has_more = slice.has_more,
                    "Paginator::complete: page loaded"
                );
                self.state.apply(Event::FetchSucceeded {
                    items: slice.items,
                    has_more: slice.has_more,
                    page: ticket.page,
                });
            }
            Err(err) => {
                rwarn!(page = ticket.page, error = %err, "Paginator::complete: fetch failed");
                self.state.apply(Event::FetchFailed(err.to_string()));
            }
        }
        true
    }

    /// Begins and completes a fetch of `page` against `source` in one step.
    ///
    /// Returns `true` when a fetch was issued.
    pub fn load_page<S>(&mut self, source: &S, page: usize) -> bool
    where
        S: PageSource<T> + ?Sized,
    {
        let Some(ticket) = self.begin_load(page, self.state.page_size) else {
            return false;
        };
        let result = source.fetch_page(ticket.page, ticket.page_size);
        self.complete(ticket, result)
    }

    /// [`Paginator::load_page`] for `page + 1`.
    pub fn load_next<S>(&mut self, source: &S) -> bool
    where
        S: PageSource<T> + ?Sized,
    {
        self.load_page(source, self.state.page.saturating_add(1))
    }

    /// Clears the listing back to its initial state. Any in-flight fetch becomes stale.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
        self.state.apply(Event::Reset);
        rdebug!("Paginator::reset");
    }

    /// Marks the owning view as torn down. Later loads are refused and completions discarded.
    pub fn close(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
        self.closed = true;
    }
}
