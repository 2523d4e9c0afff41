use roomlist::{
    Entry, FetchTicket, ListingOptions, ListingView, PageSource, PaginationState, Paginator,
};

use crate::{
    LoadMoreTrigger, MediaAutoplay, ObserveOptions, ObserverHandle, Region, SentinelObserver,
    Viewport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingFetch {
    ticket: FetchTicket,
    due_ms: u64,
}

/// A framework-neutral controller for an infinite-scroll room listing.
///
/// It owns the page source, the [`Paginator`], and a [`SentinelObserver`] with one load-more
/// sentinel. This type does not hold any UI objects. Adapters drive it by calling:
/// - `mount(now_ms)` once the listing is shown (loads page 1)
/// - `set_sentinel_region` whenever the end-of-list marker is laid out (or unmounted)
/// - `on_viewport` when the UI scrolls or resizes
/// - `tick(now_ms)` each frame/timer tick (resolves fetches, re-polls the sentinel)
/// - `teardown()` when the listing goes away
///
/// Fetches resolve `options.simulated_latency_ms` after they start.
#[derive(Debug)]
pub struct ListingController<S, T = Entry> {
    source: S,
    options: ListingOptions,
    paginator: Paginator<T>,
    observer: SentinelObserver,
    sentinel: ObserverHandle,
    trigger: LoadMoreTrigger,
    pending: Option<PendingFetch>,
    mounted: bool,
}

impl<S: PageSource<T>, T> ListingController<S, T> {
    pub fn new(source: S, options: ListingOptions) -> Self {
        let mut observer = SentinelObserver::new();
        let sentinel = observer.observe(ObserveOptions::prefetch(options.prefetch_margin), None);
        rdebug!(
            page_size = options.page_size,
            prefetch_margin = options.prefetch_margin,
            interval_ms = options.load_more_interval_ms,
            "ListingController::new"
        );
        Self {
            source,
            paginator: Paginator::new(options.page_size),
            trigger: LoadMoreTrigger::new(options.load_more_interval_ms),
            options,
            observer,
            sentinel,
            pending: None,
            mounted: false,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &ListingOptions {
        &self.options
    }

    pub fn state(&self) -> &PaginationState<T> {
        self.paginator.state()
    }

    pub fn paginator(&self) -> &Paginator<T> {
        &self.paginator
    }

    pub fn view(&self) -> ListingView {
        ListingView::from_state(self.paginator.state(), &self.options)
    }

    /// The observer shared by the load-more sentinel and any media sentinels.
    pub fn observer(&self) -> &SentinelObserver {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut SentinelObserver {
        &mut self.observer
    }

    pub fn sentinel(&self) -> ObserverHandle {
        self.sentinel
    }

    pub fn is_sentinel_visible(&self) -> bool {
        self.observer.is_visible(self.sentinel)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending.is_some()
    }

    /// Shows the listing. Loads page 1 if nothing has been loaded yet.
    ///
    /// Returns `true` when a fetch was started.
    pub fn mount(&mut self, now_ms: u64) -> bool {
        if self.paginator.is_closed() {
            return false;
        }
        self.mounted = true;
        if self.paginator.state().page != 0 {
            return false;
        }
        let ticket = self.paginator.begin_load(1, self.paginator.state().page_size);
        self.schedule(ticket, now_ms)
    }

    /// Attaches, moves, or detaches the load-more sentinel.
    pub fn set_sentinel_region(&mut self, region: Option<Region>) {
        if !self.observer.set_region(self.sentinel, region) {
            rwarn!("ListingController::set_sentinel_region: sentinel is no longer observed");
        }
    }

    /// Registers a video element on the shared observer using `options.autoplay_threshold`.
    pub fn attach_media(&mut self, region: Option<Region>) -> MediaAutoplay {
        MediaAutoplay::attach(&mut self.observer, region, self.options.autoplay_threshold)
    }

    /// Reports a scroll/resize. Returns `true` when the listing state changed.
    pub fn on_viewport(&mut self, viewport: Viewport, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        self.observer.update_viewport(viewport);
        self.tick(now_ms)
    }

    /// Advances the controller.
    ///
    /// - Completes the in-flight fetch once its latency has elapsed.
    /// - While the sentinel is visible, asks the trigger for the next page.
    ///
    /// Returns `true` when the listing state changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        let mut changed = self.resolve_due(now_ms);
        if self.is_sentinel_visible() {
            let ticket = self.trigger.poll(true, now_ms, &mut self.paginator);
            changed |= self.schedule(ticket, now_ms);
        }
        changed
    }

    /// Re-requests the page that failed.
    pub fn retry(&mut self, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        let ticket = self.paginator.retry();
        self.schedule(ticket, now_ms)
    }

    /// Clears the listing; when mounted, page 1 is requested again right away.
    ///
    /// A fetch still in flight is dropped and its result discarded.
    pub fn reset(&mut self, now_ms: u64) -> bool {
        self.pending = None;
        self.paginator.reset();
        self.trigger.reset();
        if !self.mounted {
            return true;
        }
        let ticket = self.paginator.begin_load(1, self.paginator.state().page_size);
        self.schedule(ticket, now_ms);
        true
    }

    /// Tears the listing down: stops every observation, drops the in-flight fetch, and refuses
    /// further loads.
    pub fn teardown(&mut self) {
        rdebug!(pending = self.pending.is_some(), "ListingController::teardown");
        self.observer.disconnect();
        self.pending = None;
        self.paginator.close();
        self.mounted = false;
    }

    /// Records a started fetch. Returns `true` when `ticket` is `Some`.
    fn schedule(&mut self, ticket: Option<FetchTicket>, now_ms: u64) -> bool {
        let Some(ticket) = ticket else {
            return false;
        };
        self.pending = Some(PendingFetch {
            ticket,
            due_ms: now_ms.saturating_add(self.options.simulated_latency_ms),
        });
        self.resolve_due(now_ms);
        true
    }

    fn resolve_due(&mut self, now_ms: u64) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now_ms < pending.due_ms {
            return false;
        }
        self.pending = None;
        let PendingFetch { ticket, .. } = pending;
        let result = self.source.fetch_page(ticket.page, ticket.page_size);
        self.paginator.complete(ticket, result)
    }
}
