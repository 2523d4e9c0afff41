use crate::*;

use roomlist::{Body, Dataset, FetchError, ListingOptions, PageSlice, PageSource, Paginator, Status};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const ROW: u64 = 100;

fn numbers(n: u32) -> Dataset<u32> {
    Dataset::new((0..n).collect())
}

fn options() -> ListingOptions {
    ListingOptions::default()
        .with_page_size(4)
        .with_simulated_latency_ms(250)
}

/// Places the sentinel right after the loaded rows.
fn sentinel_after_items<S: PageSource<u32>>(c: &mut ListingController<S, u32>) {
    let rows = c.state().items.len() as u64;
    c.set_sentinel_region(Some(Region::new(rows * ROW, 1)));
}

/// Fails the first `failures` requests, then serves from `inner`.
struct Flaky {
    inner: Dataset<u32>,
    failures: AtomicUsize,
    calls: AtomicUsize,
}

impl Flaky {
    fn new(inner: Dataset<u32>, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }
}

impl PageSource<u32> for Flaky {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<PageSlice<u32>, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.failures.load(Ordering::Relaxed) > 0 {
            self.failures.fetch_sub(1, Ordering::Relaxed);
            return Err(FetchError::Unavailable("timed out".into()));
        }
        self.inner.fetch_page(page, page_size)
    }
}

// --- sentinel geometry -------------------------------------------------------

#[test]
fn prefetch_margin_extends_the_viewport() {
    let vp = Viewport::new(0, 100);
    let opts = ObserveOptions::prefetch(600);

    assert!(is_region_visible(vp, Region::new(650, 1), opts));
    assert!(is_region_visible(vp, Region::new(699, 1), opts));
    assert!(!is_region_visible(vp, Region::new(700, 1), opts));
    assert!(!is_region_visible(vp, Region::new(650, 1), ObserveOptions::prefetch(0)));
}

#[test]
fn margin_applies_above_the_viewport_too() {
    let vp = Viewport::new(1000, 100);
    assert!(is_region_visible(vp, Region::new(450, 1), ObserveOptions::prefetch(600)));
    assert!(!is_region_visible(vp, Region::new(300, 1), ObserveOptions::prefetch(600)));
}

#[test]
fn zero_size_region_on_the_edge_intersects() {
    let vp = Viewport::new(0, 100);
    assert_eq!(intersection_ratio(vp, Region::new(100, 0), 0), Some(1.0));
    assert_eq!(intersection_ratio(vp, Region::new(101, 0), 0), None);
}

#[test]
fn visible_fraction_threshold() {
    let vp = Viewport::new(0, 100);
    let opts = ObserveOptions::visible_fraction(0.25);

    assert_eq!(intersection_ratio(vp, Region::new(80, 100), 0), Some(0.2));
    assert!(!is_region_visible(vp, Region::new(80, 100), opts));
    assert!(is_region_visible(vp, Region::new(75, 100), opts));
    assert!(is_region_visible(vp, Region::new(20, 50), opts));
}

// --- observer ----------------------------------------------------------------

#[test]
fn observer_reports_changes_only() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut o = SentinelObserver::new();
    let h = o.observe_with(ObserveOptions::prefetch(0), Some(Region::new(150, 10)), {
        let seen = Arc::clone(&seen);
        move |_, visible| seen.lock().unwrap().push(visible)
    });

    o.update_viewport(Viewport::new(0, 100));
    assert!(!o.is_visible(h));
    o.update_viewport(Viewport::new(100, 100));
    o.update_viewport(Viewport::new(110, 100));
    assert!(o.is_visible(h));
    o.update_viewport(Viewport::new(500, 100));

    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
}

#[test]
fn region_attach_and_detach() {
    let mut o = SentinelObserver::new();
    o.update_viewport(Viewport::new(0, 100));
    let h = o.observe(ObserveOptions::prefetch(0), None);
    assert!(!o.is_visible(h));

    assert!(o.set_region(h, Some(Region::new(10, 10))));
    assert!(o.is_visible(h));

    assert!(o.set_region(h, None));
    assert!(!o.is_visible(h));

    o.update_viewport(Viewport::new(0, 200));
    assert!(!o.is_visible(h));
}

#[test]
fn unobserve_releases_the_callback() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut o = SentinelObserver::new();
    let h = o.observe_with(ObserveOptions::prefetch(0), Some(Region::new(0, 10)), {
        let fired = Arc::clone(&fired);
        move |_, _| {
            fired.fetch_add(1, Ordering::Relaxed);
        }
    });
    assert_eq!(Arc::strong_count(&fired), 2);

    assert!(o.unobserve(h));
    assert_eq!(Arc::strong_count(&fired), 1);
    assert!(!o.is_observing(h));
    assert!(!o.unobserve(h));
    assert!(!o.set_region(h, Some(Region::new(0, 10))));

    o.update_viewport(Viewport::new(0, 100));
    assert_eq!(fired.load(Ordering::Relaxed), 0);
    assert!(!o.is_visible(h));
}

#[test]
fn disconnect_drops_everything() {
    let mut o = SentinelObserver::new();
    let a = o.observe(ObserveOptions::prefetch(0), Some(Region::new(0, 1)));
    let b = o.observe(ObserveOptions::visible_fraction(0.5), Some(Region::new(0, 1)));
    o.update_viewport(Viewport::new(0, 10));
    assert!(o.is_visible(a) && o.is_visible(b));

    o.disconnect();
    assert!(o.is_empty());
    assert!(!o.is_visible(a));
    assert!(!o.is_visible(b));
}

// --- throttle / trigger ------------------------------------------------------

#[test]
fn throttle_is_leading_edge() {
    let mut t = Throttle::new(800);
    assert!(t.try_acquire(1000));
    assert!(!t.try_acquire(1001));
    assert_eq!(t.remaining_ms(1300), 500);
    assert!(!t.try_acquire(1799));
    assert!(t.try_acquire(1800));
    assert_eq!(t.last_ms(), Some(1800));

    t.reset();
    assert!(t.try_acquire(1801));
}

#[test]
fn rapid_visibility_issues_one_load() {
    let ds = numbers(100);
    let mut p = Paginator::new(4);
    let mut trigger = LoadMoreTrigger::new(800);
    let mut issued = 0;

    for now_ms in [0, 150, 300, 450, 600] {
        if let Some(ticket) = trigger.poll(true, now_ms, &mut p) {
            issued += 1;
            p.complete(ticket, ds.fetch_page(ticket.page, ticket.page_size));
        }
    }
    assert_eq!(issued, 1);
    assert_eq!(p.state().items.len(), 4);

    // Still visible once the interval has elapsed.
    let ticket = trigger.poll(true, 800, &mut p).unwrap();
    assert_eq!(ticket.page, 2);
}

#[test]
fn trigger_ignores_hidden_sentinel() {
    let mut p = Paginator::<u32>::new(4);
    let mut trigger = LoadMoreTrigger::new(800);
    assert!(trigger.poll(false, 0, &mut p).is_none());
    // A hidden poll does not consume the window.
    assert!(trigger.poll(true, 1, &mut p).is_some());
}

#[test]
fn trigger_rereads_the_paginator_guard() {
    let ds = numbers(4);
    let mut p = Paginator::new(4);
    let mut trigger = LoadMoreTrigger::new(800);

    let ticket = p.begin_next().unwrap();
    assert!(trigger.poll(true, 0, &mut p).is_none());

    p.complete(ticket, ds.fetch_page(1, 4));
    assert!(!p.state().has_more);
    assert!(trigger.poll(true, 5000, &mut p).is_none());
    assert_eq!(p.state().status, Status::Succeeded);
}

#[test]
fn refused_poll_leaves_the_interval_unused() {
    let ds = numbers(100);
    let mut p = Paginator::new(4);
    let mut trigger = LoadMoreTrigger::new(800);

    let first = p.begin_next().unwrap();
    assert!(trigger.poll(true, 16, &mut p).is_none());
    assert_eq!(trigger.throttle().last_ms(), None);

    p.complete(first, ds.fetch_page(1, 4));
    let ticket = trigger.poll(true, 250, &mut p).unwrap();
    assert_eq!(ticket.page, 2);
}

// --- autoplay ----------------------------------------------------------------

#[test]
fn autoplay_attaches_source_once_and_follows_visibility() {
    let mut o = SentinelObserver::new();
    o.update_viewport(Viewport::new(0, 100));
    let mut video = MediaAutoplay::attach(&mut o, Some(Region::new(80, 100)), 0.25);
    assert!(!video.source_attached());
    assert!(!video.is_playing());

    o.update_viewport(Viewport::new(10, 100));
    assert!(video.sync(&o));
    assert!(video.is_playing());
    assert!(video.source_attached());

    o.update_viewport(Viewport::new(2000, 100));
    assert!(video.sync(&o));
    assert!(!video.is_playing());
    assert!(video.source_attached());
    assert!(!video.sync(&o));

    video.detach(&mut o);
    assert!(o.is_empty());
}

// --- controller --------------------------------------------------------------

#[test]
fn controller_pages_through_a_dataset() {
    let mut c = ListingController::new(numbers(10), options());
    assert!(c.mount(0));
    assert_eq!(c.view().body, Body::Skeleton(4));

    assert!(!c.tick(249));
    assert!(c.tick(250));
    assert_eq!(c.state().items, vec![0, 1, 2, 3]);

    // Sentinel at 400, viewport 0..300 grown by 600: visible.
    sentinel_after_items(&mut c);
    assert!(c.on_viewport(Viewport::new(0, 300), 260));
    assert!(c.is_sentinel_visible());
    assert!(c.view().footer.loading_more);

    assert!(c.tick(510));
    assert_eq!(c.state().items.len(), 8);
    sentinel_after_items(&mut c);

    // Still visible, but throttled until 260 + 800.
    assert!(!c.tick(600));
    assert!(!c.has_pending_fetch());
    assert!(c.tick(1060));
    assert!(c.has_pending_fetch());
    assert!(c.tick(1310));
    assert_eq!(c.state().items, (0..10u32).collect::<Vec<_>>());
    assert!(c.view().footer.end_of_results);

    sentinel_after_items(&mut c);
    assert!(!c.tick(5000));
    assert_eq!(c.state().page, 3);
}

#[test]
fn controller_loads_page_two_as_soon_as_page_one_lands() {
    let mut c = ListingController::new(numbers(10), options());
    assert!(c.mount(0));
    sentinel_after_items(&mut c);

    // Visible while page 1 is still in flight.
    assert!(!c.on_viewport(Viewport::new(0, 300), 16));
    assert!(c.is_sentinel_visible());

    assert!(c.tick(250));
    assert_eq!(c.state().items.len(), 4);
    assert!(c.has_pending_fetch());
    assert!(c.tick(500));
    assert_eq!(c.state().items.len(), 8);
}

#[test]
fn controller_clamps_zero_page_size() {
    let mut c = ListingController::new(numbers(10), options().with_page_size(0));
    assert!(c.mount(0));
    assert!(c.tick(250));
    assert_eq!(c.state().status, Status::Succeeded);
    assert_eq!(c.state().items, vec![0]);
    assert_eq!(c.state().page_size, 1);
}

#[test]
fn controller_waits_for_the_sentinel() {
    let mut c = ListingController::new(numbers(10), options());
    c.mount(0);
    c.tick(250);

    // Beyond the 600 prefetch margin.
    c.set_sentinel_region(Some(Region::new(5000, 1)));
    assert!(!c.on_viewport(Viewport::new(0, 100), 300));
    assert!(!c.has_pending_fetch());

    // Unmounted sentinel never triggers.
    c.set_sentinel_region(None);
    assert!(!c.tick(2000));
    assert_eq!(c.state().page, 1);
}

#[test]
fn controller_failure_and_retry() {
    let mut c = ListingController::new(Flaky::new(numbers(10), 1), options());
    c.mount(0);
    assert!(c.tick(250));
    assert_eq!(c.state().status, Status::Failed);
    assert_eq!(c.view().footer.error.as_deref(), Some("timed out"));
    assert!(c.state().items.is_empty());

    assert!(c.retry(300));
    assert_eq!(c.state().status, Status::Loading);
    assert!(c.tick(550));
    assert_eq!(c.state().items.len(), 4);
    assert_eq!(c.source().calls.load(Ordering::Relaxed), 2);
    assert!(!c.retry(600));
}

#[test]
fn controller_teardown_discards_late_fetch() {
    let mut c = ListingController::new(Flaky::new(numbers(10), 0), options());
    c.mount(0);
    assert!(c.has_pending_fetch());

    c.teardown();
    assert!(!c.is_mounted());
    assert!(c.observer().is_empty());
    assert!(!c.tick(1000));
    assert!(c.state().items.is_empty());
    assert_eq!(c.source().calls.load(Ordering::Relaxed), 0);
    assert!(!c.mount(1000));
}

#[test]
fn controller_reset_reloads_first_page() {
    let mut c = ListingController::new(numbers(10), options().with_simulated_latency_ms(0));
    assert!(c.mount(0));
    assert_eq!(c.state().items.len(), 4);
    sentinel_after_items(&mut c);
    c.on_viewport(Viewport::new(0, 300), 10);
    assert_eq!(c.state().items.len(), 8);

    assert!(c.reset(20));
    assert_eq!(c.state().items, vec![0, 1, 2, 3]);
    assert_eq!(c.state().page, 1);
}

#[test]
fn controller_shares_observer_with_media() {
    let mut c = ListingController::new(numbers(10), options());
    c.mount(0);
    let mut video = MediaAutoplay::attach(c.observer_mut(), Some(Region::new(0, 100)), 0.25);
    c.on_viewport(Viewport::new(0, 300), 10);
    assert!(video.sync(c.observer()));
    assert!(video.is_playing());

    c.teardown();
    video.sync(c.observer());
    assert!(!video.is_playing());
}

#[test]
fn controller_media_uses_configured_threshold() {
    let mut c = ListingController::new(numbers(10), options().with_autoplay_threshold(0.5));
    c.mount(0);
    c.on_viewport(Viewport::new(0, 100), 10);

    // 40% of the element is inside the viewport.
    let mut strict = c.attach_media(Some(Region::new(60, 100)));
    assert!(!strict.is_playing());
    c.on_viewport(Viewport::new(10, 100), 20);
    assert!(strict.sync(c.observer()));
    assert!(strict.is_playing());

    let loose = MediaAutoplay::attach(c.observer_mut(), Some(Region::new(170, 100)), 0.25);
    assert!(!loose.is_playing());
    assert_eq!(c.observer().len(), 3);
}

#[test]
fn sentinel_moves_after_teardown_are_ignored() {
    let mut c = ListingController::new(numbers(10), options());
    c.mount(0);
    c.teardown();
    c.set_sentinel_region(Some(Region::new(0, 1)));
    assert!(!c.is_sentinel_visible());
    assert!(c.observer().is_empty());
}
