//! Adapter utilities for the `roomlist` crate.
//!
//! The `roomlist` crate is UI-agnostic and focuses on listing state and media selection. This
//! crate provides small, framework-neutral helpers an adapter needs to drive it from scroll
//! events:
//!
//! - Viewport sentinels (intersection with a prefetch margin or a visible-fraction threshold)
//! - A throttled load-more trigger
//! - Lazy video autoplay state
//! - A `ListingController` tying them to a page source
//!
//! Time is always supplied by the caller (`now_ms`); nothing here reads a clock.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod autoplay;
mod controller;
mod sentinel;
mod throttle;
mod trigger;

#[cfg(test)]
mod tests;

pub use autoplay::MediaAutoplay;
pub use controller::ListingController;
pub use sentinel::{
    ObserveOptions, ObserverHandle, Region, SentinelObserver, Viewport, VisibilityCallback,
    intersection_ratio, is_region_visible,
};
pub use throttle::Throttle;
pub use trigger::LoadMoreTrigger;
