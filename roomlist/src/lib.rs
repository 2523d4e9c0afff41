//! A headless room listing engine.
//!
//! For adapter-level utilities (viewport sentinels, throttled load-more, autoplay, a
//! frame-driven controller), see the `roomlist-adapter` crate.
//!
//! This crate focuses on the data side of an infinite-scroll room listing: page accumulation
//! with an at-most-one-in-flight guard, the media precedence rule that picks one asset per
//! room/variant, and a small render model derived from the pagination state.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to:
//! - start fetches (`Paginator::begin_load`) and hand results back (`Paginator::complete`)
//! - draw what `ListingView` / `RoomCard` describe
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod dataset;
mod error;
mod media;
mod model;
mod options;
mod pagination;
mod state;
mod view;


pub use dataset::{Dataset, PageSlice, PageSource};
pub use error::{DatasetError, FetchError};
pub use media::{DEFAULT_SIZES, MediaPick, SRCSET_WIDTHS, pick_media, responsive_srcset};
pub use model::{
    DisplayProperty, Entry, HotelDetails, ImageGroup, Room, RoomProperties, SerialGroup,
    SourceCollection, TotalPrice, Variant, VideoUrl, first_image_url, image_urls,
};
pub use options::ListingOptions;
pub use pagination::{FetchTicket, Paginator};
pub use state::{DEFAULT_FETCH_ERROR, Event, PaginationState, Status, reduce};
pub use view::{
    Body, Footer, ListingView, PriceTag, RoomCard, SHOW_LESS_LABEL, SHOW_MORE_LABEL, VariantCard,
};
