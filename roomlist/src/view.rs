//! Headless render model.
//!
//! These types describe *what* a listing should show for a given state; drawing them is left to
//! the host UI.

use serde::Serialize;

use crate::media::{MediaPick, pick_media};
use crate::model::{Room, TotalPrice, Variant, image_urls};
use crate::options::ListingOptions;
use crate::state::{PaginationState, Status};

pub const SHOW_MORE_LABEL: &str = "Click to see more";
pub const SHOW_LESS_LABEL: &str = "Click to see less";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Body {
    /// The first page is loading: draw this many placeholder rows.
    Skeleton(usize),
    /// Draw `state.items`.
    Items,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub loading_more: bool,
    pub end_of_results: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListingView {
    pub body: Body,
    pub footer: Footer,
}

impl ListingView {
    pub fn from_state<T>(state: &PaginationState<T>, options: &ListingOptions) -> Self {
        let body = if state.is_initial_load() {
            Body::Skeleton(options.skeleton_count)
        } else {
            Body::Items
        };
        let error = match state.status {
            Status::Failed => state.error.clone(),
            _ => None,
        };
        Self {
            body,
            footer: Footer {
                loading_more: state.is_loading_more(),
                end_of_results: !state.has_more,
                error,
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PriceTag {
    pub currency: Option<String>,
    pub original: Option<f64>,
    pub discounted: Option<f64>,
    /// Rounded percentage saved; only set when positive.
    pub discount_pct: Option<u32>,
}

impl PriceTag {
    pub fn from_total(total: &TotalPrice) -> Self {
        Self {
            currency: total.currency.clone(),
            original: total.total_price,
            discounted: total.discounted_price,
            discount_pct: discount_pct(total.total_price, total.discounted_price),
        }
    }
}

fn discount_pct(original: Option<f64>, discounted: Option<f64>) -> Option<u32> {
    let (orig, new) = (original?, discounted?);
    if orig <= 0.0 || new <= 0.0 {
        return None;
    }
    let pct = ((1.0 - new / orig) * 100.0).round();
    if pct >= 1.0 { Some(pct as u32) } else { None }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariantCard {
    pub name: Option<String>,
    /// Display property values, in source order.
    pub properties: Vec<String>,
    pub price: Option<PriceTag>,
    pub media: Option<MediaPick>,
}

impl VariantCard {
    pub fn new(room: &Room, variant: &Variant) -> Self {
        Self {
            name: variant.name.clone(),
            properties: variant
                .display_properties
                .iter()
                .filter_map(|p| p.value.clone())
                .collect(),
            price: variant.total_price.as_ref().map(PriceTag::from_total),
            media: pick_media(room, Some(variant)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomCard {
    pub name: Option<String>,
    pub media: Option<MediaPick>,
    /// Every room-level image, for the gallery.
    pub gallery: Vec<String>,
    pub variants: Vec<VariantCard>,
    /// Total variants, including collapsed ones.
    pub variant_count: usize,
    pub expanded: bool,
    /// Label for the expand/collapse toggle; `None` when every variant already fits.
    pub toggle_label: Option<&'static str>,
}

impl RoomCard {
    pub fn new(room: &Room, expanded: bool, options: &ListingOptions) -> Self {
        let limit = options.collapsed_variants;
        let shown = if expanded {
            room.variants.len()
        } else {
            room.variants.len().min(limit)
        };
        let toggle_label = (room.variants.len() > limit).then_some(if expanded {
            SHOW_LESS_LABEL
        } else {
            SHOW_MORE_LABEL
        });
        Self {
            name: room.name.clone(),
            media: pick_media(room, None),
            gallery: image_urls(&room.properties.room_images)
                .map(str::to_owned)
                .collect(),
            variants: room.variants[..shown]
                .iter()
                .map(|v| VariantCard::new(room, v))
                .collect(),
            variant_count: room.variants.len(),
            expanded,
            toggle_label,
        }
    }
}
