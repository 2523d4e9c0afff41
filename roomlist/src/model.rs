//! Room/variant schema as it appears in the source JSON.
//!
//! Every nested field is optional and deserializes leniently: a value of the wrong JSON type
//! reads as absent (or empty) instead of failing the whole document. Consumers go through the
//! extraction helpers here (`VideoUrl::src`, `first_image_url`, ...) rather than poking at raw
//! fields, so a malformed record simply falls through to the next candidate.

use std::sync::Arc;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deserializes `T`, replacing a mistyped value with `T::default()`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserializes a sequence, dropping elements that do not match `T`.
///
/// A non-array value yields an empty `Vec`.
pub(crate) fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| T::deserialize(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Deserializes a string or a number as text. Anything else is absent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

/// A video reference: either a bare URL or an object keyed by quality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoUrl {
    Bare(String),
    Qualities {
        /// Preferred quality.
        #[serde(default, deserialize_with = "lenient_text")]
        med: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        url: Option<String>,
    },
    /// Any other JSON shape. Never yields a URL.
    Unrecognized(Value),
}

impl VideoUrl {
    /// Returns the first non-empty URL in `med` → `url` → bare-string order.
    pub fn src(&self) -> Option<&str> {
        match self {
            Self::Bare(url) => non_empty(url),
            Self::Qualities { med, url } => med
                .as_deref()
                .and_then(non_empty)
                .or_else(|| url.as_deref().and_then(non_empty)),
            Self::Unrecognized(_) => None,
        }
    }
}

/// An ordered group of image URLs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGroup {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub image_urls: Vec<String>,
}

/// Returns the first non-empty image URL across `groups`, in order.
pub fn first_image_url(groups: &[ImageGroup]) -> Option<&str> {
    image_urls(groups).next()
}

/// Iterates every non-empty image URL across `groups`, in order.
pub fn image_urls(groups: &[ImageGroup]) -> impl Iterator<Item = &str> {
    groups
        .iter()
        .flat_map(|g| g.image_urls.iter())
        .map(String::as_str)
        .filter(|u| !u.is_empty())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomProperties {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub room_images: Vec<ImageGroup>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_url: Option<VideoUrl>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: RoomProperties,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub variants: Vec<Variant>,
}

/// A name/value pair shown under a variant (meal plan, bed type, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProperty {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalPrice {
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub discounted_price: Option<f64>,
}

/// A bookable configuration of a room.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_url: Option<VideoUrl>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub room_images: Vec<ImageGroup>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub display_properties: Vec<DisplayProperty>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_price: Option<TotalPrice>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelDetails {
    #[serde(default, deserialize_with = "lenient_text")]
    pub item_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Fields the listing does not interpret, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SerialGroup {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub rooms: Vec<Room>,
}

/// The nested hotel → serial → room document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCollection {
    #[serde(default, deserialize_with = "lenient")]
    pub hotel_details: Option<HotelDetails>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub rooms_by_serial_no: Vec<SerialGroup>,
}

/// One paginated unit: a single room in its hotel context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub hotel: Arc<HotelDetails>,
    pub room: Room,
}
