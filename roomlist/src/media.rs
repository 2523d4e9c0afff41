use serde::{Deserialize, Serialize};

use crate::model::{Room, Variant, VideoUrl, first_image_url};

/// Widths advertised in a responsive `srcset`.
pub const SRCSET_WIDTHS: [u32; 3] = [400, 800, 1200];

/// Default `sizes` hint matching [`SRCSET_WIDTHS`].
pub const DEFAULT_SIZES: &str = "(max-width: 640px) 400px, (max-width: 1024px) 800px, 1200px";

/// The single asset chosen for display.
///
/// Serializes as `{"type": "video", "src": .., "poster": ..}` or `{"type": "image", "src": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaPick {
    Video {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        poster: Option<String>,
    },
    Image {
        src: String,
    },
}

impl MediaPick {
    fn video(src: &str, poster: Option<&str>) -> Self {
        Self::Video {
            src: src.to_owned(),
            poster: poster.map(str::to_owned),
        }
    }

    fn image(src: &str) -> Self {
        Self::Image {
            src: src.to_owned(),
        }
    }

    pub fn src(&self) -> &str {
        match self {
            Self::Video { src, .. } | Self::Image { src } => src,
        }
    }

    pub fn poster(&self) -> Option<&str> {
        match self {
            Self::Video { poster, .. } => poster.as_deref(),
            Self::Image { .. } => None,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}

fn video_src(video_url: Option<&VideoUrl>) -> Option<&str> {
    video_url.and_then(VideoUrl::src)
}

/// Picks the media to show for `room`, optionally narrowed to one of its variants.
///
/// Precedence, first match wins:
/// 1. variant video (poster: variant image, else room image)
/// 2. variant image
/// 3. room video (poster: room image)
/// 4. room image
///
/// Returns `None` when nothing usable is present. Missing or malformed fields are skipped,
/// never reported.
pub fn pick_media(room: &Room, variant: Option<&Variant>) -> Option<MediaPick> {
    let room_image = first_image_url(&room.properties.room_images);

    if let Some(variant) = variant {
        let variant_image = first_image_url(&variant.room_images);
        if let Some(src) = video_src(variant.video_url.as_ref()) {
            return Some(MediaPick::video(src, variant_image.or(room_image)));
        }
        if let Some(src) = variant_image {
            return Some(MediaPick::image(src));
        }
    }

    if let Some(src) = video_src(room.properties.video_url.as_ref()) {
        return Some(MediaPick::video(src, room_image));
    }

    room_image.map(MediaPick::image)
}

/// Builds a width-descriptor `srcset` for `url`, e.g. `"{url}?w=400 400w, ..."`.
pub fn responsive_srcset(url: &str) -> String {
    SRCSET_WIDTHS
        .iter()
        .map(|w| format!("{url}?w={w} {w}w"))
        .collect::<Vec<_>>()
        .join(", ")
}
