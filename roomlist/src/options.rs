use serde::{Deserialize, Serialize};

/// Configuration for a room listing.
///
/// Every field has a default, so a partial JSON document (or `{}`) deserializes into a usable
/// configuration:
///
/// ```
/// let opts: roomlist::ListingOptions = serde_json::from_str(r#"{"page_size": 4}"#).unwrap();
/// assert_eq!(opts.page_size, 4);
/// assert_eq!(opts.load_more_interval_ms, 800);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingOptions {
    /// Items per page.
    pub page_size: usize,
    /// How far (in scroll units) before entering the viewport the load-more sentinel fires.
    pub prefetch_margin: u32,
    /// Minimum visible fraction of a video before it autoplays.
    pub autoplay_threshold: f32,
    /// Minimum interval between two load-more attempts.
    pub load_more_interval_ms: u64,
    /// Artificial latency applied to each simulated page fetch.
    pub simulated_latency_ms: u64,
    /// Pad the dataset by cloning entries until it holds this many.
    pub pad_to: Option<usize>,
    /// Placeholder rows shown while the first page loads.
    pub skeleton_count: usize,
    /// Variants shown per room before the list is expanded.
    pub collapsed_variants: usize,
}

impl ListingOptions {
    pub const DEFAULT_PAGE_SIZE: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_prefetch_margin(mut self, prefetch_margin: u32) -> Self {
        self.prefetch_margin = prefetch_margin;
        self
    }

    pub fn with_autoplay_threshold(mut self, threshold: f32) -> Self {
        self.autoplay_threshold = threshold;
        self
    }

    pub fn with_load_more_interval_ms(mut self, interval_ms: u64) -> Self {
        self.load_more_interval_ms = interval_ms;
        self
    }

    pub fn with_simulated_latency_ms(mut self, latency_ms: u64) -> Self {
        self.simulated_latency_ms = latency_ms;
        self
    }

    pub fn with_pad_to(mut self, pad_to: Option<usize>) -> Self {
        self.pad_to = pad_to;
        self
    }

    pub fn with_skeleton_count(mut self, skeleton_count: usize) -> Self {
        self.skeleton_count = skeleton_count;
        self
    }

    pub fn with_collapsed_variants(mut self, collapsed_variants: usize) -> Self {
        self.collapsed_variants = collapsed_variants;
        self
    }
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            prefetch_margin: 600,
            autoplay_threshold: 0.25,
            load_more_interval_ms: 800,
            simulated_latency_ms: 250,
            pad_to: None,
            skeleton_count: 4,
            collapsed_variants: 2,
        }
    }
}
