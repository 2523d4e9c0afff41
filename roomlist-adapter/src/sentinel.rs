use std::fmt;
use std::sync::Arc;

/// The visible part of the scroll container, on the scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Scroll offset of the viewport's leading edge.
    pub offset: u64,
    pub size: u32,
}

impl Viewport {
    pub fn new(offset: u64, size: u32) -> Self {
        Self { offset, size }
    }

    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size as u64)
    }
}

/// The extent of an observed element, in the same coordinates as [`Viewport`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub start: u64,
    pub size: u32,
}

impl Region {
    pub fn new(start: u64, size: u32) -> Self {
        Self { start, size }
    }

    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObserveOptions {
    /// Grows the viewport by this much on both ends before intersecting.
    pub root_margin: u32,
    /// Fraction of the region (`0.0..=1.0`) that must intersect to count as visible.
    pub threshold: f32,
}

impl ObserveOptions {
    /// Prefetch sentinel: fires `root_margin` units before the region enters the viewport.
    pub fn prefetch(root_margin: u32) -> Self {
        Self {
            root_margin,
            threshold: 0.0,
        }
    }

    /// Autoplay sentinel: visible once `threshold` of the region is inside the viewport.
    pub fn visible_fraction(threshold: f32) -> Self {
        Self {
            root_margin: 0,
            threshold,
        }
    }
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self::prefetch(0)
    }
}

/// Fraction of `region` inside `viewport` grown by `root_margin`, or `None` when they don't touch.
///
/// A zero-size region intersects (ratio 1.0) when it lies within the grown viewport, edges
/// included.
pub fn intersection_ratio(viewport: Viewport, region: Region, root_margin: u32) -> Option<f32> {
    let lo = viewport.offset.saturating_sub(root_margin as u64);
    let hi = viewport.end().saturating_add(root_margin as u64);

    if region.size == 0 {
        return (lo..=hi).contains(&region.start).then_some(1.0);
    }

    let start = region.start.max(lo);
    let end = region.end().min(hi);
    if end <= start {
        return None;
    }
    Some((end - start) as f32 / region.size as f32)
}

/// `true` when `region` satisfies `options` against `viewport`.
pub fn is_region_visible(viewport: Viewport, region: Region, options: ObserveOptions) -> bool {
    intersection_ratio(viewport, region, options.root_margin)
        .is_some_and(|ratio| ratio >= options.threshold)
}

/// A visibility-change callback: `(handle, is_visible)`.
pub type VisibilityCallback = Arc<dyn Fn(ObserverHandle, bool) + Send + Sync>;

/// Identifies one observation registered on a [`SentinelObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(u64);

struct Slot {
    handle: ObserverHandle,
    options: ObserveOptions,
    region: Option<Region>,
    visible: bool,
    on_change: Option<VisibilityCallback>,
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("handle", &self.handle)
            .field("options", &self.options)
            .field("region", &self.region)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// Tracks the visibility of marker regions against a viewport.
///
/// The adapter reports layout via [`SentinelObserver::set_region`] (element mounted, moved, or
/// unmounted) and scroll/resize via [`SentinelObserver::update_viewport`]. Visibility can be
/// polled with [`SentinelObserver::is_visible`] or delivered through a callback, which fires
/// only when the value changes.
///
/// [`SentinelObserver::unobserve`] and [`SentinelObserver::disconnect`] drop the registration
/// (and its callback); the handle then reads as not visible.
#[derive(Debug, Default)]
pub struct SentinelObserver {
    viewport: Option<Viewport>,
    slots: Vec<Slot>,
    next_id: u64,
}

impl SentinelObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Starts observing. The region may be attached later with `set_region`.
    pub fn observe(&mut self, options: ObserveOptions, region: Option<Region>) -> ObserverHandle {
        self.register(options, region, None)
    }

    /// Like [`SentinelObserver::observe`], with a callback fired on every visibility change.
    pub fn observe_with(
        &mut self,
        options: ObserveOptions,
        region: Option<Region>,
        on_change: impl Fn(ObserverHandle, bool) + Send + Sync + 'static,
    ) -> ObserverHandle {
        self.register(options, region, Some(Arc::new(on_change)))
    }

    fn register(
        &mut self,
        options: ObserveOptions,
        region: Option<Region>,
        on_change: Option<VisibilityCallback>,
    ) -> ObserverHandle {
        let handle = ObserverHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.push(Slot {
            handle,
            options,
            region: None,
            visible: false,
            on_change,
        });
        rtrace!(handle = handle.0, "SentinelObserver::observe");
        self.set_region(handle, region);
        handle
    }

    /// Attaches, moves, or (with `None`) detaches the observed element.
    ///
    /// Returns `false` for an unknown handle.
    pub fn set_region(&mut self, handle: ObserverHandle, region: Option<Region>) -> bool {
        let viewport = self.viewport;
        let Some(slot) = self.slots.iter_mut().find(|s| s.handle == handle) else {
            return false;
        };
        slot.region = region;
        let visible = match (viewport, region) {
            (Some(vp), Some(r)) => is_region_visible(vp, r, slot.options),
            _ => false,
        };
        if let Some(cb) = update_visibility(slot, visible) {
            cb(handle, visible);
        }
        true
    }

    /// Stops observing `handle` and releases its callback.
    pub fn unobserve(&mut self, handle: ObserverHandle) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.handle != handle);
        let removed = self.slots.len() != before;
        if removed {
            rtrace!(handle = handle.0, "SentinelObserver::unobserve");
        }
        removed
    }

    /// Drops every observation.
    pub fn disconnect(&mut self) {
        rdebug!(count = self.slots.len(), "SentinelObserver::disconnect");
        self.slots.clear();
    }

    /// Re-evaluates every observed region against `viewport`.
    pub fn update_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);

        let mut changed = Vec::new();
        for slot in &mut self.slots {
            let visible = slot
                .region
                .is_some_and(|r| is_region_visible(viewport, r, slot.options));
            if let Some(cb) = update_visibility(slot, visible) {
                changed.push((cb, slot.handle, visible));
            }
        }
        for (cb, handle, visible) in changed {
            cb(handle, visible);
        }
    }

    pub fn is_visible(&self, handle: ObserverHandle) -> bool {
        self.slots
            .iter()
            .find(|s| s.handle == handle)
            .is_some_and(|s| s.visible)
    }

    pub fn is_observing(&self, handle: ObserverHandle) -> bool {
        self.slots.iter().any(|s| s.handle == handle)
    }
}

/// Stores `visible` and returns the callback to fire if it changed.
fn update_visibility(slot: &mut Slot, visible: bool) -> Option<VisibilityCallback> {
    if slot.visible == visible {
        return None;
    }
    slot.visible = visible;
    rtrace!(handle = slot.handle.0, visible, "SentinelObserver: visibility changed");
    slot.on_change.clone()
}
