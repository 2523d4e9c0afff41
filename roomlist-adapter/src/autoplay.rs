use crate::{ObserveOptions, ObserverHandle, Region, SentinelObserver};

/// Playback state of one lazily loaded video.
///
/// The video source is attached the first time the element becomes visible and stays attached;
/// playback follows visibility.
#[derive(Debug, PartialEq, Eq)]
pub struct MediaAutoplay {
    handle: ObserverHandle,
    source_attached: bool,
    playing: bool,
}

impl MediaAutoplay {
    /// Registers the video element on `observer` with a visible-fraction `threshold`.
    pub fn attach(observer: &mut SentinelObserver, region: Option<Region>, threshold: f32) -> Self {
        let handle = observer.observe(ObserveOptions::visible_fraction(threshold), region);
        let mut this = Self {
            handle,
            source_attached: false,
            playing: false,
        };
        this.sync(observer);
        this
    }

    pub fn handle(&self) -> ObserverHandle {
        self.handle
    }

    pub fn source_attached(&self) -> bool {
        self.source_attached
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Pulls the current visibility from `observer`. Returns `true` when playback changed.
    pub fn sync(&mut self, observer: &SentinelObserver) -> bool {
        let visible = observer.is_visible(self.handle);
        if visible {
            self.source_attached = true;
        }
        let changed = self.playing != visible;
        self.playing = visible;
        changed
    }

    /// Stops observing and releases the registration.
    pub fn detach(self, observer: &mut SentinelObserver) {
        observer.unobserve(self.handle);
    }
}
