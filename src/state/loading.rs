//! Loading indicator state.

/// Tracks what is in flight behind the `#loader` indicator.
///
/// The indicator is visible while layer metadata is being fetched or while the
/// active tile batch is still loading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadingTracker {
    metadata_pending: bool,
    tiles_pending: bool,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.metadata_pending || self.tiles_pending
    }

    /// Marks the metadata fetch as started or finished.
    ///
    /// Returns true if the indicator's visibility changed.
    pub fn set_metadata_pending(&mut self, pending: bool) -> bool {
        let before = self.is_visible();
        self.metadata_pending = pending;
        before != self.is_visible()
    }

    /// Marks the tile batch as started or finished.
    ///
    /// Returns true if the indicator's visibility changed.
    pub fn set_tiles_pending(&mut self, pending: bool) -> bool {
        let before = self.is_visible();
        self.tiles_pending = pending;
        before != self.is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_while_either_is_pending() {
        let mut tracker = LoadingTracker::new();
        assert!(!tracker.is_visible());

        assert!(tracker.set_metadata_pending(true));
        assert!(!tracker.set_tiles_pending(true));
        assert!(!tracker.set_metadata_pending(false));
        assert!(tracker.is_visible());

        assert!(tracker.set_tiles_pending(false));
        assert!(!tracker.is_visible());
    }
}
