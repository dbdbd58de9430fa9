//! Scroll position of the transcript view.
//!
//! The view is pinned to the newest line: every transcript change re-pins it, and each
//! animation frame moves the offset part of the way toward the bottom. Scrolling up by
//! hand unpins until the user scrolls back down to the end.

/// Scroll state for the transcript viewport
#[derive(Debug, Clone)]
pub struct ScrollSync {
    /// First visible line (0 = top)
    offset: usize,
    /// Offset at which the last line sits at the bottom of the viewport
    max_scroll: usize,
    /// Follow new content to the bottom
    pinned: bool,
    /// Viewport height once the view has been laid out
    viewport: Option<u16>,
    /// Last transcript revision acted on
    seen_revision: u64,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self { offset: 0, max_scroll: 0, pinned: true, viewport: None, seen_revision: 0 }
    }

    /// React to a transcript revision; repeated calls with the same value do nothing
    pub fn observe(&mut self, revision: u64) {
        if revision == self.seen_revision {
            return;
        }
        self.seen_revision = revision;
        self.pinned = true;
    }

    /// Record the laid-out size of the transcript view
    pub fn mount(&mut self, content_lines: usize, viewport_height: u16) {
        self.viewport = Some(viewport_height);
        self.max_scroll = content_lines.saturating_sub(usize::from(viewport_height));
        self.offset = self.offset.min(self.max_scroll);
    }

    /// Forget the layout, e.g. when the view is torn down
    pub fn unmount(&mut self) {
        self.viewport = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.viewport.is_some()
    }

    /// Advance one animation frame toward the bottom
    ///
    /// Returns true if the offset moved. Does nothing while unmounted or unpinned.
    pub fn step(&mut self) -> bool {
        if self.viewport.is_none() || !self.pinned || self.offset >= self.max_scroll {
            return false;
        }

        let remaining = self.max_scroll - self.offset;
        self.offset += remaining.div_ceil(2).max(1);
        true
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        if self.offset < self.max_scroll {
            self.pinned = false;
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines).min(self.max_scroll);
        if self.offset >= self.max_scroll {
            self.pinned = true;
        }
    }

    /// Jump straight to the bottom without animating
    pub fn scroll_to_end(&mut self) {
        self.offset = self.max_scroll;
        self.pinned = true;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn max_scroll(&self) -> usize {
        self.max_scroll
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_scroll
    }

    /// Page size for PageUp/PageDown
    pub fn page(&self) -> usize {
        usize::from(self.viewport.unwrap_or(1)).saturating_sub(1).max(1)
    }
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}
