//! Minimal scrolling to keep a rectangle in view.

use crate::geometry::{Rect, Size};

/// Scroll position of the viewport over the content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub top: f32,
    pub left: f32,
}

impl ScrollOffset {
    pub fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }

    /// Clamp both axes into `[0, max_scroll]`.
    pub fn clamped(self, viewport: Size, content: Size) -> Self {
        Self {
            top: self.top.clamp(0.0, max_scroll(content.height, viewport.height)),
            left: self.left.clamp(0.0, max_scroll(content.width, viewport.width)),
        }
    }
}

fn max_scroll(content: f32, viewport: f32) -> f32 {
    (content - viewport).max(0.0)
}

/// Computes the smallest scroll change that brings a target into view.
///
/// Within `slop` of either scroll limit the result snaps to that limit, so
/// the caret near the top or bottom of the document scrolls all the way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportScroller {
    slop: f32,
}

impl Default for ViewportScroller {
    fn default() -> Self {
        Self { slop: 6.0 }
    }
}

impl ViewportScroller {
    pub fn new(slop: f32) -> Self {
        Self {
            slop: slop.max(0.0),
        }
    }

    pub fn slop(&self) -> f32 {
        self.slop
    }

    /// Scroll offset that makes `target` (content coordinates) visible in a
    /// viewport of `viewport` size.
    pub fn ensure_visible(
        &self,
        target: Rect,
        viewport: Size,
        current: ScrollOffset,
        content: Size,
    ) -> ScrollOffset {
        let top = self.axis(
            target.min_y(),
            target.max_y(),
            current.top,
            viewport.height,
            max_scroll(content.height, viewport.height),
        );
        let left = self.axis(
            target.min_x(),
            target.max_x(),
            current.left,
            viewport.width,
            max_scroll(content.width, viewport.width),
        );
        let next = ScrollOffset { top, left };
        if next != current {
            log::debug!(
                "scroll ({}, {}) -> ({}, {})",
                current.top,
                current.left,
                next.top,
                next.left
            );
        }
        next
    }

    fn axis(&self, min: f32, max: f32, scroll: f32, extent: f32, max_scroll: f32) -> f32 {
        let rel_min = min - scroll;
        let rel_max = max - scroll;
        let next = if rel_min < 0.0 {
            let next = scroll + rel_min;
            if next <= self.slop { 0.0 } else { next }
        } else if rel_max > extent {
            let next = scroll + rel_max - extent;
            if next >= max_scroll - self.slop {
                max_scroll
            } else {
                next
            }
        } else {
            scroll
        };
        next.clamp(0.0, max_scroll)
    }
}
