//! Zoom and scroll state of a plot window
//!
//! Transitions are pure: they only depend on the current state, the figure
//! size at 100% zoom and the size of the visible area. The UI feeds window
//! sizes in and reads `content_size()` / `scroll_offset` back out.

use crate::constants::viewport::{
    ARROW_LINES, FIT_HEIGHT_SHARE, FIT_WIDTH_SHARE, MAX_ZOOM, MIN_ZOOM, PAGE_LINES, SCROLL_LINE,
    ZOOM_STEP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// How far one scroll action moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAmount {
    /// Arrow keys
    Lines(f64),
    /// PageUp / PageDown
    Page,
}

impl ScrollAmount {
    pub const ARROW: ScrollAmount = ScrollAmount::Lines(ARROW_LINES);

    pub fn pixels(&self) -> f64 {
        match self {
            ScrollAmount::Lines(lines) => lines * SCROLL_LINE,
            ScrollAmount::Page => PAGE_LINES * SCROLL_LINE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Figure size in screen pixels at zoom 1.0
    base_size: [f64; 2],
    /// Size of the visible area in pixels
    window: [f64; 2],
    pub zoom_level: f64,
    pub scroll_offset: [f64; 2],
    pub fit_to_window: bool,
}

impl Viewport {
    pub fn new(base_size: [f64; 2], window: [f64; 2]) -> Self {
        Self {
            base_size,
            window,
            zoom_level: 1.0,
            scroll_offset: [0.0, 0.0],
            fit_to_window: false,
        }
    }

    pub fn window(&self) -> [f64; 2] {
        self.window
    }

    /// Figure size at the current zoom
    pub fn content_size(&self) -> [f64; 2] {
        [
            self.base_size[0] * self.zoom_level,
            self.base_size[1] * self.zoom_level,
        ]
    }

    /// Largest scroll offset per axis; zero where the content fits
    pub fn max_scroll(&self) -> [f64; 2] {
        let content = self.content_size();
        [
            (content[0] - self.window[0]).max(0.0),
            (content[1] - self.window[1]).max(0.0),
        ]
    }

    /// True when content overflows the window on either axis
    pub fn is_scrollable(&self) -> bool {
        let max = self.max_scroll();
        max[0] > 0.0 || max[1] > 0.0
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom_level * 100.0).round() as u32
    }

    pub fn zoom_in(&mut self) {
        let zoom = (self.zoom_level + ZOOM_STEP).min(MAX_ZOOM).max(self.zoom_level);
        self.apply_zoom(zoom);
    }

    /// Never increases zoom, even below `MIN_ZOOM` after a fit
    pub fn zoom_out(&mut self) {
        let zoom = (self.zoom_level - ZOOM_STEP).max(MIN_ZOOM).min(self.zoom_level);
        self.apply_zoom(zoom);
    }

    pub fn reset_zoom(&mut self) {
        self.apply_zoom(1.0);
    }

    fn apply_zoom(&mut self, zoom: f64) {
        self.zoom_level = zoom;
        self.fit_to_window = false;
        self.scroll_offset = [0.0, 0.0];
    }

    /// Scale the figure to the largest size that fits the window
    pub fn fit_to_window(&mut self, window: [f64; 2]) {
        self.window = window;
        let available = [window[0] * FIT_WIDTH_SHARE, window[1] * FIT_HEIGHT_SHARE];
        if available[0] <= 0.0 || available[1] <= 0.0 {
            return;
        }
        if self.base_size[0] <= 0.0 || self.base_size[1] <= 0.0 {
            return;
        }

        self.zoom_level = (available[0] / self.base_size[0]).min(available[1] / self.base_size[1]);
        self.fit_to_window = true;
        self.scroll_offset = [0.0, 0.0];
    }

    /// Track a new window size, keeping the fit if one is active
    pub fn resize(&mut self, window: [f64; 2]) {
        if window == self.window {
            return;
        }
        if self.fit_to_window {
            self.fit_to_window(window);
        } else {
            self.window = window;
            self.clamp_scroll();
        }
    }

    /// Move along one axis, only where the content overflows
    pub fn scroll(&mut self, direction: ScrollDirection, amount: ScrollAmount) {
        let pixels = amount.pixels();
        let (axis, delta) = match direction {
            ScrollDirection::Up => (1, -pixels),
            ScrollDirection::Down => (1, pixels),
            ScrollDirection::Left => (0, -pixels),
            ScrollDirection::Right => (0, pixels),
        };

        let max = self.max_scroll()[axis];
        if max <= 0.0 {
            return;
        }
        self.scroll_offset[axis] = (self.scroll_offset[axis] + delta).clamp(0.0, max);
    }

    /// Adopt an offset produced by mouse or scrollbar interaction
    pub fn set_scroll_offset(&mut self, offset: [f64; 2]) {
        self.scroll_offset = offset;
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        for axis in 0..2 {
            self.scroll_offset[axis] = self.scroll_offset[axis].clamp(0.0, max[axis]);
        }
    }
}
