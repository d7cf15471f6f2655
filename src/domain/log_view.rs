//! Ordered, append-only log of received messages with a scroll model.
//!
//! [`LogView`] is the in-memory counterpart of the scrolling container the
//! messages are rendered into. Lines are kept in arrival order; the view
//! is scrolled to the bottom after every append so the newest line is
//! always inside the visible window.

use std::collections::VecDeque;

use super::EventMessage;

/// Append-only list of rendered lines plus the current scroll position.
///
/// The scroll unit is one line. `scroll_top` is the index of the first
/// visible line; the largest legal value is
/// `len().saturating_sub(viewport_rows)`.
#[derive(Debug, Clone)]
pub struct LogView {
    lines: VecDeque<EventMessage>,
    max_lines: Option<usize>,
    viewport_rows: usize,
    scroll_top: usize,
    evicted: u64,
}

impl LogView {
    /// Creates an empty, unbounded view showing `viewport_rows` lines.
    #[must_use]
    pub fn new(viewport_rows: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: None,
            viewport_rows: viewport_rows.max(1),
            scroll_top: 0,
            evicted: 0,
        }
    }

    /// Caps the view to the last `max_lines` lines. `None` or `Some(0)`
    /// keeps it unbounded.
    #[must_use]
    pub fn with_max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines.filter(|&n| n > 0);
        self
    }

    /// Appends one message at the end and scrolls to the bottom.
    ///
    /// When the view is capped and full, the oldest line is dropped first.
    pub fn append(&mut self, message: EventMessage) {
        if let Some(cap) = self.max_lines {
            while self.lines.len() >= cap {
                self.lines.pop_front();
                self.evicted += 1;
            }
        }
        self.lines.push_back(message);
        self.scroll_to_bottom();
    }

    /// Moves the scroll position to its maximum.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll_top();
    }

    /// Moves the scroll position, clamped to the legal range.
    pub fn scroll_to(&mut self, top: usize) {
        self.scroll_top = top.min(self.max_scroll_top());
    }

    /// Current scroll position.
    #[must_use]
    pub const fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Largest scroll position for the current content.
    #[must_use]
    pub fn max_scroll_top(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_rows)
    }

    /// Whether the newest line is inside the visible window.
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top == self.max_scroll_top()
    }

    /// Lines inside the visible window, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &EventMessage> {
        self.lines.iter().skip(self.scroll_top).take(self.viewport_rows)
    }

    /// All retained lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &EventMessage> {
        self.lines.iter()
    }

    /// Most recently appended line.
    #[must_use]
    pub fn last(&self) -> Option<&EventMessage> {
        self.lines.back()
    }

    /// Number of retained lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines dropped by the cap so far.
    #[must_use]
    pub const fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Visible rows.
    #[must_use]
    pub const fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }
}
