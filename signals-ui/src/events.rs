//! Event handling results.

/// Result of handling an event.
///
/// `Consumed` means the widget acted on the event and the host should
/// suppress its default behavior (e.g. scrolling on arrow keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}
