//! Contract between the sliding panel and the list it hosts.

/// Scroll API of the list inside a sliding panel.
///
/// The panel forwards the part of a drag it cannot absorb as translation to
/// [`scroll_by`](Self::scroll_by), and hands release velocity over through
/// [`fling_by`](Self::fling_by). Methods take `&self`; implementers hold
/// their scroll position behind interior mutability, like any other UI state.
pub trait PanelList {
    /// Move content by `delta` pixels. Positive moves content down, following
    /// a downward finger.
    fn scroll_by(&self, delta: f32);

    /// Smoothly scroll by `distance` pixels over `duration_millis`. Positive
    /// distance reveals content further down the list.
    fn fling_by(&self, distance: f32, duration_millis: u64);

    /// Residual internal scroll offset, in pixels. Zero at rest.
    fn scroll_offset(&self) -> f32;

    /// Zero the internal scroll offset.
    ///
    /// Some lists keep a stale nonzero offset after a delegated fling comes to
    /// rest and then treat the next touch as overscroll, claiming it before the
    /// panel can. The panel calls this while a drag is still inside the touch
    /// slop, possibly on every move, so it must be idempotent and cheap.
    fn reset_scroll_offset(&self);
}
