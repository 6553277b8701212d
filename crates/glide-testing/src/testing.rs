//! Recording fakes for the collaborators a panel talks to.

use std::cell::{Cell, RefCell};

use glide_foundation::{PanelList, PointerEventKind};
use glide_panel::TranslateListener;

/// A [`PanelList`] that remembers every call made to it.
///
/// The scroll offset is whatever the test sets through
/// [`set_scroll_offset`](Self::set_scroll_offset); scrolling does not move it.
#[derive(Default)]
pub struct RecordingList {
    scrolls: RefCell<Vec<f32>>,
    flings: RefCell<Vec<(f32, u64)>>,
    events: RefCell<Vec<PointerEventKind>>,
    offset: Cell<f32>,
    offset_resets: Cell<usize>,
}

impl RecordingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scrolls(&self) -> Vec<f32> {
        self.scrolls.borrow().clone()
    }

    pub fn total_scrolled(&self) -> f32 {
        self.scrolls.borrow().iter().sum()
    }

    /// `(distance, duration_millis)` of every fling, oldest first.
    pub fn flings(&self) -> Vec<(f32, u64)> {
        self.flings.borrow().clone()
    }

    pub fn last_fling(&self) -> Option<(f32, u64)> {
        self.flings.borrow().last().copied()
    }

    /// Kinds of the pointer events the host let through to the list.
    pub fn events(&self) -> Vec<PointerEventKind> {
        self.events.borrow().clone()
    }

    pub fn record_event(&self, kind: PointerEventKind) {
        self.events.borrow_mut().push(kind);
    }

    pub fn set_scroll_offset(&self, offset: f32) {
        self.offset.set(offset);
    }

    pub fn offset_resets(&self) -> usize {
        self.offset_resets.get()
    }

    pub fn clear(&self) {
        self.scrolls.borrow_mut().clear();
        self.flings.borrow_mut().clear();
        self.events.borrow_mut().clear();
        self.offset_resets.set(0);
    }
}

impl PanelList for RecordingList {
    fn scroll_by(&self, delta: f32) {
        self.scrolls.borrow_mut().push(delta);
    }

    fn fling_by(&self, distance: f32, duration_millis: u64) {
        self.flings.borrow_mut().push((distance, duration_millis));
    }

    fn scroll_offset(&self) -> f32 {
        self.offset.get()
    }

    fn reset_scroll_offset(&self) {
        self.offset.set(0.0);
        self.offset_resets.set(self.offset_resets.get() + 1);
    }
}

/// A [`TranslateListener`] keeping every translation it was told about.
#[derive(Default)]
pub struct RecordingListener {
    values: RefCell<Vec<f32>>,
    range: Cell<Option<(f32, f32)>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> Vec<f32> {
        self.values.borrow().clone()
    }

    pub fn last_value(&self) -> Option<f32> {
        self.values.borrow().last().copied()
    }

    pub fn call_count(&self) -> usize {
        self.values.borrow().len()
    }

    /// `(start, end)` reported with the most recent call.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.range.get()
    }

    pub fn clear(&self) {
        self.values.borrow_mut().clear();
        self.range.set(None);
    }
}

impl TranslateListener for RecordingListener {
    fn on_translate(&self, start: f32, end: f32, value: f32) {
        self.range.set(Some((start, end)));
        self.values.borrow_mut().push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_records_calls_and_resets_offset() {
        let list = RecordingList::new();
        list.scroll_by(-4.0);
        list.scroll_by(-6.0);
        list.fling_by(120.0, 300);
        list.set_scroll_offset(7.0);
        list.reset_scroll_offset();

        assert_eq!(list.total_scrolled(), -10.0);
        assert_eq!(list.last_fling(), Some((120.0, 300)));
        assert_eq!(list.scroll_offset(), 0.0);
        assert_eq!(list.offset_resets(), 1);

        list.clear();
        assert!(list.scrolls().is_empty());
        assert!(list.flings().is_empty());
    }

    #[test]
    fn listener_keeps_values_in_order() {
        let listener = RecordingListener::new();
        listener.on_translate(300.0, 0.0, 250.0);
        listener.on_translate(300.0, 0.0, 120.0);

        assert_eq!(listener.values(), vec![250.0, 120.0]);
        assert_eq!(listener.range(), Some((300.0, 0.0)));
        assert_eq!(listener.call_count(), 2);
    }
}
