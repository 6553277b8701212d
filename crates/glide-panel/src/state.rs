//! Panel translation and the state derived from it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Where the panel sits in its travel range.
///
/// Never stored: always computed from the current translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Collapsed to `offset_max`.
    Down,
    /// Expanded, zero translation.
    Up,
    /// Strictly between the two.
    Partial,
}

impl PanelState {
    pub fn from_translation(translation: f32, offset_max: f32) -> Self {
        if translation <= 0.0 {
            PanelState::Up
        } else if translation >= offset_max {
            PanelState::Down
        } else {
            PanelState::Partial
        }
    }
}

/// Observer of panel motion, for components that mirror the panel.
pub trait TranslateListener {
    /// Called on every translation change.
    ///
    /// `start` is the collapsed offset, `end` the expanded one (always `0`),
    /// and `value` the translation just applied.
    fn on_translate(&self, start: f32, end: f32, value: f32);
}

impl<F: Fn(f32, f32, f32)> TranslateListener for F {
    fn on_translate(&self, start: f32, end: f32, value: f32) {
        self(start, end, value)
    }
}

struct TranslationInner {
    value: Cell<f32>,
    offset_max: f32,
    listener: RefCell<Option<Rc<dyn TranslateListener>>>,
}

/// Vertical offset of the panel from its expanded position.
///
/// Clamped to `[0, offset_max]` on every write. Shared between the controller
/// and the settle animation it starts; the controller guarantees only one of
/// them writes at a time.
#[derive(Clone)]
pub struct PanelTranslation {
    inner: Rc<TranslationInner>,
}

impl PanelTranslation {
    /// Translation starting collapsed, at `offset_max`.
    pub fn new(offset_max: f32) -> Self {
        Self {
            inner: Rc::new(TranslationInner {
                value: Cell::new(offset_max),
                offset_max,
                listener: RefCell::new(None),
            }),
        }
    }

    pub fn value(&self) -> f32 {
        self.inner.value.get()
    }

    pub fn offset_max(&self) -> f32 {
        self.inner.offset_max
    }

    pub fn state(&self) -> PanelState {
        PanelState::from_translation(self.value(), self.inner.offset_max)
    }

    /// Set the translation, clamped to the travel range, and notify the
    /// listener. Non-finite values are ignored. Returns the applied value.
    pub fn set(&self, value: f32) -> f32 {
        if !value.is_finite() {
            log::debug!("ignoring non-finite translation {value}");
            return self.value();
        }
        let clamped = value.clamp(0.0, self.inner.offset_max);
        self.inner.value.set(clamped);

        // Clone out so the listener may call back into the panel.
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            listener.on_translate(self.inner.offset_max, 0.0, clamped);
        }
        clamped
    }

    /// Move by `delta` pixels, clamped. Returns the applied value.
    pub fn offset_by(&self, delta: f32) -> f32 {
        self.set(self.value() + delta)
    }

    pub fn set_listener(&self, listener: Option<Rc<dyn TranslateListener>>) {
        *self.inner.listener.borrow_mut() = listener;
    }

    pub fn listener(&self) -> Option<Rc<dyn TranslateListener>> {
        self.inner.listener.borrow().clone()
    }

    pub(crate) fn downgrade(&self) -> WeakTranslation {
        WeakTranslation(Rc::downgrade(&self.inner))
    }
}

/// Non-owning reference held by settle animation callbacks.
pub(crate) struct WeakTranslation(std::rc::Weak<TranslationInner>);

impl WeakTranslation {
    pub(crate) fn upgrade(&self) -> Option<PanelTranslation> {
        self.0.upgrade().map(|inner| PanelTranslation { inner })
    }
}
