//! Shared slot for the front-end's change callback

use std::cell::RefCell;
use std::rc::Rc;

/// Holds at most one callback. Cloning shares the slot.
#[derive(Debug)]
pub struct ChangeListener<F> {
    slot: Rc<RefCell<Option<F>>>,
}

impl<F> Clone for ChangeListener<F> {
    fn clone(&self) -> Self {
        Self { slot: Rc::clone(&self.slot) }
    }
}

impl<F> Default for ChangeListener<F> {
    fn default() -> Self {
        Self { slot: Rc::new(RefCell::new(None)) }
    }
}

impl<F: Clone> ChangeListener<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, callback: Option<F>) {
        *self.slot.borrow_mut() = callback;
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Run `call` on the current callback, if any.
    ///
    /// The slot is not borrowed while `call` runs, so the callback may replace
    /// or clear itself.
    pub fn notify<R>(&self, call: impl FnOnce(&F) -> R) -> Option<R> {
        let callback = self.slot.borrow().clone();
        callback.as_ref().map(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    type Callback = Rc<dyn Fn()>;

    #[test]
    fn test_notify_without_callback() {
        let listener: ChangeListener<Callback> = ChangeListener::new();
        assert!(!listener.is_set());
        assert_eq!(listener.notify(|f| f()), None);
    }

    #[test]
    fn test_callback_can_replace_itself() {
        let listener: ChangeListener<Callback> = ChangeListener::new();
        let calls = Rc::new(Cell::new(0));

        let inner = listener.clone();
        let counter = Rc::clone(&calls);
        listener.set(Some(Rc::new(move || {
            counter.set(counter.get() + 1);
            inner.set(None);
        })));

        assert_eq!(listener.notify(|f| f()), Some(()));
        assert_eq!(calls.get(), 1);
        assert!(!listener.is_set());
        assert_eq!(listener.notify(|f| f()), None);
    }
}
