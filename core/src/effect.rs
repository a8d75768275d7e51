//! Deferred UI mutations.
//!
//! State subscribers only see the new value, not the [`Ui`]. Subscribers
//! registered through [`Ui::watch`] push an effect here instead, and the `Ui`
//! runs queued effects after every dispatched event and on [`Ui::flush`].

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use crate::Ui;

/// A mutation waiting for access to the [`Ui`].
pub type Effect = Box<dyn FnOnce(&mut Ui)>;

/// A shared FIFO of pending effects.
#[derive(Clone, Default)]
pub struct EffectQueue(Rc<RefCell<VecDeque<Effect>>>);

impl fmt::Debug for EffectQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EffectQueue").field(&self.len()).finish()
    }
}

impl EffectQueue {
    /// Queues an effect.
    pub fn push(&self, effect: impl FnOnce(&mut Ui) + 'static) {
        self.0.borrow_mut().push_back(Box::new(effect));
    }

    /// Takes the oldest pending effect.
    pub fn pop(&self) -> Option<Effect> {
        self.0.borrow_mut().pop_front()
    }

    /// Number of pending effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}
