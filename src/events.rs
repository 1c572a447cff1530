//! Deferred press notifications.
//!
//! The press callback runs on the edge interrupt path. Anything heavier than
//! "record and return" belongs in task context, and [`PressEvents`] is the glue:
//! the callback pushes the button ID, and the application drains the queue from
//! its main loop or a task.
//!
//! ```
//! use debounced_buttons::{ButtonId, PressEvents};
//!
//! static PRESSES: PressEvents<8> = PressEvents::new();
//!
//! fn on_press(id: ButtonId) {
//!     PRESSES.push(id);
//! }
//! ```

use crate::types::ButtonId;
use core::cell::{Cell, RefCell};
use critical_section::Mutex;
use heapless::Deque;

/// Fixed-capacity, interrupt-safe queue of pressed button IDs.
///
/// # Type Parameters
/// * `Q` - Queue capacity
pub struct PressEvents<const Q: usize> {
    queue: Mutex<RefCell<Deque<ButtonId, Q>>>,
    dropped: Mutex<Cell<u32>>,
}

impl<const Q: usize> PressEvents<Q> {
    /// Creates an empty queue. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
            dropped: Mutex::new(Cell::new(0)),
        }
    }

    /// Appends a press. If the queue is full the event is dropped and counted.
    ///
    /// Returns false when the event was dropped.
    pub fn push(&self, id: ButtonId) -> bool {
        critical_section::with(|cs| {
            if self.queue.borrow_ref_mut(cs).push_back(id).is_ok() {
                return true;
            }

            let dropped = self.dropped.borrow(cs);
            dropped.set(dropped.get().saturating_add(1));
            warn!("press queue full, dropped {}", id);
            false
        })
    }

    /// Removes the oldest press.
    pub fn pop(&self) -> Option<ButtonId> {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).pop_front())
    }

    /// Returns the number of queued presses.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.queue.borrow_ref(cs).len())
    }

    /// Returns true if no presses are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns how many presses were dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.dropped.borrow(cs).get())
    }
}

impl<const Q: usize> Default for PressEvents<Q> {
    fn default() -> Self {
        Self::new()
    }
}
