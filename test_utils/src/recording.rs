//! Observer that records every event emitted on a bus.

use std::cell::RefCell;
use std::rc::Rc;

use warrens::EventBus;

/// Shared log of events seen by an observer closure.
///
/// Cloning yields another handle onto the same log.
#[derive(Debug)]
pub struct RecordingObserver<E> {
    seen: Rc<RefCell<Vec<E>>>,
}

impl<E> Clone for RecordingObserver<E> {
    fn clone(&self) -> Self {
        Self {
            seen: Rc::clone(&self.seen),
        }
    }
}

impl<E: Clone + 'static> RecordingObserver<E> {
    /// Subscribe a new recorder to `bus`.
    ///
    /// # Examples
    /// ```
    /// use test_utils::RecordingObserver;
    /// use warrens::EventBus;
    /// let mut bus = EventBus::<u8>::default();
    /// let recorder = RecordingObserver::attach(&mut bus);
    /// bus.emit(3);
    /// assert_eq!(recorder.events(), vec![3]);
    /// ```
    pub fn attach(bus: &mut EventBus<E>) -> Self {
        let recorder = Self {
            seen: Rc::new(RefCell::new(Vec::new())),
        };
        let sink = Rc::clone(&recorder.seen);
        bus.subscribe(move |event: &E| sink.borrow_mut().push(event.clone()));
        recorder
    }

    pub fn events(&self) -> Vec<E> {
        self.seen.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.seen.borrow_mut().clear();
    }
}
