//! Event loop glue between browser callbacks and the controller
//!
//! DOM events, play promises and timeouts all land here. Inputs are queued
//! and applied in arrival order whenever the controller is not already
//! borrowed by a call from JavaScript.

use crate::engine::OutputSignal;
use crate::scheduler::TimerId;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

pub(crate) enum Input {
    Signal(OutputSignal),
    Timer(TimerId),
}

/// Something that can consume queued inputs
pub(crate) trait Sink {
    fn apply(&mut self, input: Input);

    /// Called once after a batch of inputs was applied; the returned hook
    /// runs after the sink is released
    fn settled(&mut self) -> Option<Deferred> {
        None
    }
}

pub(crate) type Deferred = Box<dyn FnOnce()>;

type Target = Weak<RefCell<dyn Sink>>;

#[derive(Default)]
pub(crate) struct Dispatcher {
    queue: RefCell<VecDeque<Input>>,
    target: RefCell<Option<Target>>,
}

impl Dispatcher {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn attach(&self, target: Target) {
        *self.target.borrow_mut() = Some(target);
    }

    pub(crate) fn push(&self, input: Input) {
        self.queue.borrow_mut().push_back(input);
        self.pump();
    }

    /// Apply queued inputs until the queue is empty or the target is busy
    pub(crate) fn pump(&self) {
        let Some(target) = self.target.borrow().as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let Ok(mut sink) = target.try_borrow_mut() else {
            // Re-entered from inside a controller call; the outer call pumps again
            return;
        };

        let mut applied = false;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(input) => {
                    sink.apply(input);
                    applied = true;
                }
                None => break,
            }
        }
        let deferred = if applied { sink.settled() } else { None };
        drop(sink);
        if let Some(run) = deferred {
            run();
        }
    }
}
