use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

/// One-shot timer source.
///
/// Tasks run once, after at least `delay`, on the page's event loop.
/// There is no cancellation.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task);
}

/// Schedules on `window.setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowScheduler;

impl Scheduler for WindowScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        if let Err(e) = leptos_dom::helpers::set_timeout_with_handle(task, delay) {
            log::error!("setTimeout failed: {e:?}");
        }
    }
}

#[cfg(test)]
pub(crate) use virtual_clock::VirtualScheduler;

#[cfg(test)]
mod virtual_clock {
    use super::{Scheduler, Task};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    struct Pending {
        due: Duration,
        seq: u64,
        task: Task,
    }

    /// Scheduler driven by an explicit clock.
    ///
    /// Tasks due at the same instant run in scheduling order. A task may
    /// schedule more tasks; they run within the same `advance` if due.
    #[derive(Default)]
    pub(crate) struct VirtualScheduler {
        now: Cell<Duration>,
        seq: Cell<u64>,
        queue: RefCell<Vec<Pending>>,
    }

    impl VirtualScheduler {
        pub(crate) fn now(&self) -> Duration {
            self.now.get()
        }

        pub(crate) fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        pub(crate) fn advance(&self, dt: Duration) {
            let until = self.now.get().saturating_add(dt);
            loop {
                let next = {
                    let mut q = self.queue.borrow_mut();
                    let idx = q
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| p.due <= until)
                        .min_by_key(|(_, p)| (p.due, p.seq))
                        .map(|(i, _)| i);
                    idx.map(|i| q.swap_remove(i))
                };
                let Some(p) = next else {
                    break;
                };
                self.now.set(p.due);
                (p.task)();
            }
            self.now.set(until);
        }
    }

    impl Scheduler for VirtualScheduler {
        fn schedule(&self, delay: Duration, task: Task) {
            let seq = self.seq.get();
            self.seq.set(seq + 1);
            self.queue.borrow_mut().push(Pending {
                due: self.now.get().saturating_add(delay),
                seq,
                task,
            });
        }
    }
}
