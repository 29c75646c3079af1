//! Synchronous cross-thread invocation onto a window's owning thread.
//!
//! The owning thread holds a [`Dispatcher`]; any other thread holds a cloned
//! [`Invoker`]. `Invoker::invoke` queues the action, wakes the owning loop and
//! blocks until the owning thread has run it. Actions run in the order they
//! were queued.

use std::any::Any;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::{Condvar, Mutex};

use crate::error::{FrameHostError, Result};

type Action = Box<dyn FnOnce() + Send + 'static>;

/// Nudges the owning thread's loop so it drains the queue.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Single-slot completion signal shared by the waiting caller and the owning
/// thread.
struct Completion {
    slot: Mutex<Option<Result<()>>>,
    ready: Condvar,
}

impl Completion {
    fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn fulfill(&self, outcome: Result<()>) {
        let mut slot = self.slot.lock();
        *slot = Some(outcome);
        self.ready.notify_all();
    }

    fn wait(&self) -> Result<()> {
        let mut slot = self.slot.lock();
        loop {
            if let Some(outcome) = slot.take() {
                return outcome;
            }
            self.ready.wait(&mut slot);
        }
    }
}

struct PendingInvocation {
    action: Action,
    completion: Arc<Completion>,
}

struct QueueState {
    items: VecDeque<PendingInvocation>,
    open: bool,
}

struct InvokeQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

/// Cloneable, thread-safe handle for running work on the owning thread.
#[derive(Clone)]
pub struct Invoker {
    queue: Arc<InvokeQueue>,
    owner: ThreadId,
    waker: Waker,
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker").field("owner", &self.owner).finish()
    }
}

impl Invoker {
    /// Runs `action` on the owning thread and blocks until it has finished.
    ///
    /// Fails with [`FrameHostError::ThreadingViolation`] when called from the
    /// owning thread itself, and with [`FrameHostError::Disconnected`] once the
    /// dispatcher is gone. There is no timeout.
    pub fn invoke<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if thread::current().id() == self.owner {
            warn!("[Invoker] invoke() called on the owning thread; refusing to deadlock");
            return Err(FrameHostError::ThreadingViolation);
        }

        let completion = Arc::new(Completion::new());
        {
            let mut state = self.queue.state.lock();
            if !state.open {
                return Err(FrameHostError::Disconnected);
            }
            state.items.push_back(PendingInvocation {
                action: Box::new(action),
                completion: Arc::clone(&completion),
            });
        }
        self.queue.available.notify_one();
        (self.waker)();

        completion.wait()
    }

    /// Like [`Invoker::invoke`], but hands the action's return value back to
    /// the caller.
    pub fn call<F, R>(&self, action: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let result = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&result);
        self.invoke(move || {
            *sink.lock() = Some(action());
        })?;
        let value = result.lock().take();
        value.ok_or(FrameHostError::Disconnected)
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }
}

/// Owning-thread end of the invocation queue. Not `Send`: it must live and
/// drain on the thread that created it.
pub struct Dispatcher {
    queue: Arc<InvokeQueue>,
    owner: ThreadId,
    waker: Waker,
    _owning_thread: PhantomData<*const ()>,
}

impl Dispatcher {
    /// Creates a dispatcher bound to the current thread.
    pub fn new(waker: Waker) -> Self {
        Self {
            queue: Arc::new(InvokeQueue {
                state: Mutex::new(QueueState {
                    items: VecDeque::new(),
                    open: true,
                }),
                available: Condvar::new(),
            }),
            owner: thread::current().id(),
            waker,
            _owning_thread: PhantomData,
        }
    }

    pub fn invoker(&self) -> Invoker {
        Invoker {
            queue: Arc::clone(&self.queue),
            owner: self.owner,
            waker: Arc::clone(&self.waker),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.state.lock().items.len()
    }

    /// Runs every queued action without blocking. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // The lock is released before the action runs.
            let next = self.queue.state.lock().items.pop_front();
            let Some(invocation) = next else { break };

            let outcome = panic::catch_unwind(AssertUnwindSafe(invocation.action))
                .map_err(|payload| FrameHostError::ActionPanicked(panic_message(payload.as_ref())));
            if let Err(e) = &outcome {
                warn!("[Invoker] {}", e);
            }
            invocation.completion.fulfill(outcome);
            ran += 1;
        }
        if ran > 0 {
            debug!("[Invoker] ran {} queued action(s)", ran);
        }
        ran
    }

    /// Blocks up to `timeout` for work to arrive, then drains the queue.
    pub fn wait_and_run(&self, timeout: Duration) -> usize {
        {
            let mut state = self.queue.state.lock();
            if state.items.is_empty() {
                self.queue.available.wait_for(&mut state, timeout);
            }
        }
        self.run_pending()
    }

    /// Stops accepting work. Actions already queued still run here, later
    /// calls fail with [`FrameHostError::Disconnected`].
    pub fn close(&self) {
        {
            let mut state = self.queue.state.lock();
            if !state.open {
                return;
            }
            state.open = false;
        }
        let ran = self.run_pending();
        info!("[Invoker] dispatcher closed ({} straggler(s) completed)", ran);
    }

    pub fn is_closed(&self) -> bool {
        !self.queue.state.lock().open
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
