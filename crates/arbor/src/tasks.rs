//! Cross-thread work for the UI thread.
//!
//! Everything else in the crate is single-threaded. A [`TaskQueue`] lets
//! other threads ask the owning thread to run a closure, usually to create a
//! GPU resource, and wakes the backend if it is blocked waiting for input.

use std::{
    collections::VecDeque,
    fmt,
    mem,
    sync::{Arc, Mutex, mpsc},
    thread::{self, ThreadId},
};

use tracing::trace;

use crate::{
    backend::Waker,
    error::{Error, Result},
};

/// A unit of work queued for the owning thread.
type Job = Box<dyn FnOnce() + Send>;

/// State shared between the queue's clones.
struct Shared {
    /// The thread that drains the queue.
    owner: ThreadId,
    /// Jobs waiting for the next drain.
    jobs: Mutex<VecDeque<Job>>,
    /// Called after a job is queued from another thread.
    waker: Mutex<Option<Waker>>,
}

/// A queue of closures to run on the owning thread. Cloning gives another
/// handle to the same queue.
#[derive(Clone)]
pub struct TaskQueue {
    /// Shared queue state.
    shared: Arc<Shared>,
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("owner", &self.shared.owner)
            .finish_non_exhaustive()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a poisoned lock to a task error.
fn poisoned<T>(_: T) -> Error {
    Error::Task("task queue lock poisoned".into())
}

impl TaskQueue {
    /// Create a queue owned by the calling thread.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                owner: thread::current().id(),
                jobs: Mutex::new(VecDeque::new()),
                waker: Mutex::new(None),
            }),
        }
    }

    /// Is the caller the thread that drains this queue?
    pub fn is_owning_thread(&self) -> bool {
        thread::current().id() == self.shared.owner
    }

    /// Install the function that interrupts a blocking wait for input.
    pub fn set_waker(&self, waker: Waker) -> Result<()> {
        *self.shared.waker.lock().map_err(poisoned)? = Some(waker);
        Ok(())
    }

    /// Remove the waker. Jobs queued afterwards wait for the next drain
    /// without interrupting anyone.
    pub fn take_waker(&self) -> Result<Option<Waker>> {
        Ok(self.shared.waker.lock().map_err(poisoned)?.take())
    }

    /// Run `f` on the owning thread. On the owning thread it runs
    /// immediately; elsewhere it is queued and the backend is woken.
    pub fn load_task<T, F>(&self, f: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let job = move || {
            // The handle may have been dropped; the result is then unwanted.
            let _ = tx.send(f());
        };
        if self.is_owning_thread() {
            job();
            return Ok(TaskHandle { rx });
        }
        self.shared
            .jobs
            .lock()
            .map_err(poisoned)?
            .push_back(Box::new(job));
        let waker = self.shared.waker.lock().map_err(poisoned)?.clone();
        if let Some(wake) = waker {
            wake();
        }
        Ok(TaskHandle { rx })
    }

    /// Number of queued jobs.
    pub fn pending(&self) -> Result<usize> {
        Ok(self.shared.jobs.lock().map_err(poisoned)?.len())
    }

    /// Run every queued job. Jobs queued while draining wait for the next
    /// drain. Returns the number of jobs run.
    pub fn drain(&self) -> Result<usize> {
        let jobs = mem::take(&mut *self.shared.jobs.lock().map_err(poisoned)?);
        let n = jobs.len();
        for job in jobs {
            job();
        }
        if n > 0 {
            trace!(jobs = n, "drained tasks");
        }
        Ok(n)
    }
}

/// The eventual result of a queued task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    /// Receives the task's result.
    rx: mpsc::Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Block until the task has run. Must not be called on the owning thread
    /// for a task that is still queued, since nothing would drain it.
    pub fn wait(self) -> Result<T> {
        Ok(self.rx.recv()?)
    }

    /// The result, if the task has run.
    pub fn try_get(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn owning_thread_runs_inline() -> Result<()> {
        let q = TaskQueue::new();
        assert!(q.is_owning_thread());
        let h = q.load_task(|| 7)?;
        assert_eq!(q.pending()?, 0);
        assert_eq!(h.try_get(), Some(7));
        Ok(())
    }

    #[test]
    fn other_threads_queue_and_wake() -> Result<()> {
        let q = TaskQueue::new();
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = wakes.clone();
        q.set_waker(Arc::new(move || {
            w.fetch_add(1, Ordering::SeqCst);
        }))?;

        let remote = q.clone();
        let handle = thread::spawn(move || remote.load_task(|| String::from("texture")))
            .join()
            .map_err(|_| Error::Internal("worker panicked".into()))??;
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert_eq!(q.pending()?, 1);
        assert_eq!(handle.try_get(), None);

        assert_eq!(q.drain()?, 1);
        assert_eq!(handle.wait()?, "texture");
        assert_eq!(q.drain()?, 0);
        Ok(())
    }

    #[test]
    fn remote_wait_blocks_until_drained() -> Result<()> {
        let q = TaskQueue::new();
        let remote = q.clone();
        let (ready_tx, ready_rx) = mpsc::channel();
        let worker = thread::spawn(move || -> Result<u32> {
            let h = remote.load_task(|| 42u32)?;
            let _ = ready_tx.send(());
            h.wait()
        });
        ready_rx.recv()?;
        q.drain()?;
        let v = worker
            .join()
            .map_err(|_| Error::Internal("worker panicked".into()))??;
        assert_eq!(v, 42);
        Ok(())
    }

    #[test]
    fn dropped_queue_fails_wait() -> Result<()> {
        let q = TaskQueue::new();
        let remote = q.clone();
        let handle = thread::spawn(move || remote.load_task(|| 1))
            .join()
            .map_err(|_| Error::Internal("worker panicked".into()))??;
        drop(q);
        assert!(matches!(handle.wait(), Err(Error::Task(_))));
        Ok(())
    }
}
