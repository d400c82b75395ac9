//! Fixed-size worker pool
//!
//! Jobs are pulled from a shared queue by `size` named threads. Every job,
//! whether it ran, panicked or was skipped after [`WorkerPool::cancel`],
//! reports back on a done channel, which is what
//! [`WorkerPool::await_termination`] counts against its deadline.

use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};
use parking_lot::Mutex;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("worker pool has been shut down")]
    ShutDown,
}

pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    done: Receiver<()>,
    workers: Vec<JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
    submitted: usize,
    finished: usize,
}

impl WorkerPool {
    /// Spawn `size` workers named `{name}-{n}`.
    pub fn new(size: usize, name: &str) -> Result<Self, PoolError> {
        let (sender, receiver) = mpsc::channel::<Job>();
        let (done_sender, done) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut pool = Self {
            sender: Some(sender),
            done,
            workers: Vec::with_capacity(size),
            cancelled,
            submitted: 0,
            finished: 0,
        };

        for n in 0..size.max(1) {
            let receiver = receiver.clone();
            let done_sender = done_sender.clone();
            let cancelled = pool.cancelled.clone();
            // On error `pool` is dropped here, which releases the workers
            // spawned so far.
            let handle = thread::Builder::new()
                .name(format!("{}-{}", name, n))
                .spawn(move || worker_loop(receiver, done_sender, cancelled))?;
            pool.workers.push(handle);
        }

        debug!("Started worker pool '{}' with {} threads", name, pool.workers.len());
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn execute<F>(&mut self, job: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::ShutDown)?;
        sender.send(Box::new(job)).map_err(|_| PoolError::ShutDown)?;
        self.submitted += 1;
        Ok(())
    }

    /// Stop accepting new jobs. Already queued jobs still run.
    pub fn shutdown(&mut self) {
        self.sender.take();
    }

    /// Skip every queued job that has not started yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Wait until every submitted job has finished or `timeout` elapses.
    /// Returns whether all jobs finished.
    pub fn await_termination(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.finished < self.submitted {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.done.recv_timeout(remaining) {
                Ok(()) => self.finished += 1,
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("All workers exited with {} jobs outstanding", self.submitted - self.finished);
                    return false;
                }
            }
        }
        true
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
        if self.finished < self.submitted {
            // Workers still busy cannot be interrupted; let them finish
            // detached and skip whatever is still queued.
            self.cancel();
            debug!(
                "Detaching {} workers with {} jobs outstanding",
                self.workers.len(),
                self.submitted - self.finished
            );
            self.workers.clear();
            return;
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(receiver: Arc<Mutex<Receiver<Job>>>, done: Sender<()>, cancelled: Arc<AtomicBool>) {
    loop {
        let job = receiver.lock().recv();
        match job {
            Ok(job) => {
                if !cancelled.load(Ordering::SeqCst) {
                    // Jobs are expected to handle their own panics; this only
                    // keeps the worker alive if one slips through.
                    let _ = catch_unwind(AssertUnwindSafe(job));
                }
                let _ = done.send(());
            }
            Err(_) => break,
        }
    }
}
