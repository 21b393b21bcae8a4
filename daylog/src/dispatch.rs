use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use daylog_core::LogError;

type Job = Box<dyn FnOnce() -> Result<(), LogError> + Send>;

enum Message {
    Write {
        job: Job,
        reply: Sender<Result<(), LogError>>,
    },
    Shutdown,
}

/// Completion handle of a write submitted to a [`WritePool`].
///
/// Dropping the handle detaches the write, it still runs to completion.
#[must_use = "drop the handle explicitly to fire and forget"]
pub struct WriteHandle {
    receiver: Receiver<Result<(), LogError>>,
}

impl WriteHandle {
    /// Blocks until the write is done.
    pub fn wait(self) -> Result<(), LogError> {
        self.receiver.recv().unwrap_or_else(|_| Err(lost()))
    }

    /// `None` if the write has not finished within `timeout`.
    pub fn wait_timeout(self, timeout: Duration) -> Option<Result<(), LogError>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(lost())),
        }
    }
}

fn lost() -> LogError {
    LogError::Dispatch("write pool stopped before running the write".into())
}

/// Fixed set of writer threads fed by one queue.
///
/// Writes are picked in submission order, but with several workers two writes
/// may still finish in either order.
pub struct WritePool {
    sender: Sender<Message>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl WritePool {
    pub fn new(workers: usize) -> Result<Self, std::io::Error> {
        let (sender, receiver) = unbounded::<Message>();
        let workers = (0..workers.max(1))
            .map(|index| spawn_worker(index, receiver.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sender,
            workers: Mutex::new(workers),
            stopped: AtomicBool::new(false),
        })
    }

    pub fn submit<F>(&self, job: F) -> WriteHandle
    where
        F: FnOnce() -> Result<(), LogError> + Send + 'static,
    {
        let (reply, receiver) = bounded(1);
        // If every worker is gone the message is dropped along with `reply`,
        // which the handle reports as a lost write.
        let _ = self.sender.send(Message::Write {
            job: Box::new(job),
            reply,
        });
        WriteHandle { receiver }
    }

    /// Whether [`WritePool::shutdown`] was called. Later writes are lost.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Runs every write submitted so far, then stops the workers.
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::Release);
        let workers: Vec<_> = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for _ in &workers {
            let _ = self.sender.send(Message::Shutdown);
        }
        for worker in workers {
            if worker.join().is_err() {
                log::warn!("a log writer thread panicked");
            }
        }
    }
}

impl Drop for WritePool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker(index: usize, receiver: Receiver<Message>) -> Result<JoinHandle<()>, std::io::Error> {
    thread::Builder::new()
        .name(format!("daylog-writer-{index}"))
        .spawn(move || {
            while let Ok(message) = receiver.recv() {
                match message {
                    Message::Write { job, reply } => {
                        // Nobody listening means the handle was detached.
                        reply.send(job()).ok();
                    }
                    Message::Shutdown => break,
                }
            }
        })
}
