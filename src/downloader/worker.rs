//! Worker loop.
//!
//! Each worker owns a private control channel and shares the task queue with
//! the other workers. Control commands are only looked at while the worker is
//! idle, so a running task always completes before a pause or stop takes
//! effect.

use crate::download::fetch::Fetcher;
use crate::download::Task;

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::debug;

/// Task queue shared by all workers.
pub(crate) type SharedQueue = Arc<Mutex<mpsc::Receiver<Task>>>;

/// Command delivered to a single worker, acknowledged once honored.
#[derive(Debug)]
pub(crate) enum Control {
    Pause(oneshot::Sender<()>),
    Resume(oneshot::Sender<()>),
    Stop(oneshot::Sender<()>),
}

pub(crate) struct Worker {
    id: usize,
    queue: SharedQueue,
    control: mpsc::Receiver<Control>,
    fetcher: Arc<Fetcher>,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        queue: SharedQueue,
        control: mpsc::Receiver<Control>,
        fetcher: Arc<Fetcher>,
    ) -> Self {
        Self {
            id,
            queue,
            control,
            fetcher,
        }
    }

    pub(crate) fn spawn(self) {
        tokio::spawn(self.run());
    }

    async fn run(mut self) {
        debug!(worker = self.id, "Worker started");
        loop {
            // Control commands win over queued tasks when both are ready.
            tokio::select! {
                biased;

                command = self.control.recv() => match command {
                    Some(Control::Stop(ack)) => {
                        acknowledge(ack);
                        break;
                    }
                    Some(Control::Pause(ack)) => {
                        acknowledge(ack);
                        if !self.paused().await {
                            break;
                        }
                    }
                    Some(Control::Resume(ack)) => acknowledge(ack),
                    None => break,
                },

                task = next_task(&self.queue) => match task {
                    Some(task) => self.fetcher.handle(task).await,
                    None => break,
                },
            }
        }
        debug!(worker = self.id, "Worker stopped");
    }

    /// Block until resumed. Returns `false` if the worker must stop instead.
    async fn paused(&mut self) -> bool {
        debug!(worker = self.id, "Worker paused");
        loop {
            match self.control.recv().await {
                Some(Control::Resume(ack)) => {
                    acknowledge(ack);
                    debug!(worker = self.id, "Worker resumed");
                    return true;
                }
                Some(Control::Pause(ack)) => acknowledge(ack),
                Some(Control::Stop(ack)) => {
                    acknowledge(ack);
                    return false;
                }
                None => return false,
            }
        }
    }
}

async fn next_task(queue: &SharedQueue) -> Option<Task> {
    queue.lock().await.recv().await
}

fn acknowledge(ack: oneshot::Sender<()>) {
    let _ = ack.send(());
}
