//! Runs jobs on short-lived threads and hands replies back to the UI thread.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::api::RepoApi;
use crate::request::{Job, Reply};

pub struct Worker<A: RepoApi + ?Sized> {
    api: Arc<A>,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
}

impl<A: RepoApi + ?Sized + 'static> Worker<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { api, tx, rx }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Starts `job` on its own thread. If the thread cannot be created the
    /// job runs inline so its reply is never lost.
    pub fn spawn(&self, job: Job) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let name = format!("fetch-{:?}", job.ticket.resource).to_lowercase();
        let inline = job.clone();
        let spawned = thread::Builder::new().name(name).spawn(move || {
            // The receiver only disappears on shutdown.
            let _ = tx.send(job.run(api.as_ref()));
        });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn fetch thread, running inline");
            let _ = self.tx.send(inline.run(self.api.as_ref()));
        }
    }

    pub fn spawn_all(&self, jobs: impl IntoIterator<Item = Job>) {
        for job in jobs {
            self.spawn(job);
        }
    }

    /// Replies that have already arrived, without blocking.
    pub fn drain(&self) -> Vec<Reply> {
        self.rx.try_iter().collect()
    }

    /// Blocks until one reply arrives or `timeout` passes.
    pub fn wait_reply(&self, timeout: Duration) -> Option<Reply> {
        match self.rx.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
