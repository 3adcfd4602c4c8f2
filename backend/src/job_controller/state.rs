//! Shared state of background jobs.
//!
//! Verification and merge jobs run outside the request/response cycle. They
//! report through [`JobUpdate`] messages on an mpsc channel, which
//! [`start_job_updater`] folds into the shared [`JobsState`] map. Merge jobs
//! also register a stop signal so an operator can end them between
//! recipients.

use common::jobs::JobStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Clonable handle injected into the actix app as `web::Data`.
#[derive(Clone)]
pub struct JobsState {
    /// Job id to its latest status. Written only by [`start_job_updater`]
    /// and the schedulers registering new jobs.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Stop signals of running merge jobs, removed once the job finishes.
    pub stop_signals: Arc<RwLock<HashMap<String, Arc<AtomicBool>>>>,

    /// Background workers push their updates here.
    pub tx: mpsc::Sender<JobUpdate>,
}

/// Status change for one job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobsState {
    /// State plus the receiver half to hand to [`start_job_updater`].
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(buffer);
        let state = Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            stop_signals: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    /// Creates and records the stop signal for `job_id`.
    pub async fn register_stop_signal(&self, job_id: &str) -> Arc<AtomicBool> {
        let signal = Arc::new(AtomicBool::new(false));
        self.stop_signals
            .write()
            .await
            .insert(job_id.to_string(), signal.clone());
        signal
    }

    /// Raises the stop signal. Returns `false` for unknown or finished jobs.
    pub async fn request_stop(&self, job_id: &str) -> bool {
        match self.stop_signals.read().await.get(job_id) {
            Some(signal) => {
                signal.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    pub async fn clear_stop_signal(&self, job_id: &str) {
        self.stop_signals.write().await.remove(job_id);
    }
}

/// Applies every received update to the shared map until all senders drop.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id.clone(), update.status);
    }
}
