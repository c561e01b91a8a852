use parking_lot::RwLock;
use sched_core::{ScheduleRequest, ScheduleResult, Scheduler, ValidationError};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done { result: ScheduleResult },
    Rejected { errors: Vec<String> },
    Failed { message: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

pub const DEFAULT_MAX_RETAINED: usize = 1000;

#[derive(Default)]
struct Store {
    statuses: HashMap<String, JobStatus>,
    /// Ids in submission order.
    order: VecDeque<String>,
}

impl Store {
    /// Drops the oldest finished jobs until at most `keep` of them remain.
    /// Queued and running jobs are never dropped.
    fn prune(&mut self, keep: usize) -> usize {
        let finished = self.statuses.values().filter(|s| s.is_finished()).count();
        let mut excess = finished.saturating_sub(keep);
        if excess == 0 {
            return 0;
        }
        let dropped = excess;
        let statuses = &mut self.statuses;
        self.order.retain(|id| {
            if excess > 0 && statuses.get(id).is_some_and(JobStatus::is_finished) {
                statuses.remove(id);
                excess -= 1;
                false
            } else {
                true
            }
        });
        dropped
    }
}

/// Each job runs on its own task with its own request; the store only keeps
/// the latest status per id, and at most `max_retained` finished jobs.
#[derive(Clone)]
pub struct InMemJobs<S: Scheduler> {
    inner: Arc<RwLock<Store>>,
    scheduler: Arc<S>,
    max_retained: usize,
}

impl<S: Scheduler> InMemJobs<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            inner: Default::default(),
            scheduler: Arc::new(scheduler),
            max_retained: DEFAULT_MAX_RETAINED,
        }
    }

    pub fn with_max_retained(mut self, max_retained: usize) -> Self {
        self.max_retained = max_retained;
        self
    }

    pub fn enqueue(&self, req: ScheduleRequest) -> JobId {
        let id = Uuid::new_v4().to_string();
        {
            let mut store = self.inner.write();
            store.statuses.insert(id.clone(), JobStatus::Queued);
            store.order.push_back(id.clone());
        }

        let store = self.inner.clone();
        let scheduler = self.scheduler.clone();
        let keep = self.max_retained;
        let id_for_task = id.clone();

        tokio::spawn(async move {
            store
                .write()
                .statuses
                .insert(id_for_task.clone(), JobStatus::Running);
            let status = match scheduler.schedule(req).await {
                Ok(result) => {
                    info!(job = %id_for_task, "job done");
                    JobStatus::Done { result }
                }
                Err(e) => match e.downcast_ref::<ValidationError>() {
                    Some(invalid) => {
                        warn!(job = %id_for_task, %invalid, "job rejected");
                        JobStatus::Rejected {
                            errors: invalid.messages(),
                        }
                    }
                    None => {
                        error!(job = %id_for_task, ?e, "job failed");
                        JobStatus::Failed {
                            message: e.to_string(),
                        }
                    }
                },
            };
            let mut store = store.write();
            store.statuses.insert(id_for_task, status);
            let dropped = store.prune(keep);
            if dropped > 0 {
                debug!(dropped, keep, "evicted old finished jobs");
            }
        });

        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().statuses.get(id).cloned()
    }
}
