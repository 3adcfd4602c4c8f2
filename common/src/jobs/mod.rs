use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    /// Stopped by an operator; carries the partial result.
    Interrupted(String),
    Failed(String),
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed(_) | JobStatus::Interrupted(_) | JobStatus::Failed(_)
        )
    }
}
