//! Structured job logging.

use tracing::{error, info, warn};

use subfuse_models::{JobId, JobStage, UserId, Workflow};

/// Logger carrying job identity through every lifecycle event.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: JobId,
    user: UserId,
    workflow: Workflow,
}

impl JobLogger {
    pub fn new(job_id: JobId, user: UserId, workflow: Workflow) -> Self {
        Self {
            job_id,
            user,
            workflow,
        }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Record a stage transition.
    pub fn stage(&self, stage: JobStage) {
        info!(
            job_id = %self.job_id,
            user = self.user,
            workflow = %self.workflow,
            stage = %stage,
            "job stage reached"
        );
    }

    pub fn warning(&self, message: &str) {
        warn!(
            job_id = %self.job_id,
            user = self.user,
            workflow = %self.workflow,
            "{message}"
        );
    }

    pub fn failure(&self, err: &dyn std::fmt::Display) {
        error!(
            job_id = %self.job_id,
            user = self.user,
            workflow = %self.workflow,
            error = %err,
            "job failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_holds_identity() {
        let id = JobId::new();
        let logger = JobLogger::new(id, 7, Workflow::SubtitleBurn);
        assert_eq!(logger.job_id(), id);
    }
}
