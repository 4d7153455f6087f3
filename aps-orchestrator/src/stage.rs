//! Ordered stage execution with resumption from the continuation blob.
//!
//! A pipeline is a fixed list of stages. Each invocation starts at the stage
//! index recorded in the continuation blob and runs forward until a stage
//! suspends or fails, or every stage has completed. Stages before the
//! recorded index are never invoked again.

use tracing::{debug, info};

use aps_core::error::ApsError;

use crate::event::ProgressEvent;
use crate::request::HandlerRequest;

/// Result of running one stage for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<M> {
    /// The stage is complete; move on within the same invocation.
    Advance,
    /// Remote work is pending; hand the event back to the caller.
    Suspend(ProgressEvent<M>),
    /// Terminal failure.
    Fail(ProgressEvent<M>),
}

impl<M> StageOutcome<M> {
    pub fn fail(err: &ApsError, model: M) -> Self {
        StageOutcome::Fail(ProgressEvent::from_error(err, Some(model)))
    }
}

pub trait Stage<M> {
    fn name(&self) -> &'static str;

    fn run(&self, request: &HandlerRequest, previous: &M, current: &mut M) -> StageOutcome<M>;
}

pub struct StagePipeline<'a, M> {
    stage_key: String,
    completion_message: &'static str,
    stages: Vec<Box<dyn Stage<M> + 'a>>,
}

impl<'a, M> StagePipeline<'a, M> {
    pub fn new(stage_key: &str, completion_message: &'static str) -> Self {
        Self {
            stage_key: stage_key.to_string(),
            completion_message,
            stages: Vec::new(),
        }
    }

    pub fn stage(mut self, stage: impl Stage<M> + 'a) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run the pipeline for one invocation.
    pub fn execute(
        &self,
        request: &HandlerRequest,
        previous: &M,
        mut current: M,
    ) -> ProgressEvent<M> {
        let start = match self.start_index(request) {
            Ok(start) => start,
            Err(err) => return ProgressEvent::from_error(&err, Some(current)),
        };

        for (index, stage) in self.stages.iter().enumerate().skip(start) {
            debug!(stage = stage.name(), index, "running stage");
            match stage.run(request, previous, &mut current) {
                StageOutcome::Advance => continue,
                StageOutcome::Suspend(evt) => {
                    debug!(stage = stage.name(), index, "stage suspended");
                    return evt.with_stage(&self.stage_key, index);
                }
                StageOutcome::Fail(evt) => {
                    info!(stage = stage.name(), index, message = %evt.message, "stage failed");
                    return evt;
                }
            }
        }

        ProgressEvent::success(self.completion_message, Some(current))
    }

    fn start_index(&self, request: &HandlerRequest) -> aps_core::Result<usize> {
        let index = request.callback_context.stage_index(&self.stage_key)?;
        if index >= self.stages.len() {
            return Err(ApsError::InvalidRequest(format!(
                "stage index {} is out of range for {} stages",
                index,
                self.stages.len()
            )));
        }
        Ok(index)
    }
}
