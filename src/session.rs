// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state shared by both windows.
//!
//! The [`SessionController`] owns the authoritative canvas image, lets at
//! most one edit job affect it at a time, and republishes accepted results
//! to the interactive surface first and then to every mirror.

use crate::jobs::runner::{JobHandle, JobRunner};
use crate::models::annotation::Annotation;
use crate::models::canvas::CanvasImage;
use crate::models::job::{Job, JobCompletion, JobError, JobId, JobOutcome, JobStatus};
use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Anything that displays the current canvas image.
pub trait CanvasConsumer {
    fn show_image(&mut self, image: &CanvasImage);
}

/// The interactive consumer, which also hears about failed jobs.
pub trait JobListener: CanvasConsumer {
    fn job_failed(&mut self, error: &JobError);
}

/// How many job statuses are remembered.
const STATUS_HISTORY: usize = 64;

struct ActiveJob {
    job: Job,
    handle: JobHandle,
}

pub struct SessionController {
    current_image: CanvasImage,
    runner: JobRunner,
    completions: Receiver<JobCompletion>,
    active: Option<ActiveJob>,
    /// Status of the most recent jobs, oldest pruned past [`STATUS_HISTORY`]
    statuses: BTreeMap<JobId, JobStatus>,
    next_id: u64,
}

impl SessionController {
    pub fn new(initial: CanvasImage, runner: JobRunner, completions: Receiver<JobCompletion>) -> Self {
        Self {
            current_image: initial,
            runner,
            completions,
            active: None,
            statuses: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn current_image(&self) -> &CanvasImage {
        &self.current_image
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.active.as_ref().map(|active| active.job.id)
    }

    pub fn status_of(&self, id: JobId) -> Option<JobStatus> {
        self.statuses.get(&id).copied()
    }

    /// Push the current image to every consumer, e.g. at startup.
    pub fn publish_current(&self, surface: &mut dyn JobListener, mirrors: &mut [&mut dyn CanvasConsumer]) {
        surface.show_image(&self.current_image);
        for mirror in mirrors.iter_mut() {
            mirror.show_image(&self.current_image);
        }
    }

    /// Start an edit of the current image, superseding any running job.
    pub fn on_annotation_finalized(&mut self, annotation: Annotation) -> JobId {
        log::info!(
            "Annotation finalized: region=({}, {}, {}), text={:?}",
            annotation.region.x,
            annotation.region.y,
            annotation.region.size,
            annotation.text
        );

        if let Some(previous) = self.active.take() {
            self.runner.stop(&previous.handle);
            debug_assert!(previous.handle.is_stopped());
            self.set_status(previous.job.id, JobStatus::Superseded);
            log::info!("{} superseded", previous.job.id);
        }

        self.next_id += 1;
        let mut job = Job::new(JobId(self.next_id), self.current_image.clone(), annotation);
        self.set_status(job.id, JobStatus::Pending);

        let handle = self.runner.start(&job);
        job.status = JobStatus::Running;
        self.set_status(job.id, JobStatus::Running);

        let id = job.id;
        self.active = Some(ActiveJob { job, handle });
        id
    }

    /// Apply any completions that have arrived. Returns how many were
    /// applied; stale completions are dropped and not counted.
    pub fn pump(&mut self, surface: &mut dyn JobListener, mirrors: &mut [&mut dyn CanvasConsumer]) -> usize {
        let mut applied = 0;
        loop {
            match self.completions.try_recv() {
                Ok(completion) => {
                    if self.on_job_terminal(completion, surface, mirrors) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Job completion channel closed");
                    break;
                }
            }
        }
        applied
    }

    fn on_job_terminal(
        &mut self,
        completion: JobCompletion,
        surface: &mut dyn JobListener,
        mirrors: &mut [&mut dyn CanvasConsumer],
    ) -> bool {
        let is_current = self
            .active
            .as_ref()
            .is_some_and(|active| active.job.id == completion.job_id);
        if !is_current {
            log::debug!("Discarding stale completion of {}", completion.job_id);
            return false;
        }

        let Some(mut finished) = self.active.take() else {
            return false;
        };

        match completion.outcome {
            JobOutcome::Succeeded { image, prompt, record } => {
                finished.job.status = JobStatus::Succeeded;
                self.set_status(finished.job.id, JobStatus::Succeeded);
                log::info!(
                    "{} finished, loading {}",
                    finished.job.id,
                    record.image_path.display()
                );
                log::debug!("{} prompt was {:?}", finished.job.id, prompt);

                self.current_image = image;
                self.publish_current(surface, mirrors);
            }
            JobOutcome::Failed(error) => {
                finished.job.status = JobStatus::Failed;
                self.set_status(finished.job.id, JobStatus::Failed);
                log::error!("{} failed: {}", finished.job.id, error);

                surface.job_failed(&error);
            }
        }
        true
    }

    fn set_status(&mut self, id: JobId, status: JobStatus) {
        let previous = self.statuses.insert(id, status);
        debug_assert!(
            !previous.is_some_and(JobStatus::is_terminal),
            "{id} changed status after reaching a terminal state"
        );

        while self.statuses.len() > STATUS_HISTORY {
            let oldest_finished = self
                .statuses
                .first_key_value()
                .is_some_and(|(_, status)| status.is_terminal());
            if !oldest_finished {
                break;
            }
            self.statuses.pop_first();
        }
    }
}
