// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background execution of edit jobs.
//!
//! Each job runs on its own worker thread and reports back through a
//! single channel that the UI thread drains. Stopping a job is advisory:
//! the remote call cannot be interrupted, so a stopped worker only drops
//! its result instead of sending it.

use crate::io::backend::{EditRequest, ImageEditor};
use crate::io::media;
use crate::io::output::OutputStore;
use crate::jobs::request::{self, Sanitizer};
use crate::models::annotation::Annotation;
use crate::models::canvas::CanvasImage;
use crate::models::job::{Job, JobCompletion, JobError, JobId, JobOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Called from worker threads after a completion is sent, so the UI can
/// wake up and drain the channel.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Reference to a started job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: JobId,
    stopped: Arc<AtomicBool>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Everything a worker needs, moved onto its thread.
struct Worker {
    editor: Arc<dyn ImageEditor>,
    output: OutputStore,
    sanitize: Sanitizer,
    source: CanvasImage,
    annotation: Annotation,
    stopped: Arc<AtomicBool>,
}

/// Starts edit jobs off the UI thread.
pub struct JobRunner {
    editor: Arc<dyn ImageEditor>,
    output: OutputStore,
    sanitize: Sanitizer,
    sender: Sender<JobCompletion>,
    waker: Option<Waker>,
}

impl JobRunner {
    /// Create a runner and the receiving end of its completion channel.
    pub fn new(
        editor: Arc<dyn ImageEditor>,
        output: OutputStore,
        sanitize: Sanitizer,
    ) -> (Self, Receiver<JobCompletion>) {
        let (sender, receiver) = channel();
        let runner = Self {
            editor,
            output,
            sanitize,
            sender,
            waker: None,
        };
        (runner, receiver)
    }

    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    /// Run `job` on a new worker thread.
    pub fn start(&self, job: &Job) -> JobHandle {
        let handle = JobHandle {
            id: job.id,
            stopped: Arc::new(AtomicBool::new(false)),
        };

        let worker = Worker {
            editor: Arc::clone(&self.editor),
            output: self.output.clone(),
            sanitize: self.sanitize,
            source: job.source_image.clone(),
            annotation: job.annotation.clone(),
            stopped: Arc::clone(&handle.stopped),
        };
        let sender = self.sender.clone();
        let waker = self.waker.clone();
        let job_id = job.id;

        let spawned = std::thread::Builder::new()
            .name(format!("edit-{job_id}"))
            .spawn(move || {
                let Some(outcome) = worker.run() else {
                    log::debug!("{job_id} was stopped, dropping its result");
                    return;
                };
                // The receiver only goes away when the app is shutting down
                if sender.send(JobCompletion { job_id, outcome }).is_ok() {
                    if let Some(wake) = waker {
                        wake();
                    }
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn worker for {job_id}: {e}");
            let _ = self.sender.send(JobCompletion {
                job_id,
                outcome: JobOutcome::Failed(JobError::Worker(e.to_string())),
            });
        }

        log::info!("Started {job_id}");
        handle
    }

    /// Ask a job to drop its result. In-flight network work still runs to
    /// completion.
    pub fn stop(&self, handle: &JobHandle) {
        handle.stopped.store(true, Ordering::SeqCst);
        log::info!("Stopped {}", handle.id);
    }
}

impl Worker {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// `None` when the job was stopped before it could report.
    fn run(self) -> Option<JobOutcome> {
        let result = self.execute();
        if self.is_stopped() {
            return None;
        }
        Some(match result {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Edit job failed: {e}");
                JobOutcome::Failed(e)
            }
        })
    }

    fn execute(&self) -> Result<Option<JobOutcome>, JobError> {
        let mask = request::build_mask(&self.annotation.region);
        let prompt = (self.sanitize)(&request::compose_prompt(&self.annotation));
        log::info!("Prompt: {prompt}");

        let edit_request = EditRequest {
            image_png: media::encode_png(self.source.rgba())
                .map_err(|e| JobError::Encode(e.to_string()))?,
            mask_png: media::encode_png(&mask).map_err(|e| JobError::Encode(e.to_string()))?,
            prompt: prompt.clone(),
            size: request::canvas_size_param(),
        };

        let image_bytes = self.editor.edit_image(&edit_request)?;
        if self.is_stopped() {
            return Ok(None);
        }

        let image = media::decode_image(&image_bytes).map_err(|e| JobError::Decode(e.to_string()))?;
        let record = self
            .output
            .write(&image_bytes, &prompt)
            .map_err(|e| JobError::Persist(format!("{e:#}")))?;

        Ok(Some(JobOutcome::Succeeded {
            image,
            prompt,
            record,
        }))
    }
}
