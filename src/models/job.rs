// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Edit jobs and their outcomes.

use super::annotation::Annotation;
use super::canvas::CanvasImage;
use crate::io::backend::EditError;
use std::path::PathBuf;

/// Monotonic job identifier, unique per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Superseded,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Superseded)
    }
}

/// One requested edit: the image it starts from and what to add where.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub source_image: CanvasImage,
    pub annotation: Annotation,
    pub status: JobStatus,
}

impl Job {
    pub fn new(id: JobId, source_image: CanvasImage, annotation: Annotation) -> Self {
        Self {
            id,
            source_image,
            annotation,
            status: JobStatus::Pending,
        }
    }
}

/// Why a job produced no image.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("image edit request failed: {0}")]
    Edit(#[from] EditError),

    #[error("could not prepare the edit request: {0}")]
    Encode(String),

    #[error("could not decode the edited image: {0}")]
    Decode(String),

    #[error("could not save the edited image: {0}")]
    Persist(String),

    #[error("could not start the edit worker: {0}")]
    Worker(String),
}

/// Files written for a successful job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub image_path: PathBuf,
    pub prompt_path: PathBuf,
}

/// A job's result as produced by the worker.
#[derive(Debug)]
pub enum JobOutcome {
    Succeeded {
        image: CanvasImage,
        prompt: String,
        record: OutputRecord,
    },
    Failed(JobError),
}

/// Message sent from a worker back to the UI thread, exactly once per job
/// unless the job was stopped first.
#[derive(Debug)]
pub struct JobCompletion {
    pub job_id: JobId,
    pub outcome: JobOutcome,
}
