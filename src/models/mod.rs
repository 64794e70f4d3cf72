// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Core data model: the canvas image, the pending annotation and jobs.

pub mod annotation;
pub mod canvas;
pub mod job;
