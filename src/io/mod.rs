// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: canvas images, job output records and the edit backend.

pub mod backend;
pub mod media;
pub mod output;
