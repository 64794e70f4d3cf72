// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Edit job construction and background execution.

pub mod request;
pub mod runner;
