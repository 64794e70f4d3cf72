// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components: the interactive canvas and the projector mirror.

pub mod canvas;
pub mod mirror;
pub mod texture;
