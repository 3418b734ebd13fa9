// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Parley CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Commands, HTTP service wiring, console boundaries and the
//!   service client

pub mod commands;
pub mod console;
pub mod server;
