// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Intent routing and adaptive matching engine.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Normalize utterances, route them to specialized handlers or
//!   the learned knowledge base, and learn new answers on a miss.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
