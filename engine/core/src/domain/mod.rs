// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Domain types and ports for the conversational engine.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Entities, value objects and the traits infrastructure implements

pub mod config;
pub mod conversation;
pub mod fetch;
pub mod intent;
pub mod knowledge;
pub mod query;

pub use conversation::*;
pub use fetch::*;
pub use intent::*;
pub use knowledge::*;
pub use query::*;
