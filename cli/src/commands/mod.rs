// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Parley CLI

pub mod ask;
pub mod chat;
pub mod config;
pub mod status;
pub mod train;

pub use self::config::ConfigCommand;
