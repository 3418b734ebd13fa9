// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Console input and output boundaries for `parley chat`.
//!
//! Typed lines stand in for speech: a blank line is unintelligible, end of
//! input closes the session.

use async_trait::async_trait;
use colored::Colorize;
use parley_core::domain::{InputBoundary, ListenOutcome, OutputBoundary};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

pub struct ConsoleInput<R = BufReader<Stdin>> {
    lines: Mutex<Lines<R>>,
    prompt: bool,
}

impl ConsoleInput {
    pub fn stdin() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            prompt: true,
        }
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleInput<R> {
    /// Read from any buffered source without printing a prompt.
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            prompt: false,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> InputBoundary for ConsoleInput<R> {
    async fn listen(&self, timeout: Duration) -> ListenOutcome {
        if self.prompt {
            print!("{} ", "you>".green().bold());
            let _ = std::io::stdout().flush();
        }

        let mut lines = self.lines.lock().await;
        // next_line is cancel safe; a partial line survives the timeout
        match tokio::time::timeout(timeout, lines.next_line()).await {
            Err(_) => {
                if self.prompt {
                    println!();
                }
                ListenOutcome::TimedOut
            }
            Ok(Ok(Some(line))) if line.trim().is_empty() => ListenOutcome::Unintelligible,
            Ok(Ok(Some(line))) => ListenOutcome::Heard(line.trim().to_string()),
            Ok(Ok(None)) => ListenOutcome::Closed,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to read console input");
                ListenOutcome::Closed
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ConsoleOutput;

#[async_trait]
impl OutputBoundary for ConsoleOutput {
    async fn speak(&self, text: &str) {
        println!("{} {}", "parley>".cyan().bold(), text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let input = ConsoleInput::from_reader(BufReader::new(&b"hello there\n\n  bye  \n"[..]));
        let timeout = Duration::from_secs(1);

        assert_eq!(input.listen(timeout).await, ListenOutcome::Heard("hello there".to_string()));
        assert_eq!(input.listen(timeout).await, ListenOutcome::Unintelligible);
        assert_eq!(input.listen(timeout).await, ListenOutcome::Heard("bye".to_string()));
        assert_eq!(input.listen(timeout).await, ListenOutcome::Closed);
    }
}
