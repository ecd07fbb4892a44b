// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Progress reporting for garden access
//!
//! The garden client publishes connection and listing events; the command
//! line front end turns them into spinner messages.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Create a spinner with consistent styling
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg} {elapsed:.dim}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[derive(Clone, Debug)]
pub enum ProgressUpdate {
    /// Connecting to a garden cluster
    Connecting { garden: String },
    Connected { garden: String, elapsed_ms: u64 },
    /// Listing a resource type
    Listing { resource: String },
    Listed {
        resource: String,
        count: usize,
        elapsed_ms: u64,
    },
}

impl ProgressUpdate {
    /// Spinner text for this update
    pub fn message(&self) -> String {
        match self {
            ProgressUpdate::Connecting { garden } => format!("Connecting to {}...", garden),
            ProgressUpdate::Connected { garden, elapsed_ms } => {
                format!("Connected to {} ({}ms)", garden, elapsed_ms)
            }
            ProgressUpdate::Listing { resource } => format!("Listing {}...", resource),
            ProgressUpdate::Listed {
                resource,
                count,
                elapsed_ms,
            } => format!("{} {} found ({}ms)", count, resource, elapsed_ms),
        }
    }
}

pub struct ProgressReporter {
    sender: broadcast::Sender<ProgressUpdate>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.sender.subscribe()
    }

    // Sends fail only when nobody listens, which is fine

    pub fn connecting(&self, garden: &str) {
        let _ = self.sender.send(ProgressUpdate::Connecting {
            garden: garden.to_string(),
        });
    }

    pub fn connected(&self, garden: &str, elapsed_ms: u64) {
        let _ = self.sender.send(ProgressUpdate::Connected {
            garden: garden.to_string(),
            elapsed_ms,
        });
    }

    pub fn listing(&self, resource: &str) {
        let _ = self.sender.send(ProgressUpdate::Listing {
            resource: resource.to_string(),
        });
    }

    pub fn listed(&self, resource: &str, count: usize, elapsed_ms: u64) {
        let _ = self.sender.send(ProgressUpdate::Listed {
            resource: resource.to_string(),
            count,
            elapsed_ms,
        });
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle to progress reporter
pub type ProgressHandle = Arc<ProgressReporter>;

pub fn create_progress_handle() -> ProgressHandle {
    Arc::new(ProgressReporter::new())
}
