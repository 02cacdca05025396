//! # mediacenter-adapter-shell
//!
//! The controller's only way to reach the host operating system.
//!
//! [`HostShell`] runs commands from a fixed allow-list (by default only
//! `sudo poweroff`). Anything else is logged and dropped: a disallowed
//! command is never executed and never an error.
//!
//! ## Dependency rule
//!
//! Depends on `mediacenter-app` (port traits) only.

use std::process::Stdio;

use tokio::process::Command;

use mediacenter_app::ports::{POWEROFF_COMMAND, Shell};

/// Allow-listed host command runner.
#[derive(Debug, Clone)]
pub struct HostShell {
    allowed: Vec<String>,
    dry_run: bool,
}

impl Default for HostShell {
    fn default() -> Self {
        Self {
            allowed: vec![POWEROFF_COMMAND.to_string()],
            dry_run: false,
        }
    }
}

impl HostShell {
    /// Log allowed commands instead of executing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn is_allowed(&self, command: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == command)
    }

    fn spawn(command: &str) -> std::io::Result<()> {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(());
        };
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .spawn()?;
        let command = command.to_string();
        // reap the child without holding up the caller
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => tracing::error!(%command, %status, "host command failed"),
                Err(err) => tracing::error!(%command, %err, "host command lost"),
            }
        });
        Ok(())
    }
}

impl Shell for HostShell {
    fn run(&self, command: &str) {
        if !self.is_allowed(command) {
            tracing::warn!(%command, "refusing disallowed host command");
            return;
        }
        if self.dry_run {
            tracing::info!(%command, "dry run, not executing host command");
            return;
        }
        tracing::info!(%command, "system");
        if let Err(err) = Self::spawn(command) {
            tracing::error!(%command, %err, "failed to start host command");
        }
    }
}
