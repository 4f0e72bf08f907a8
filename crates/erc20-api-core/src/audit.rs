//! Append-only audit logger.
//!
//! Records every token write (approve, transfer, transferFrom, mint) to a JSONL
//! file, one event per line.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the audit logger.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// An audit log event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
    /// Operation name (e.g. "transfer", "mint").
    pub event_type: String,
    /// Request parameters and, when available, the transaction hash.
    pub details: serde_json::Value,
    /// "success", "reverted" or "error: <message>".
    pub outcome: String,
}

impl AuditEvent {
    /// Create a new audit event with the current timestamp.
    pub fn new(
        event_type: impl Into<String>,
        details: serde_json::Value,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: event_type.into(),
            details,
            outcome: outcome.into(),
        }
    }
}

/// Append-only JSONL audit logger.
#[derive(Debug)]
pub struct AuditLogger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl AuditLogger {
    /// Create or open an audit log file for appending, creating parent
    /// directories as needed.
    pub fn new(path: &Path) -> Result<Self, AuditError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Append an event to the audit log. Flushes after each write.
    pub fn log_event(&mut self, event: AuditEvent) -> Result<(), AuditError> {
        let line = serde_json::to_string(&event)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Get the path of the audit log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
