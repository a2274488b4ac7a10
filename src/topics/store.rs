//! Flat-file topic backlog.
//!
//! The store is a UTF-8 text file of line-oriented entries. An entry is a
//! line whose (optionally indented) content starts with `**TOPIC**` (unused)
//! or `**USED**` (used), followed by free text up to end-of-line. Humans
//! append entries by hand; the workflow claims them one at a time.
//!
//! Claiming rewrites only the claimed entry's marker token. Every other byte
//! of the file is preserved verbatim, and the rewritten content replaces the
//! file through a sibling temp file + rename so no partial write is ever
//! observable. Single-writer contract: no locking; overlapping invocations
//! against the same file are a documented race, not a defended case.

use crate::error::StoreError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::Display;

pub const UNUSED_MARKER: &str = "**TOPIC**";
pub const USED_MARKER: &str = "**USED**";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TopicStatus {
    Unused,
    Used,
}

/// A parsed entry. Identity is the marker's byte offset, not the text —
/// two entries may carry identical text.
#[derive(Debug, Clone)]
pub struct TopicEntry {
    pub marker_offset: usize,
    pub status: TopicStatus,
    pub text: String,
}

pub struct TopicStore {
    path: PathBuf,
}

impl TopicStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Claim the next unused topic, treating every failure as "no topic
    /// available" with a logged diagnostic. The orchestrator must never
    /// crash because the backlog is missing or unreadable.
    pub fn claim_next(&self) -> Option<String> {
        match self.try_claim_next() {
            Ok(topic) => topic,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "topic claim failed, treating as empty backlog");
                None
            }
        }
    }

    /// Claim the next unused topic with non-empty text, in stored order.
    ///
    /// Unused entries with empty text are not valid claim targets; they are
    /// skipped but still consumed (marker advanced to used) so a dead entry
    /// is never rescanned on every subsequent run. Returns `Ok(None)` when
    /// the file is absent or holds no claimable entry.
    pub fn try_claim_next(&self) -> Result<Option<String>, StoreError> {
        let mut content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut consumed_offsets: Vec<usize> = Vec::new();
        let mut claimed: Option<String> = None;

        for entry in parse_entries(&content) {
            if entry.status != TopicStatus::Unused {
                continue;
            }
            consumed_offsets.push(entry.marker_offset);
            if entry.text.is_empty() {
                continue;
            }
            claimed = Some(entry.text);
            break;
        }

        if consumed_offsets.is_empty() {
            return Ok(None);
        }

        // Flip markers back-to-front so earlier offsets stay valid while the
        // shorter used marker shrinks the line.
        for &offset in consumed_offsets.iter().rev() {
            content.replace_range(offset..offset + UNUSED_MARKER.len(), USED_MARKER);
        }
        self.write_atomic(&content)?;

        Ok(claimed)
    }

    /// All entries in stored order. An absent file is an empty backlog.
    pub fn entries(&self) -> Result<Vec<TopicEntry>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(parse_entries(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Append one unused entry, creating the file if needed.
    pub fn append(&self, text: &str) -> Result<(), StoreError> {
        let needs_leading_newline = match fs::read_to_string(&self.path) {
            Ok(content) => !content.is_empty() && !content.ends_with('\n'),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_leading_newline {
            writeln!(file)?;
        }
        writeln!(file, "{UNUSED_MARKER} {}", text.trim())?;
        Ok(())
    }

    fn write_atomic(&self, content: &str) -> Result<(), StoreError> {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "topics".into());
        let tmp = self.path.with_file_name(format!("{file_name}.tmp"));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn parse_entries(content: &str) -> Vec<TopicEntry> {
    let mut entries = Vec::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];

        let (status, marker_len) = if rest.starts_with(UNUSED_MARKER) {
            (TopicStatus::Unused, UNUSED_MARKER.len())
        } else if rest.starts_with(USED_MARKER) {
            (TopicStatus::Used, USED_MARKER.len())
        } else {
            offset += line.len();
            continue;
        };

        entries.push(TopicEntry {
            marker_offset: offset + indent,
            status,
            text: rest[marker_len..].trim().to_string(),
        });
        offset += line.len();
    }

    entries
}
