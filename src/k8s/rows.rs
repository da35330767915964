//! Row list file: which storage groups sit in which row
//!
//! One entry per line, `<row> <sg-name>,` separated by whitespace:
//!
//! ```text
//! r1 sg-1,
//! r1 sg-4,
//! r2 sg-2,
//! ```

use crate::utils::errors::{Result, SgError};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Storage groups listed under one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMembership {
    row: String,
    groups: BTreeSet<String>,
}

impl RowMembership {
    /// Read `path` and keep the groups listed under `row`
    pub fn load(path: &Path, row: &str) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(SgError::RowFile("row file path cannot be empty".into()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| SgError::RowFile(format!("open file {}: {}", path.display(), e)))?;

        let membership = Self::parse(&contents, row);
        tracing::debug!(
            "row {} in {}: {} group(s)",
            row,
            path.display(),
            membership.groups.len()
        );
        Ok(membership)
    }

    /// Parse row file contents
    pub fn parse(contents: &str, row: &str) -> Self {
        let groups = contents
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let line_row = fields.next()?;
                let group = fields.next()?;
                (line_row == row).then(|| group.trim_end_matches(',').to_string())
            })
            .filter(|group| !group.is_empty())
            .collect();

        Self {
            row: row.to_string(),
            groups,
        }
    }

    pub fn row(&self) -> &str {
        &self.row
    }

    /// `group` is the `sg-<n>` prefix of a name
    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }
}
