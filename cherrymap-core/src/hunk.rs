use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The four integers of a `@@ -old +new @@` hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

impl HunkHeader {
    /// Parse one `@@ -oldStart[,oldCount] +newStart[,newCount] @@` line.
    /// Omitted counts default to 1. Anything that does not match is fatal:
    /// all downstream offset arithmetic depends on these four numbers.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let err = || ParseError::HunkHeader(line.to_string());
        let rest = line.strip_prefix("@@ -").ok_or_else(err)?;
        let (old, rest) = rest.split_once(" +").ok_or_else(err)?;
        let (new, _) = rest.split_once(" @@").ok_or_else(err)?;
        let (old_start, old_count) = parse_range(old).ok_or_else(err)?;
        let (new_start, new_count) = parse_range(new).ok_or_else(err)?;
        Ok(HunkHeader {
            old_start,
            old_count,
            new_start,
            new_count,
        })
    }
}

impl std::fmt::Display for HunkHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        )
    }
}

fn parse_range(spec: &str) -> Option<(u32, u32)> {
    match spec.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((spec.parse().ok()?, 1)),
    }
}
