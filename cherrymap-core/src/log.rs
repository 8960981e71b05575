use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Path suffix marking interface-definition files. Exact, case-sensitive.
pub const API_SUFFIX: &str = ".aidl";

/// One classified line of `git log --pretty=raw --stat` output.
#[derive(Debug, PartialEq, Eq)]
pub enum LogRecord<'a> {
    Commit(&'a str),
    Author { timestamp: i64 },
    Committer { timestamp: i64 },
    Message(&'a str),
    FileStat { path: &'a str, plus: bool, minus: bool },
    Other,
}

/// Classify one log line. Keeps the raw-format coupling in one place; the
/// accumulator in [`scan`] only sees tagged records.
pub fn parse_record(line: &str) -> Result<LogRecord<'_>, ParseError> {
    if let Some(rest) = line.strip_prefix("commit ") {
        let id = rest.split_whitespace().next().unwrap_or("");
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseError::LogLine(line.to_string()));
        }
        return Ok(LogRecord::Commit(id));
    }
    if let Some(rest) = line.strip_prefix("author ") {
        let timestamp =
            ident_timestamp(rest).ok_or_else(|| ParseError::LogLine(line.to_string()))?;
        return Ok(LogRecord::Author { timestamp });
    }
    if let Some(rest) = line.strip_prefix("committer ") {
        let timestamp =
            ident_timestamp(rest).ok_or_else(|| ParseError::LogLine(line.to_string()))?;
        return Ok(LogRecord::Committer { timestamp });
    }
    if let Some(text) = line.strip_prefix("    ") {
        return Ok(LogRecord::Message(text));
    }
    if line.starts_with(' ') {
        // --stat block: " path | 3 ++-" per file, then a summary line
        if let Some((path, tail)) = line.split_once(" | ") {
            let tail = tail.trim();
            if tail.starts_with("Bin") {
                return Ok(LogRecord::FileStat {
                    path: path.trim(),
                    plus: false,
                    minus: false,
                });
            }
            return Ok(LogRecord::FileStat {
                path: path.trim(),
                plus: tail.contains('+'),
                minus: tail.contains('-'),
            });
        }
        return Ok(LogRecord::Other);
    }
    if line.is_empty()
        || line.starts_with("tree ")
        || line.starts_with("parent ")
        || line.starts_with("gpgsig")
        || line.starts_with("mergetag")
        || line.starts_with("encoding ")
    {
        return Ok(LogRecord::Other);
    }
    Err(ParseError::LogLine(line.to_string()))
}

/// `Name <email> <unix-ts> <tz>` -> unix-ts
fn ident_timestamp(ident: &str) -> Option<i64> {
    let mut fields = ident.rsplitn(3, ' ');
    let _tz = fields.next()?;
    fields.next()?.parse().ok()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitMeta {
    pub id: String,
    pub summary: String,
    pub author_ts: i64,
    pub committer_ts: i64,
    pub change_id: Option<String>,
    /// Commit touches at least one interface-definition file.
    pub touches_api: bool,
    /// ...and at least one of those touches deletes lines.
    pub api_deletions: bool,
}

impl CommitMeta {
    fn new(id: &str) -> Self {
        CommitMeta {
            id: id.to_string(),
            summary: String::new(),
            author_ts: 0,
            committer_ts: 0,
            change_id: None,
            touches_api: false,
            api_deletions: false,
        }
    }
}

/// Per-commit metadata for one scanned revision range, in log order
/// (newest first).
#[derive(Debug, Default)]
pub struct CommitIndex {
    order: Vec<String>,
    map: HashMap<String, CommitMeta>,
}

impl CommitIndex {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CommitMeta> {
        self.map.get(id)
    }

    /// Commit ids, newest first.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Exact id lookup, falling back to a unique-prefix match. Blame's
    /// boundary marker eats one digit of the id (see [`crate::blame`]),
    /// so anchor candidates can come back one character short.
    pub fn resolve(&self, id: &str) -> Option<&str> {
        if let Some((key, _)) = self.map.get_key_value(id) {
            return Some(key.as_str());
        }
        if id.len() < 7 {
            return None;
        }
        let mut found = None;
        for key in self.map.keys() {
            if key.starts_with(id) {
                if found.is_some() {
                    return None;
                }
                found = Some(key.as_str());
            }
        }
        found
    }

    /// Change identifier -> commit id. Newest occurrence wins.
    pub fn change_id_lookup(&self) -> HashMap<String, String> {
        let mut lookup = HashMap::new();
        for id in &self.order {
            if let Some(meta) = self.map.get(id) {
                if let Some(change_id) = &meta.change_id {
                    lookup
                        .entry(change_id.clone())
                        .or_insert_with(|| id.clone());
                }
            }
        }
        lookup
    }
}

/// Single linear scan of a raw commit log, accumulating per-commit
/// metadata. The first non-empty message line is the summary; the first
/// `Change-Id:` trailer wins and is never overwritten.
pub fn scan(raw: &str) -> Result<CommitIndex, ParseError> {
    let mut index = CommitIndex::default();
    let mut current: Option<String> = None;

    for line in raw.lines() {
        let record = parse_record(line)?;
        if let LogRecord::Commit(id) = record {
            index.order.push(id.to_string());
            index.map.insert(id.to_string(), CommitMeta::new(id));
            current = Some(id.to_string());
            continue;
        }
        let Some(meta) = current.as_ref().and_then(|id| index.map.get_mut(id)) else {
            // header noise ahead of the first commit record
            continue;
        };
        match record {
            LogRecord::Author { timestamp } => meta.author_ts = timestamp,
            LogRecord::Committer { timestamp } => meta.committer_ts = timestamp,
            LogRecord::Message(text) => {
                let text = text.trim();
                if meta.summary.is_empty() && !text.is_empty() {
                    meta.summary = text.to_string();
                }
                if let Some(token) = text.strip_prefix("Change-Id:") {
                    let token = token.trim();
                    if !token.is_empty() && meta.change_id.is_none() {
                        meta.change_id = Some(token.to_string());
                    }
                }
            }
            LogRecord::FileStat { path, minus, .. } => {
                if path.ends_with(API_SUFFIX) {
                    meta.touches_api = true;
                    if minus {
                        meta.api_deletions = true;
                    }
                }
            }
            LogRecord::Commit(_) | LogRecord::Other => {}
        }
    }
    Ok(index)
}
