use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::log::CommitMeta;

/// Whether native cherry-detection found an equivalent change on the
/// maintenance branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CherryStatus {
    Present,
    Absent,
}

/// Parse `git cherry` output: `- <id>` means an equivalent commit exists
/// on the target branch, `+ <id>` means it does not.
pub fn parse(raw: &str) -> Result<HashMap<String, CherryStatus>, ParseError> {
    let mut map = HashMap::new();
    for line in raw.lines() {
        let err = || ParseError::CherryLine(line.to_string());
        let (mark, id) = line.split_once(' ').ok_or_else(err)?;
        let status = match mark {
            "-" => CherryStatus::Present,
            "+" => CherryStatus::Absent,
            _ => return Err(err()),
        };
        let id = id.trim();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        map.insert(id.to_string(), status);
    }
    Ok(map)
}

/// Port-confidence tier for one commit. Variants are listed in
/// classification priority order; the assignment is made once and fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    DefinitelyPicked,
    PickedByChangeId,
    IntrusiveApiChange,
    AddOnlyApiChange,
    Unknown,
}

impl Tier {
    pub fn caption(&self) -> &'static str {
        match self {
            Tier::DefinitelyPicked => "picked",
            Tier::PickedByChangeId => "picked (Change-Id)",
            Tier::IntrusiveApiChange => "intrusive API change",
            Tier::AddOnlyApiChange => "add-only API change",
            Tier::Unknown => "unknown",
        }
    }
}

type Rule = fn(&Classifier, &CommitMeta) -> Option<Tier>;

/// Ordered rule table; evaluation stops at the first rule that yields a
/// tier. The order of this table is the classification contract.
const RULES: &[Rule] = &[
    Classifier::no_cherry_record,
    Classifier::cherry_present,
    Classifier::change_id_match,
    Classifier::intrusive_api,
    Classifier::add_only_api,
];

/// Combines native cherry-detection with change-identifier matching
/// against the maintenance branch.
pub struct Classifier {
    cherry: HashMap<String, CherryStatus>,
    dest_change_ids: HashMap<String, String>,
}

impl Classifier {
    pub fn new(
        cherry: HashMap<String, CherryStatus>,
        dest_change_ids: HashMap<String, String>,
    ) -> Self {
        Classifier {
            cherry,
            dest_change_ids,
        }
    }

    pub fn classify(&self, meta: &CommitMeta) -> Tier {
        RULES
            .iter()
            .find_map(|rule| rule(self, meta))
            .unwrap_or(Tier::Unknown)
    }

    /// Cherry-detection never saw this commit: inconclusive, stop here.
    fn no_cherry_record(&self, meta: &CommitMeta) -> Option<Tier> {
        (!self.cherry.contains_key(&meta.id)).then_some(Tier::Unknown)
    }

    fn cherry_present(&self, meta: &CommitMeta) -> Option<Tier> {
        (self.cherry.get(&meta.id) == Some(&CherryStatus::Present))
            .then_some(Tier::DefinitelyPicked)
    }

    /// Native detection misses pure content rewrites; a stable tracking
    /// identifier closes that gap.
    fn change_id_match(&self, meta: &CommitMeta) -> Option<Tier> {
        meta.change_id
            .as_ref()
            .filter(|change_id| self.dest_change_ids.contains_key(change_id.as_str()))
            .map(|_| Tier::PickedByChangeId)
    }

    fn intrusive_api(&self, meta: &CommitMeta) -> Option<Tier> {
        (meta.touches_api && meta.api_deletions).then_some(Tier::IntrusiveApiChange)
    }

    fn add_only_api(&self, meta: &CommitMeta) -> Option<Tier> {
        (meta.touches_api && !meta.api_deletions).then_some(Tier::AddOnlyApiChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "cccccccccccccccccccccccccccccccccccccccc";

    fn meta(change_id: Option<&str>, touches_api: bool, api_deletions: bool) -> CommitMeta {
        CommitMeta {
            id: ID.to_string(),
            summary: "subject".to_string(),
            author_ts: 1,
            committer_ts: 2,
            change_id: change_id.map(str::to_string),
            touches_api,
            api_deletions,
        }
    }

    fn classifier(status: Option<CherryStatus>, dest_change_id: Option<&str>) -> Classifier {
        let mut cherry = HashMap::new();
        if let Some(status) = status {
            cherry.insert(ID.to_string(), status);
        }
        let mut dest = HashMap::new();
        if let Some(change_id) = dest_change_id {
            dest.insert(change_id.to_string(), "d".repeat(40));
        }
        Classifier::new(cherry, dest)
    }

    #[test]
    fn parses_cherry_output() {
        let raw = format!("+ {ID}\n- {}\n", "e".repeat(40));
        let map = parse(&raw).unwrap();
        assert_eq!(map.get(ID), Some(&CherryStatus::Absent));
        assert_eq!(map.get(&"e".repeat(40)), Some(&CherryStatus::Present));
    }

    #[test]
    fn rejects_bad_cherry_lines() {
        assert!(parse("? abc\n").is_err());
        assert!(parse("+\n").is_err());
        assert!(parse("+ nothex!\n").is_err());
    }

    #[test]
    fn missing_cherry_record_is_unknown_even_with_other_signals() {
        let classifier = classifier(None, Some("Iaaa"));
        let meta = meta(Some("Iaaa"), true, true);
        assert_eq!(classifier.classify(&meta), Tier::Unknown);
    }

    #[test]
    fn cherry_hit_overrides_change_id_match() {
        let classifier = classifier(Some(CherryStatus::Present), Some("Iaaa"));
        let meta = meta(Some("Iaaa"), true, true);
        assert_eq!(classifier.classify(&meta), Tier::DefinitelyPicked);
    }

    #[test]
    fn change_id_match_overrides_api_tiers() {
        let classifier = classifier(Some(CherryStatus::Absent), Some("Iaaa"));
        let meta = meta(Some("Iaaa"), true, true);
        assert_eq!(classifier.classify(&meta), Tier::PickedByChangeId);
    }

    #[test]
    fn api_deletions_classify_as_intrusive() {
        let classifier = classifier(Some(CherryStatus::Absent), None);
        let meta = meta(None, true, true);
        assert_eq!(classifier.classify(&meta), Tier::IntrusiveApiChange);
    }

    #[test]
    fn additive_api_change_is_flagged_for_review() {
        let classifier = classifier(Some(CherryStatus::Absent), None);
        let meta = meta(None, true, false);
        assert_eq!(classifier.classify(&meta), Tier::AddOnlyApiChange);
    }

    #[test]
    fn unmatched_commit_is_unknown() {
        let classifier = classifier(Some(CherryStatus::Absent), None);
        let meta = meta(Some("Ibbb"), false, false);
        assert_eq!(classifier.classify(&meta), Tier::Unknown);
    }
}
