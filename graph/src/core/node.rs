use chrono::DateTime;

use cherrymap_core::{CommitMeta, Tier};

/// Id of the pseudo-node standing in for uncommitted working-tree state.
pub const WORKTREE_ID: &str = "current";

/// A commit node in the anchor graph.
#[derive(Debug, Clone)]
pub struct AnchorNode {
    /// Commit id (or [`WORKTREE_ID`])
    pub id: String,
    /// One-line description
    pub summary: String,
    /// Stable tracking identifier, when the commit carries one
    pub change_id: Option<String>,
    /// Port-confidence classification
    pub tier: Tier,
    /// Committer timestamp (unix seconds; 0 when unknown)
    pub committer_ts: i64,
}

impl AnchorNode {
    pub fn from_meta(meta: &CommitMeta, tier: Tier) -> Self {
        AnchorNode {
            id: meta.id.clone(),
            summary: meta.summary.clone(),
            change_id: meta.change_id.clone(),
            tier,
            committer_ts: meta.committer_ts,
        }
    }

    /// Placeholder for a commit referenced outside the scanned range.
    pub fn bare(id: &str) -> Self {
        AnchorNode {
            id: id.to_string(),
            summary: String::new(),
            change_id: None,
            tier: Tier::Unknown,
            committer_ts: 0,
        }
    }

    /// Pseudo-node for the uncommitted working tree.
    pub fn worktree() -> Self {
        AnchorNode {
            id: WORKTREE_ID.to_string(),
            summary: "uncommitted".to_string(),
            change_id: None,
            tier: Tier::Unknown,
            committer_ts: 0,
        }
    }

    pub fn short_id(&self) -> &str {
        &self.id[..self.id.len().min(12)]
    }

    pub fn committer_date(&self) -> Option<String> {
        if self.committer_ts == 0 {
            return None;
        }
        DateTime::from_timestamp(self.committer_ts, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
    }
}
