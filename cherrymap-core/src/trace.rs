use tracing::debug;

use crate::blame;
use crate::diff::{self, Hunk, LineOrigin};
use crate::error::TraceError;
use crate::gitcmd::Git;
use crate::log::CommitIndex;

/// Context lines requested around every hunk. Wide context makes the
/// unchanged lines bracketing a change carry enough history to anchor it.
pub const CONTEXT: u32 = 5;

/// Computes the anchor-commit set of one change: the prior commits that
/// last owned the lines the change removed or kept as context.
pub struct AnchorTracer<'a> {
    git: &'a Git,
}

impl<'a> AnchorTracer<'a> {
    pub fn new(git: &'a Git) -> Self {
        AnchorTracer { git }
    }

    /// Anchor set for the change `old..new` (`new` absent means the
    /// working tree), restricted to commits present in `index`.
    /// The result is sorted and distinct.
    pub fn trace(
        &self,
        old: &str,
        new: Option<&str>,
        index: &CommitIndex,
    ) -> Result<Vec<String>, TraceError> {
        let text = self.git.diff(old, new, CONTEXT)?;
        let mut candidates = Vec::new();

        for patch in diff::parse(&text)? {
            if patch.binary {
                continue;
            }
            let label = patch
                .new_path
                .as_deref()
                .or(patch.old_path.as_deref())
                .unwrap_or("?");
            debug!("tracing {} ({} hunks)", label, patch.hunks.len());
            for hunk in &patch.hunks {
                // A query against a /dev/null side, or over a zero-length
                // range, is skipped rather than issued.
                let pre = match (&patch.old_path, hunk.header.old_count) {
                    (Some(path), count) if count > 0 => {
                        let raw = self.git.blame(Some(old), path, hunk.header.old_start, count)?;
                        blame::parse(&raw, path, count)?
                    }
                    _ => Vec::new(),
                };
                let post = match (&patch.new_path, hunk.header.new_count) {
                    (Some(path), count) if count > 0 => {
                        let raw = self.git.blame(new, path, hunk.header.new_start, count)?;
                        blame::parse(&raw, path, count)?
                    }
                    _ => Vec::new(),
                };
                candidates.extend(correlate_hunk(label, hunk, pre, post)?);
            }
        }

        candidates.sort();
        candidates.dedup();
        let mut anchors: Vec<String> = candidates
            .iter()
            .filter_map(|id| index.resolve(id))
            .map(str::to_string)
            .collect();
        anchors.sort();
        anchors.dedup();
        Ok(anchors)
    }
}

/// Walk one hunk body, consuming the pre- and post-image attribution
/// streams in lockstep. A context line consumes one id from each stream
/// and records the pre-image owner; a removed line consumes and records
/// from the pre stream only; an added line consumes the post stream and
/// records nothing. Both streams must run out exactly when the body ends.
pub fn correlate_hunk(
    path: &str,
    hunk: &Hunk,
    pre: Vec<String>,
    post: Vec<String>,
) -> Result<Vec<String>, TraceError> {
    let desync = |side: &'static str, state: &'static str| TraceError::Desync {
        path: path.to_string(),
        header: hunk.header.to_string(),
        side,
        state,
    };
    let mut pre = pre.into_iter();
    let mut post = post.into_iter();
    let mut anchors = Vec::new();

    for line in &hunk.lines {
        match line.origin {
            LineOrigin::Context => {
                let owner = pre.next().ok_or_else(|| desync("pre", "exhausted early"))?;
                post.next().ok_or_else(|| desync("post", "exhausted early"))?;
                anchors.push(owner);
            }
            LineOrigin::Deletion => {
                anchors.push(pre.next().ok_or_else(|| desync("pre", "exhausted early"))?);
            }
            LineOrigin::Addition => {
                post.next().ok_or_else(|| desync("post", "exhausted early"))?;
            }
        }
    }
    if pre.next().is_some() {
        return Err(desync("pre", "left over at hunk end"));
    }
    if post.next().is_some() {
        return Err(desync("post", "left over at hunk end"));
    }
    Ok(anchors)
}
