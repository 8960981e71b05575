use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Subprocess gateway to the version-control collaborators. One blocking
/// `git` invocation per query; a non-zero exit or unreadable stream is
/// fatal to the run.
pub struct Git {
    repo: PathBuf,
}

impl Git {
    pub fn new<P: AsRef<Path>>(repo: P) -> Self {
        Git {
            repo: repo.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .output()
            .map_err(|e| GitError::Spawn(e.to_string()))?;
        let command = format!("git {}", args.join(" "));
        if !output.status.success() {
            return Err(GitError::Failed {
                command,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| GitError::Output(command))
    }

    /// Resolve a human-readable reference to its canonical commit id.
    pub fn rev_parse(&self, rev: &str) -> Result<String, GitError> {
        let spec = format!("{rev}^{{commit}}");
        let out = self.run(&["rev-parse", "--verify", &spec])?;
        Ok(out.trim().to_string())
    }

    /// Unified diff between two revisions, or against the working tree
    /// when `new` is absent.
    pub fn diff(&self, old: &str, new: Option<&str>, context: u32) -> Result<String, GitError> {
        let ctx = format!("-U{context}");
        let mut args = vec!["diff", ctx.as_str(), old];
        if let Some(new) = new {
            args.push(new);
        }
        self.run(&args)
    }

    /// Per-line attribution for `count` lines of `path` starting at
    /// `start`, as of `rev` (or the working tree when `rev` is absent).
    pub fn blame(
        &self,
        rev: Option<&str>,
        path: &str,
        start: u32,
        count: u32,
    ) -> Result<String, GitError> {
        let range = format!("{start},+{count}");
        let mut args = vec!["blame", "-l", "-L", range.as_str()];
        if let Some(rev) = rev {
            args.push(rev);
        }
        args.push("--");
        args.push(path);
        self.run(&args)
    }

    /// Raw commit log with per-file statistics for a revision range. The
    /// wide stat width keeps paths from being abbreviated.
    pub fn log_with_stats(&self, range: &str) -> Result<String, GitError> {
        self.run(&["log", "--pretty=raw", "--stat=999", range])
    }

    /// Cherry-detection: one line per commit on `head`, `-` when an
    /// equivalent change exists on `dest`, `+` when it does not.
    pub fn cherry(&self, dest: &str, head: &str) -> Result<String, GitError> {
        self.run(&["cherry", dest, head])
    }
}
