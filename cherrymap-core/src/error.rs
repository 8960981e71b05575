use thiserror::Error;

/// Input-format violations. Every one of these is fatal: once a line
/// stream stops matching its expected shape, all later offsets are suspect.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed hunk header: {0:?}")]
    HunkHeader(String),
    #[error("unexpected diff line: {0:?}")]
    DiffLine(String),
    #[error("truncated diff: hunk body ended early")]
    TruncatedDiff,
    #[error("malformed blame line: {0:?}")]
    BlameLine(String),
    #[error("blame returned {got} lines for a {want}-line range of {path}")]
    BlameCount { path: String, want: u32, got: u32 },
    #[error("malformed log line: {0:?}")]
    LogLine(String),
    #[error("malformed cherry line: {0:?}")]
    CherryLine(String),
}

/// Collaborator-process failures.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to spawn git: {0}")]
    Spawn(String),
    #[error("`{command}` exited with status {status}: {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("`{0}` produced non-UTF-8 output")]
    Output(String),
}

/// Anchor-tracing failures.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The diff body and a blame stream disagreed on line counts. The two
    /// streams are consumed in lockstep, so a mismatch invalidates every
    /// attribution after it.
    #[error("stream desync in {path} at {header}: {side} cursor {state}")]
    Desync {
        path: String,
        header: String,
        side: &'static str,
        state: &'static str,
    },
}
