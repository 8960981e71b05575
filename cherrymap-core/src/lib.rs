pub mod blame;
pub mod cherry;
pub mod diff;
pub mod error;
pub mod gitcmd;
pub mod hunk;
pub mod log;
pub mod trace;

pub use cherry::{CherryStatus, Classifier, Tier};
pub use diff::{DiffLine, FilePatch, Hunk, LineOrigin};
pub use error::{GitError, ParseError, TraceError};
pub use gitcmd::Git;
pub use hunk::HunkHeader;
pub use log::{CommitIndex, CommitMeta, API_SUFFIX};
pub use trace::{AnchorTracer, CONTEXT};
