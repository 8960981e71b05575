pub mod core;
pub mod render;

pub use self::core::{AnchorDag, AnchorEdge, AnchorNode, WORKTREE_ID};
pub use render::{render_dot, render_edges, DotOptions};
