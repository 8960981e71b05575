pub mod dag;
pub mod edge;
pub mod node;

pub use dag::AnchorDag;
pub use edge::AnchorEdge;
pub use node::{AnchorNode, WORKTREE_ID};
