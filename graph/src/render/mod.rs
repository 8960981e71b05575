pub mod dot;

pub use dot::{render_dot, render_edges, DotOptions};
