/// A directed anchor relation: `from`'s change displaced or retained
/// lines last owned by `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchorEdge {
    pub from: String,
    pub to: String,
}

impl AnchorEdge {
    pub fn new(from: String, to: String) -> Self {
        Self { from, to }
    }
}
