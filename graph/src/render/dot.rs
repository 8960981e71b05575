use cherrymap_core::Tier;

use crate::core::AnchorDag;

/// Rendering switches for the dot emitter.
#[derive(Debug, Clone, Copy)]
pub struct DotOptions {
    /// Fill nodes with their tier color
    pub color: bool,
    /// Emit commits with no anchors and no dependents as isolated nodes
    pub include_solo: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        DotOptions {
            color: true,
            include_solo: false,
        }
    }
}

fn fill_color(tier: Tier) -> &'static str {
    match tier {
        Tier::DefinitelyPicked => "palegreen",
        Tier::PickedByChangeId => "lightblue",
        Tier::IntrusiveApiChange => "lightcoral",
        Tier::AddOnlyApiChange => "sandybrown",
        Tier::Unknown => "gainsboro",
    }
}

/// Escape and truncate text for use inside a dot label.
fn sanitize(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars().take(40) {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Emit the graph as a Graphviz dot document for external rendering.
/// Node declarations are sorted by id so repeated runs emit identical
/// documents.
pub fn render_dot(dag: &AnchorDag, opts: DotOptions) -> String {
    let mut out = String::from("digraph anchors {\n");
    out.push_str("  node [shape=box, fontname=\"monospace\"];\n");

    let mut ids: Vec<&String> = dag.nodes.keys().collect();
    ids.sort();
    for id in ids {
        let node = &dag.nodes[id];
        if !opts.include_solo && dag.is_solo(id) {
            continue;
        }
        let mut label = vec![node.short_id().to_string()];
        if !node.summary.is_empty() {
            label.push(sanitize(&node.summary));
        }
        if let Some(change_id) = &node.change_id {
            label.push(sanitize(change_id));
        }
        label.push(node.tier.caption().to_string());
        if let Some(date) = node.committer_date() {
            label.push(date);
        }
        let style = if opts.color {
            format!(", style=filled, fillcolor=\"{}\"", fill_color(node.tier))
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"{}];\n",
            node.short_id(),
            label.join("\\n"),
            style
        ));
    }

    for edge in &dag.edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            short(&edge.from),
            short(&edge.to)
        ));
    }
    out.push_str("}\n");
    out
}

/// Emit the graph as plain `commit anchor` lines. `with_age` appends the
/// committer-age delta in whole days when both timestamps are known.
pub fn render_edges(dag: &AnchorDag, with_age: bool) -> String {
    let mut out = String::new();
    for edge in &dag.edges {
        out.push_str(&edge.from);
        out.push(' ');
        out.push_str(&edge.to);
        if with_age {
            if let (Some(from), Some(to)) = (dag.get(&edge.from), dag.get(&edge.to)) {
                if from.committer_ts != 0 && to.committer_ts != 0 {
                    let days = (from.committer_ts - to.committer_ts) / 86_400;
                    out.push_str(&format!(" {days}"));
                }
            }
        }
        out.push('\n');
    }
    out
}

fn short(id: &str) -> &str {
    &id[..id.len().min(12)]
}
