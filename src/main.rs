use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, Level};

use cherrymap_core::{log as commit_log, AnchorTracer, Classifier, CommitIndex, Git};
use graph::{render_dot, render_edges, AnchorDag, AnchorNode, DotOptions, WORKTREE_ID};

#[derive(Parser)]
#[command(name = "cherrymap")]
#[command(
    about = "Trace which earlier commits a change is anchored on",
    long_about = None
)]
struct Cli {
    /// Path to the repository
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: PathBuf,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Trace every commit in fork..head instead of just the newest one
    #[arg(short, long)]
    all: bool,

    /// Emit a Graphviz dot document instead of an edge list
    #[arg(short, long)]
    graph: bool,

    /// Omit fill colors from dot output
    #[arg(long)]
    no_color: bool,

    /// Keep commits with no anchors and no dependents in the output
    #[arg(long)]
    include_solo: bool,

    /// Fork point of the working branch
    #[arg(long, default_value = "origin/master")]
    fork: String,

    /// Tip of the working branch
    #[arg(long, default_value = "HEAD")]
    head: String,

    /// Maintenance branch commits are ported to
    #[arg(long, default_value = "origin/maint")]
    dest: String,

    /// Pre-image revision (defaults to the parent of the newest commit)
    old: Option<String>,

    /// Post-image revision (defaults to the working tree when OLD is given)
    new: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let git = Git::new(&cli.repo);
    let fork = git
        .rev_parse(&cli.fork)
        .with_context(|| format!("cannot resolve fork point '{}'", cli.fork))?;
    let head = git
        .rev_parse(&cli.head)
        .with_context(|| format!("cannot resolve branch head '{}'", cli.head))?;
    let dest = git
        .rev_parse(&cli.dest)
        .with_context(|| format!("cannot resolve maintenance branch '{}'", cli.dest))?;

    // Bulk history queries, once up front: working-range metadata,
    // maintenance-range change ids, native cherry-detection.
    let index = commit_log::scan(&git.log_with_stats(&format!("{fork}..{head}"))?)?;
    debug!("scanned {} commits in working range", index.len());
    let dest_index = commit_log::scan(&git.log_with_stats(&format!("{fork}..{dest}"))?)?;
    let classifier = Classifier::new(
        cherrymap_core::cherry::parse(&git.cherry(&dest, &head)?)?,
        dest_index.change_id_lookup(),
    );

    let tracer = AnchorTracer::new(&git);
    let mut dag = AnchorDag::new();

    if cli.all {
        trace_range(&tracer, &index, &classifier, &mut dag)?;
    } else {
        trace_single(&cli, &git, &head, &tracer, &index, &classifier, &mut dag)?;
    }

    let output = if cli.graph {
        render_dot(
            &dag,
            DotOptions {
                color: !cli.no_color,
                // solo filtering only applies to full-range analysis
                include_solo: cli.include_solo || !cli.all,
            },
        )
    } else {
        render_edges(&dag, cli.all)
    };
    print!("{output}");
    Ok(())
}

/// Full-range mode: trace every commit of the working range, oldest
/// first, with running progress on stderr.
fn trace_range(
    tracer: &AnchorTracer,
    index: &CommitIndex,
    classifier: &Classifier,
    dag: &mut AnchorDag,
) -> Result<()> {
    let total = index.len();
    let started = Instant::now();
    for (done, id) in index.ids().rev().enumerate() {
        let parent = format!("{id}^");
        let anchors = tracer.trace(&parent, Some(id), index)?;
        add_commit(dag, index, classifier, id);
        for anchor in &anchors {
            add_commit(dag, index, classifier, anchor);
            dag.add_anchor(id, anchor);
        }
        let done = done + 1;
        let elapsed = started.elapsed().as_secs_f64();
        let projected = elapsed / done as f64 * (total - done) as f64;
        info!("{done}/{total} commits traced, {elapsed:.1}s elapsed, ~{projected:.1}s remaining");
    }
    Ok(())
}

/// Single-target mode: trace one change, by default the newest commit in
/// the range, or the revisions named on the command line.
fn trace_single(
    cli: &Cli,
    git: &Git,
    head: &str,
    tracer: &AnchorTracer,
    index: &CommitIndex,
    classifier: &Classifier,
    dag: &mut AnchorDag,
) -> Result<()> {
    let (old, new) = match &cli.old {
        Some(old) => {
            let old = git
                .rev_parse(old)
                .with_context(|| format!("cannot resolve revision '{old}'"))?;
            let new = match &cli.new {
                Some(new) => Some(
                    git.rev_parse(new)
                        .with_context(|| format!("cannot resolve revision '{new}'"))?,
                ),
                None => None,
            };
            (old, new)
        }
        None => (format!("{head}^"), Some(head.to_string())),
    };

    let anchors = tracer.trace(&old, new.as_deref(), index)?;
    let source = match &new {
        Some(id) => {
            add_commit(dag, index, classifier, id);
            id.clone()
        }
        None => {
            dag.add_node(AnchorNode::worktree());
            WORKTREE_ID.to_string()
        }
    };
    for anchor in &anchors {
        add_commit(dag, index, classifier, anchor);
        dag.add_anchor(&source, anchor);
    }
    Ok(())
}

fn add_commit(dag: &mut AnchorDag, index: &CommitIndex, classifier: &Classifier, id: &str) {
    if dag.get(id).is_some() {
        return;
    }
    match index.get(id) {
        Some(meta) => dag.add_node(AnchorNode::from_meta(meta, classifier.classify(meta))),
        None => dag.add_node(AnchorNode::bare(id)),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
